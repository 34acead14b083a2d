//! Fleet spawner for seeding the simulation with containers.
//!
//! At startup the spawner selects a random journey for each container,
//! generates a route through the chokepoint graph, and creates the
//! container at its origin terminal with generated identity metadata.

use chrono::{DateTime, Utc};
use freightwatch_geo::GeofenceIndex;
use freightwatch_routing::{JourneyPlanner, RouteConfig, RouteGenerator};
use freightwatch_sim::{Container, ContainerTuning, SimulationConfig};
use freightwatch_types::ContainerMetadata;
use rand::Rng;
use tracing::debug;

use crate::error::EngineError;

/// Spawn the initial fleet.
///
/// Each container gets an independent journey and route. Journeys that
/// cannot resolve a chokepoint path still produce a direct route, so
/// the only failure mode is a world without terminals.
///
/// # Errors
///
/// Returns [`EngineError::Spawn`] when the geofence index holds no
/// terminals.
pub fn spawn_fleet(
    config: &SimulationConfig,
    index: &GeofenceIndex,
    start: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Result<Vec<Container>, EngineError> {
    let planner = JourneyPlanner::new();
    let generator = RouteGenerator::new(route_config(config));
    let tuning = container_tuning(config);

    let mut fleet = Vec::new();

    for _ in 0..config.fleet.initial_containers {
        let journey = planner.select(index, rng)?;
        let route = generator.generate(
            &journey.origin_terminal,
            &journey.destination_terminal,
            journey.destination_rail_ramp.as_ref(),
            rng,
        );
        let metadata = ContainerMetadata::generate(rng);

        debug!(
            container = %metadata.container_id,
            origin = %journey.origin_terminal.name,
            destination = %journey.destination_terminal.name,
            waypoints = route.len(),
            validated = route.validated,
            "container spawned"
        );

        fleet.push(Container::new(metadata, route, tuning, start));
    }

    Ok(fleet)
}

/// Route generation tuning from the loaded configuration.
const fn route_config(config: &SimulationConfig) -> RouteConfig {
    RouteConfig {
        rail_probability: config.routing.rail_probability,
        max_deviation_km: config.routing.max_deviation_km,
        nudge_retries: config.routing.nudge_retries,
        transit_spacing_km: config.routing.transit_spacing_km,
    }
}

/// Container behavior tuning from the loaded configuration.
const fn container_tuning(config: &SimulationConfig) -> ContainerTuning {
    ContainerTuning {
        dwell_probability: config.behavior.dwell_probability,
        dwell_min_minutes: config.behavior.dwell_min_minutes,
        dwell_max_minutes: config.behavior.dwell_max_minutes,
        ping_interval_minutes: config.behavior.ping_interval_minutes,
        door_probability: config.behavior.door_probability,
        fault_threshold: config.behavior.fault_threshold,
    }
}
