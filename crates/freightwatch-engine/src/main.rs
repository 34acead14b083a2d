//! Simulation engine binary for Freightwatch.
//!
//! This is the main entry point that wires together the geofence
//! source, the container fleet, the tick scheduler, and the alert
//! pipeline. It loads configuration, initializes all subsystems, and
//! runs the simulation loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `freightwatch-config.yaml`
//! 3. Load geofences (GeoJSON file or built-in demo world) and build
//!    the index
//! 4. Start the periodic geofence reload task when configured
//! 5. Start the alert pipeline on the bounded gate-event queue
//! 6. Spawn the initial container fleet with journeys and routes
//! 7. Install the ctrl-c stop handler
//! 8. Run the scheduler loop
//! 9. Log the run summary and alert counters

mod demo_world;
mod error;
mod reload;
mod spawn;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use freightwatch_alerts::{bounded_gate_queue, AlertPipeline, AlertStore, LogAlertSink};
use freightwatch_geo::{load_geojson, GeofenceIndex};
use freightwatch_sim::{
    ControlState, EventEmitter, LogSink, Scheduler, SimClock, SimulationConfig,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Application entry point for the simulation engine.
///
/// Initializes all subsystems and runs the scheduler loop. Returns an
/// error code on failure.
///
/// # Errors
///
/// Returns an error if any initialization step fails.
#[tokio::main]
#[allow(clippy::too_many_lines)]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("freightwatch-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        speed = config.world.speed,
        containers = config.fleet.initial_containers,
        "Configuration loaded"
    );

    // 3. Load geofences and build the index. An empty world is fatal.
    let fences = if let Some(path) = config.geofences.path.as_deref() {
        info!(path, "Loading geofences from GeoJSON");
        load_geojson(Path::new(path)).map_err(EngineError::from)?
    } else {
        info!("No geofence source configured, using built-in demo world");
        demo_world::demo_world().map_err(EngineError::from)?
    };
    let index = GeofenceIndex::build(fences).map_err(EngineError::from)?;
    info!(geofences = index.len(), "Geofence index built");

    let shared_index = Arc::new(RwLock::new(Arc::new(index)));

    // 4. Periodic geofence reload, when a file source is configured.
    let reload_handle = if config.geofences.reload_interval_secs > 0
        && let Some(path) = config.geofences.path.clone()
    {
        info!(
            interval_secs = config.geofences.reload_interval_secs,
            "Geofence reload task started"
        );
        Some(reload::spawn_reload_task(
            PathBuf::from(path),
            Duration::from_secs(config.geofences.reload_interval_secs),
            Arc::clone(&shared_index),
        ))
    } else {
        None
    };

    // 5. Alert pipeline on the bounded gate-event queue.
    let (gate_tx, gate_rx) = bounded_gate_queue(config.telemetry.queue_capacity);
    let store = Arc::new(Mutex::new(AlertStore::new(
        config.telemetry.alert_store_capacity,
    )));
    let mut pipeline = AlertPipeline::new(Arc::clone(&store), Some(Arc::new(LogAlertSink)));
    let pipeline_handle = tokio::spawn(async move {
        pipeline.run(gate_rx).await;
        (pipeline.raised(), pipeline.delivery_failures())
    });
    info!(
        queue_capacity = config.telemetry.queue_capacity,
        "Alert pipeline started"
    );

    // 6. Spawn the fleet and assemble the scheduler.
    let start = Utc::now();
    let mut rng = SmallRng::seed_from_u64(config.world.seed);
    let clock = SimClock::new(start, config.world.speed);
    let emitter = EventEmitter {
        report_delay_min_secs: config.telemetry.report_delay_min_secs,
        report_delay_max_secs: config.telemetry.report_delay_max_secs,
    };
    let mut scheduler = Scheduler::new(
        clock,
        emitter,
        Arc::clone(&shared_index),
        Arc::new(LogSink),
        gate_tx,
    );

    let fleet = {
        let snapshot = shared_index.read().await;
        spawn::spawn_fleet(&config, &snapshot, start, &mut rng)?
    };
    for container in fleet {
        scheduler.add_container(container);
    }
    info!(fleet = scheduler.fleet_size(), "Fleet spawned");

    // 7. Ctrl-c requests a stop at the next tick boundary.
    let control = Arc::new(ControlState::new());
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("ctrl-c received, stopping after current tick");
                control.request_stop();
            }
        });
    }

    // 8. Run the scheduler loop.
    let summary = scheduler
        .run(
            &control,
            config.world.max_ticks,
            config.world.tick_interval_ms,
            &mut rng,
        )
        .await;

    // 9. Close the gate queue, collect alert counters, log results.
    drop(scheduler);
    if let Some(handle) = reload_handle {
        handle.abort();
    }
    let (alerts_raised, alert_failures) = pipeline_handle.await.unwrap_or_else(|e| {
        warn!(error = %e, "alert pipeline task failed");
        (0, 0)
    });

    let active_alerts = store.lock().await.len();
    info!(
        total_ticks = summary.total_ticks,
        events_emitted = summary.events_emitted,
        telemetry_dropped = summary.telemetry_dropped,
        gate_events = summary.gate_events,
        gate_dropped = summary.gate_dropped,
        containers_removed = summary.containers_removed,
        alerts_raised,
        alert_failures,
        alerts_stored = active_alerts,
        "freightwatch-engine shutdown complete"
    );

    Ok(())
}

/// Load the main simulation configuration from `freightwatch-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new("freightwatch-config.yaml");
    if config_path.exists() {
        let config = SimulationConfig::from_file(config_path)?;
        Ok(config)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}
