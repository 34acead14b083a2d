//! Built-in demo world used when no GeoJSON source is configured.
//!
//! Eight container terminals at real port locations, named by their
//! UN/LOCODE so the country prefix drives region classification and
//! journey facility matching. Most ports also get an inland depot;
//! three get a rail ramp nested inside the terminal complex, which
//! makes journeys ending there rail-eligible.

use freightwatch_geo::geofence::square_fence;
use freightwatch_geo::{GeoError, Geofence};
use freightwatch_types::{GeofenceKind, Position};

/// Port entry: UN/LOCODE, terminal center, whether it gets a depot and
/// a rail ramp.
struct Port {
    locode: &'static str,
    lat: f64,
    lon: f64,
    depot: bool,
    rail_ramp: bool,
}

const PORTS: &[Port] = &[
    Port { locode: "CNSHA", lat: 31.35, lon: 121.65, depot: true, rail_ramp: false },
    Port { locode: "SGSIN", lat: 1.26, lon: 103.84, depot: true, rail_ramp: false },
    Port { locode: "NLRTM", lat: 51.95, lon: 4.14, depot: true, rail_ramp: true },
    Port { locode: "DEHAM", lat: 53.51, lon: 9.93, depot: true, rail_ramp: true },
    Port { locode: "USNYC", lat: 40.67, lon: -74.05, depot: true, rail_ramp: false },
    Port { locode: "USLAX", lat: 33.73, lon: -118.26, depot: true, rail_ramp: true },
    Port { locode: "INNSA", lat: 18.95, lon: 72.95, depot: true, rail_ramp: false },
    Port { locode: "BRSSZ", lat: -23.98, lon: -46.29, depot: false, rail_ramp: false },
];

/// Terminal squares are roughly 9 km across, matching a large container
/// terminal footprint.
const TERMINAL_HALF_DEG: f64 = 0.04;
const DEPOT_HALF_DEG: f64 = 0.03;
const RAIL_RAMP_HALF_DEG: f64 = 0.01;

/// Depots sit inland of their terminal, outside the terminal square.
const DEPOT_OFFSET_DEG: f64 = 0.25;

/// Build the demo world geofence set.
///
/// # Errors
///
/// Returns [`GeoError::DegeneratePolygon`] if a fence fails to build,
/// which cannot happen with the constants above but is propagated
/// rather than hidden.
pub fn demo_world() -> Result<Vec<Geofence>, GeoError> {
    let mut fences = Vec::new();

    for port in PORTS {
        let center = Position::new(port.lat, port.lon);
        let terminal_name = format!("{} Terminal", port.locode);

        fences.push(square_fence(
            terminal_name.clone(),
            GeofenceKind::Terminal,
            center,
            TERMINAL_HALF_DEG,
            None,
        )?);

        if port.depot {
            // Inland for the northern-hemisphere ports means away from
            // the coast; a fixed latitude offset is close enough here.
            let depot_center = Position::new(port.lat + DEPOT_OFFSET_DEG, port.lon);
            fences.push(square_fence(
                format!("{} Depot", port.locode),
                GeofenceKind::Depot,
                depot_center,
                DEPOT_HALF_DEG,
                None,
            )?);
        }

        if port.rail_ramp {
            // Nested in the terminal square so gate events report both.
            let ramp_center = Position::new(port.lat + 0.01, port.lon + 0.01);
            fences.push(square_fence(
                format!("{} Rail Ramp", port.locode),
                GeofenceKind::RailRamp,
                ramp_center,
                RAIL_RAMP_HALF_DEG,
                Some(terminal_name),
            )?);
        }
    }

    Ok(fences)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freightwatch_geo::GeofenceIndex;
    use freightwatch_routing::Region;

    use super::*;

    #[test]
    fn demo_world_builds_a_valid_index() {
        let index = GeofenceIndex::build(demo_world().unwrap()).unwrap();
        assert_eq!(index.of_kind(GeofenceKind::Terminal).len(), 8);
        assert_eq!(index.of_kind(GeofenceKind::RailRamp).len(), 3);
    }

    #[test]
    fn every_terminal_classifies_to_a_region() {
        for fence in demo_world().unwrap() {
            if fence.kind != GeofenceKind::Terminal {
                continue;
            }
            let country = fence.country().unwrap();
            let centroid = fence.centroid();
            assert!(
                Region::classify(country, centroid.lon).is_some(),
                "unclassifiable terminal {}",
                fence.name
            );
        }
    }

    #[test]
    fn rail_ramps_nest_inside_their_terminal() {
        let index = GeofenceIndex::build(demo_world().unwrap()).unwrap();
        for ramp in index.of_kind(GeofenceKind::RailRamp) {
            let parent_name = ramp.parent.as_deref().unwrap();
            let parent = index.get(parent_name).unwrap();
            assert!(parent.contains(ramp.centroid()));
        }
    }

    #[test]
    fn depots_sit_outside_the_terminal_square() {
        let index = GeofenceIndex::build(demo_world().unwrap()).unwrap();
        for depot in index.of_kind(GeofenceKind::Depot) {
            for terminal in index.of_kind(GeofenceKind::Terminal) {
                assert!(!terminal.contains(depot.centroid()));
            }
        }
    }
}
