//! Waypoints and routes produced by the route generator.
//!
//! A [`Route`] is an ordered, non-empty waypoint sequence owned exclusively
//! by one container for its lifetime. The first waypoint is the journey
//! origin and the last is the destination; everything in between is either
//! generated ocean/land interpolation or a named chokepoint transit.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::enums::TransportMode;
use crate::position::Position;

/// What a waypoint represents along the journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaypointKind {
    /// The journey origin facility.
    Origin,
    /// A generated intermediate transit point.
    Transit,
    /// A named maritime chokepoint (strait or canal).
    Chokepoint(String),
    /// An intermodal rail ramp.
    RailRamp,
    /// A yard handling point where the transport mode changes.
    Yard,
    /// The journey destination facility.
    Destination,
}

/// One point in a route with its transport mode and target timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position of this waypoint.
    pub position: Position,
    /// Transport mode of the leg *arriving* at this waypoint.
    pub mode: TransportMode,
    /// Target arrival offset from journey start.
    #[serde(with = "duration_seconds")]
    pub arrival_offset: Duration,
    /// What this waypoint represents.
    pub kind: WaypointKind,
}

/// An ordered waypoint sequence for one container journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Waypoints in travel order. Never empty; first is the origin and
    /// last is the destination.
    pub waypoints: Vec<Waypoint>,
    /// Whether every sea segment passed water validation. Routes that
    /// fell back to a direct great-circle segment are marked `false`.
    pub validated: bool,
}

impl Route {
    /// The origin waypoint.
    pub fn origin(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// The destination waypoint.
    pub fn destination(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Number of waypoints in the route.
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the route has no waypoints. A well-formed route is never
    /// empty; this exists for corrupt-state detection in the scheduler.
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// The ordered transport-mode sequence, one entry per waypoint.
    pub fn mode_sequence(&self) -> Vec<TransportMode> {
        self.waypoints.iter().map(|w| w.mode).collect()
    }
}

/// Serde helper storing `chrono::Duration` as whole seconds.
mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        d.num_seconds().serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(d)?;
        Ok(Duration::seconds(secs))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wp(lat: f64, lon: f64, mode: TransportMode, kind: WaypointKind) -> Waypoint {
        Waypoint {
            position: Position::new(lat, lon),
            mode,
            arrival_offset: Duration::hours(1),
            kind,
        }
    }

    #[test]
    fn origin_and_destination_are_endpoints() {
        let route = Route {
            waypoints: vec![
                wp(31.2, 121.5, TransportMode::Yard, WaypointKind::Origin),
                wp(1.25, 103.8, TransportMode::Sea, WaypointKind::Transit),
                wp(51.9, 4.1, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        };
        assert_eq!(route.origin().unwrap().kind, WaypointKind::Origin);
        assert_eq!(route.destination().unwrap().kind, WaypointKind::Destination);
        assert_eq!(route.len(), 3);
        assert!(!route.is_empty());
    }

    #[test]
    fn duration_roundtrips_through_serde() {
        let route = Route {
            waypoints: vec![wp(0.0, 0.0, TransportMode::Sea, WaypointKind::Origin)],
            validated: false,
        };
        let json = serde_json::to_string(&route).unwrap();
        let back: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(route, back);
    }
}
