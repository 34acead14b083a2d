//! Enumeration types for the Freightwatch simulation.
//!
//! Transport modes, geofence kinds, and the telemetry event vocabulary.
//! [`EventKind`] serializes to the exact strings the downstream telemetry
//! consumers expect ("In Motion", "Gate In", ...) -- those names are part
//! of the external contract and must never change.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transport modes
// ---------------------------------------------------------------------------

/// How a container moves along one leg of its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Ocean transit aboard a vessel.
    Sea,
    /// Inland rail transit between a rail ramp and a terminal or depot.
    Rail,
    /// Short drayage legs inside yards and between nearby facilities.
    Yard,
}

impl TransportMode {
    /// Nominal speed for this mode in kilometers per simulated hour.
    ///
    /// Sea speed corresponds to roughly 18 knots, the average service
    /// speed of a container vessel.
    pub const fn speed_kmh(self) -> f64 {
        match self {
            Self::Sea => 33.0,
            Self::Rail => 70.0,
            Self::Yard => 25.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Geofence kinds
// ---------------------------------------------------------------------------

/// The kind of facility a geofence polygon describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeofenceKind {
    /// A container terminal at a port.
    Terminal,
    /// An inland container depot.
    Depot,
    /// An intermodal rail ramp.
    RailRamp,
}

impl GeofenceKind {
    /// External string form, matching the geofence management surface
    /// (`properties.typeId` in imported GeoJSON).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "Terminal",
            Self::Depot => "Depot",
            Self::RailRamp => "Rail ramp",
        }
    }

    /// Parse the external string form. Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Terminal" => Some(Self::Terminal),
            "Depot" => Some(Self::Depot),
            "Rail ramp" => Some(Self::RailRamp),
            _ => None,
        }
    }
}

impl core::fmt::Display for GeofenceKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Telemetry event kinds
// ---------------------------------------------------------------------------

/// Kind of a telemetry event emitted by a container tracker.
///
/// The serialized names are fixed external contract -- downstream
/// consumers match on these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The container started moving.
    #[serde(rename = "In Motion")]
    InMotion,
    /// The container stopped moving.
    #[serde(rename = "Motion Stop")]
    MotionStop,
    /// Periodic location ping.
    #[serde(rename = "Location Update")]
    LocationUpdate,
    /// The container door was opened.
    #[serde(rename = "Door Opened")]
    DoorOpened,
    /// The container door was closed.
    #[serde(rename = "Door Closed")]
    DoorClosed,
    /// The container entered a geofence.
    #[serde(rename = "Gate In")]
    GateIn,
    /// The container left a geofence.
    #[serde(rename = "Gate Out")]
    GateOut,
}

impl EventKind {
    /// The external string form used in the telemetry schema.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InMotion => "In Motion",
            Self::MotionStop => "Motion Stop",
            Self::LocationUpdate => "Location Update",
            Self::DoorOpened => "Door Opened",
            Self::DoorClosed => "Door Closed",
            Self::GateIn => "Gate In",
            Self::GateOut => "Gate Out",
        }
    }
}

impl core::fmt::Display for EventKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gate direction
// ---------------------------------------------------------------------------

/// Direction of a derived gate transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateDirection {
    /// The container's containment set gained this geofence.
    In,
    /// The container's containment set lost this geofence.
    Out,
}

impl GateDirection {
    /// The corresponding telemetry [`EventKind`].
    pub const fn event_kind(self) -> EventKind {
        match self {
            Self::In => EventKind::GateIn,
            Self::Out => EventKind::GateOut,
        }
    }
}
