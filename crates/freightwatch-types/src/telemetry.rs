//! The external telemetry schema, derived gate events, and alert records.
//!
//! [`TelemetryEvent`] field names are a fixed external contract
//! (`TrackerID`, `assetname`, `EventTime`, ...). Downstream consumers
//! depend on those exact names; any future addition must be a new
//! optional field, never a rename.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::enums::{EventKind, GateDirection, GeofenceKind};
use crate::ids::{AlertId, ContainerId};

/// One telemetry event as reported by a container tracker.
///
/// `ReportTime` is always at or after `EventTime`; the gap simulates
/// transmission latency of the tracking hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Tracking device identifier (e.g. `A0000669`).
    #[serde(rename = "TrackerID")]
    pub tracker_id: String,

    /// Container identifier (e.g. `FWCU3170479`).
    #[serde(rename = "assetname")]
    pub asset_name: String,

    /// When the event occurred on the device.
    #[serde(rename = "EventTime")]
    pub event_time: DateTime<Utc>,

    /// When the event was received, at or after `EventTime`.
    #[serde(rename = "ReportTime")]
    pub report_time: DateTime<Utc>,

    /// Event kind ("In Motion", "Gate In", ...).
    #[serde(rename = "EventType")]
    pub event_type: EventKind,

    /// Latitude in decimal degrees.
    #[serde(rename = "Lat")]
    pub lat: f64,

    /// Longitude in decimal degrees.
    #[serde(rename = "Lon")]
    pub lon: f64,

    /// Geofence name for gate events; the current facility for other
    /// kinds when known, otherwise `null`.
    #[serde(rename = "EventLocation")]
    pub event_location: Option<String>,

    /// ISO country code derived from the geofence's UN/LOCODE prefix.
    #[serde(rename = "EventLocationCountry")]
    pub event_location_country: Option<String>,
}

/// A derived geofence transition, produced when a container's
/// containment set changes between consecutive readings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateEvent {
    /// The container that crossed the gate.
    pub container_id: ContainerId,
    /// External container identifier, carried for alert snapshots.
    pub asset_name: String,
    /// Name of the geofence entered or exited.
    pub geofence_name: String,
    /// Kind of the geofence.
    pub geofence_kind: GeofenceKind,
    /// Simulated time of the transition.
    pub timestamp: DateTime<Utc>,
    /// Whether the container entered or exited.
    pub direction: GateDirection,
}

/// An alert raised by the pipeline for a gate-in transition.
///
/// Alerts are append-only from the core's point of view; only the
/// external acknowledgment surface flips `acknowledged`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Unique alert identifier.
    pub id: AlertId,
    /// The container that triggered the alert.
    pub container_id: ContainerId,
    /// External container identifier.
    pub asset_name: String,
    /// Name of the geofence that was entered.
    pub geofence_name: String,
    /// Kind of the geofence.
    pub geofence_kind: GeofenceKind,
    /// Simulated time of the triggering gate-in.
    pub timestamp: DateTime<Utc>,
    /// Whether an operator has acknowledged the alert.
    pub acknowledged: bool,
    /// Wall-clock time the alert record was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn telemetry_field_names_are_fixed() {
        let event = TelemetryEvent {
            tracker_id: "A0000669".to_owned(),
            asset_name: "FWCU3170479".to_owned(),
            event_time: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
            report_time: Utc.with_ymd_and_hms(2026, 3, 1, 12, 2, 30).unwrap(),
            event_type: EventKind::GateIn,
            lat: 51.95,
            lon: 4.05,
            event_location: Some("NLRTM Terminal".to_owned()),
            event_location_country: Some("NL".to_owned()),
        };
        let value = serde_json::to_value(&event).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "TrackerID",
            "assetname",
            "EventTime",
            "ReportTime",
            "EventType",
            "Lat",
            "Lon",
            "EventLocation",
            "EventLocationCountry",
        ] {
            assert!(object.contains_key(key), "missing field {key}");
        }
        assert_eq!(object.get("EventType").unwrap(), "Gate In");
    }

    #[test]
    fn report_time_not_before_event_time() {
        let event_time = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let report_time = event_time + chrono::Duration::seconds(45);
        assert!(report_time >= event_time);
    }

    #[test]
    fn null_location_serializes_as_null() {
        let event = TelemetryEvent {
            tracker_id: "A0000001".to_owned(),
            asset_name: "FWCU0000001".to_owned(),
            event_time: Utc::now(),
            report_time: Utc::now(),
            event_type: EventKind::LocationUpdate,
            lat: 0.0,
            lon: 0.0,
            event_location: None,
            event_location_country: None,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert!(value.get("EventLocation").unwrap().is_null());
    }
}
