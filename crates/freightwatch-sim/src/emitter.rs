//! Rendering tick events into the external telemetry schema.
//!
//! The emitter is pure: it maps a semantic event plus container identity
//! and optional geofence context into a [`TelemetryEvent`]. The only
//! randomness is the transmission delay between the event happening and
//! the tracker reporting it, which keeps `ReportTime >= EventTime`.

use chrono::Duration;
use freightwatch_geo::Geofence;
use freightwatch_types::{ContainerMetadata, TelemetryEvent};
use rand::Rng;

use crate::container::TickEvent;

/// Renders [`TickEvent`]s into [`TelemetryEvent`]s.
#[derive(Debug, Clone, Copy)]
pub struct EventEmitter {
    /// Shortest transmission delay, seconds.
    pub report_delay_min_secs: i64,
    /// Longest transmission delay, seconds.
    pub report_delay_max_secs: i64,
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self {
            report_delay_min_secs: 30,
            report_delay_max_secs: 600,
        }
    }
}

impl EventEmitter {
    /// Render one event. `location` is the most specific geofence
    /// containing the event position, when any.
    pub fn render(
        &self,
        metadata: &ContainerMetadata,
        event: TickEvent,
        location: Option<&Geofence>,
        rng: &mut impl Rng,
    ) -> TelemetryEvent {
        let delay_secs = rng.random_range(self.report_delay_min_secs..=self.report_delay_max_secs);
        let report_time = event
            .time
            .checked_add_signed(Duration::seconds(delay_secs))
            .unwrap_or(event.time);

        TelemetryEvent {
            tracker_id: metadata.tracker_id.clone(),
            asset_name: metadata.container_id.clone(),
            event_time: event.time,
            report_time,
            event_type: event.kind,
            lat: event.position.lat,
            lon: event.position.lon,
            event_location: location.map(|f| f.name.clone()),
            event_location_country: location.and_then(|f| f.country().map(str::to_owned)),
        }
    }
}
