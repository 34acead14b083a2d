//! The telemetry delivery seam.
//!
//! Sinks receive rendered telemetry events asynchronously. Delivery is
//! best-effort: a failed append is retried once after a short backoff,
//! then the event is dropped and counted. A slow or failing sink must
//! never hold up ticking the rest of the fleet, so the scheduler treats
//! drops as a health signal rather than an error.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use freightwatch_types::TelemetryEvent;
use tracing::{info, warn};

/// Where rendered telemetry events go.
#[async_trait::async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Append one event. Errors are retried once by the deliverer.
    async fn append(&self, event: &TelemetryEvent) -> Result<(), SinkError>;
}

/// Opaque sink failure.
#[derive(Debug, thiserror::Error)]
#[error("telemetry sink failure: {reason}")]
pub struct SinkError {
    /// Human-readable failure description.
    pub reason: String,
}

/// Backoff before the single retry, real milliseconds.
const RETRY_BACKOFF_MS: u64 = 50;

/// Deliver one event with retry-then-drop semantics. Returns whether
/// the event was stored; a dropped event increments `dropped`.
pub async fn deliver(
    sink: &dyn TelemetrySink,
    event: &TelemetryEvent,
    dropped: &Arc<AtomicU64>,
) -> bool {
    if sink.append(event).await.is_ok() {
        return true;
    }
    tokio::time::sleep(tokio::time::Duration::from_millis(RETRY_BACKOFF_MS)).await;
    match sink.append(event).await {
        Ok(()) => true,
        Err(error) => {
            let total = dropped.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            warn!(
                tracker = %event.tracker_id,
                kind = %event.event_type,
                %error,
                total_dropped = total,
                "telemetry event dropped after retry"
            );
            false
        }
    }
}

/// A sink that logs every event as a structured line. The default when
/// no external sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait::async_trait]
impl TelemetrySink for LogSink {
    async fn append(&self, event: &TelemetryEvent) -> Result<(), SinkError> {
        info!(
            tracker = %event.tracker_id,
            asset = %event.asset_name,
            kind = %event.event_type,
            lat = event.lat,
            lon = event.lon,
            location = event.event_location.as_deref().unwrap_or("-"),
            "telemetry"
        );
        Ok(())
    }
}
