//! The alert delivery seam.
//!
//! Mirrors the telemetry sink contract: best-effort async delivery with
//! one bounded retry, then the alert is dropped from the delivery path
//! (it remains in the store) and the failure is counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use freightwatch_types::AlertRecord;
use tracing::{info, warn};

/// Where raised alerts are delivered.
#[async_trait::async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one alert. Errors are retried once by the pipeline.
    async fn deliver(&self, alert: &AlertRecord) -> Result<(), AlertSinkError>;
}

/// Opaque alert delivery failure.
#[derive(Debug, thiserror::Error)]
#[error("alert sink failure: {reason}")]
pub struct AlertSinkError {
    /// Human-readable failure description.
    pub reason: String,
}

/// Backoff before the single retry, real milliseconds.
const RETRY_BACKOFF_MS: u64 = 50;

/// Deliver with retry-then-drop semantics. Returns whether delivery
/// succeeded; a failure increments `failures`.
pub async fn deliver_alert(
    sink: &dyn AlertSink,
    alert: &AlertRecord,
    failures: &Arc<AtomicU64>,
) -> bool {
    if sink.deliver(alert).await.is_ok() {
        return true;
    }
    tokio::time::sleep(tokio::time::Duration::from_millis(RETRY_BACKOFF_MS)).await;
    match sink.deliver(alert).await {
        Ok(()) => true,
        Err(error) => {
            let total = failures.fetch_add(1, Ordering::Relaxed).saturating_add(1);
            warn!(
                alert = %alert.id,
                container = %alert.container_id,
                %error,
                total_failures = total,
                "alert delivery failed after retry"
            );
            false
        }
    }
}

/// A sink that logs each alert as a structured line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

#[async_trait::async_trait]
impl AlertSink for LogAlertSink {
    async fn deliver(&self, alert: &AlertRecord) -> Result<(), AlertSinkError> {
        info!(
            alert = %alert.id,
            container = %alert.container_id,
            asset = %alert.asset_name,
            geofence = %alert.geofence_name,
            kind = %alert.geofence_kind,
            "alert raised"
        );
        Ok(())
    }
}
