//! The bounded gate-event queue.
//!
//! Decouples gate detection from alert processing. The channel is
//! bounded; when the pipeline falls behind, `try_send` fails and the
//! newest event is dropped rather than blocking the tick loop. Drops
//! are counted and logged so a congested pipeline is visible without
//! ever slowing telemetry production.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use freightwatch_types::GateEvent;
use tokio::sync::mpsc;
use tracing::warn;

/// Producer half of the gate-event queue.
#[derive(Debug, Clone)]
pub struct GateSender {
    tx: mpsc::Sender<GateEvent>,
    dropped: Arc<AtomicU64>,
}

/// Consumer half of the gate-event queue.
pub type GateReceiver = mpsc::Receiver<GateEvent>;

/// Create a bounded gate-event queue with the given capacity.
#[must_use]
pub fn bounded_gate_queue(capacity: usize) -> (GateSender, GateReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        GateSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        rx,
    )
}

impl GateSender {
    /// Offer an event without blocking. A full queue drops the event,
    /// increments the drop counter, and returns `false`.
    pub fn offer(&self, event: GateEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event) | mpsc::error::TrySendError::Closed(event)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed).saturating_add(1);
                warn!(
                    container = %event.container_id,
                    geofence = %event.geofence_name,
                    total_dropped = total,
                    "gate event dropped, queue full or closed"
                );
                false
            }
        }
    }

    /// Total events dropped so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
