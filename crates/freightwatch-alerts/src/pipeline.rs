//! The deduplicating alert pipeline.
//!
//! Consumes gate events from the bounded queue. Only gate-ins raise
//! alerts; a pair `(container, geofence)` raises at most one alert
//! while the container remains inside, and the matching gate-out clears
//! the pair so a later re-entry alerts again. Processing the same
//! gate-in twice is therefore a no-op, which makes redelivery safe.

use std::collections::HashSet;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use chrono::Utc;
use freightwatch_types::{AlertId, AlertRecord, ContainerId, GateDirection, GateEvent};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::queue::GateReceiver;
use crate::sink::{deliver_alert, AlertSink};
use crate::store::AlertStore;

/// Consumes gate events and raises deduplicated alerts.
pub struct AlertPipeline {
    store: Arc<Mutex<AlertStore>>,
    sink: Option<Arc<dyn AlertSink>>,
    active: HashSet<(ContainerId, String)>,
    raised: u64,
    delivery_failures: Arc<AtomicU64>,
}

impl AlertPipeline {
    /// Create a pipeline writing into `store`, optionally delivering
    /// each alert to `sink`.
    #[must_use]
    pub fn new(store: Arc<Mutex<AlertStore>>, sink: Option<Arc<dyn AlertSink>>) -> Self {
        Self {
            store,
            sink,
            active: HashSet::new(),
            raised: 0,
            delivery_failures: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Total alerts raised so far.
    #[must_use]
    pub const fn raised(&self) -> u64 {
        self.raised
    }

    /// Delivery failure counter, shared with the delivery path.
    #[must_use]
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Run until the queue closes.
    pub async fn run(&mut self, mut receiver: GateReceiver) {
        info!("alert pipeline started");
        while let Some(event) = receiver.recv().await {
            self.process(event).await;
        }
        info!(raised = self.raised, "alert pipeline stopped, queue closed");
    }

    /// Process one gate event.
    pub async fn process(&mut self, event: GateEvent) {
        let pair = (event.container_id, event.geofence_name.clone());
        match event.direction {
            GateDirection::Out => {
                self.active.remove(&pair);
            }
            GateDirection::In => {
                if !self.active.insert(pair) {
                    debug!(
                        container = %event.container_id,
                        geofence = %event.geofence_name,
                        "suppressed duplicate gate-in alert"
                    );
                    return;
                }
                let alert = AlertRecord {
                    id: AlertId::new(),
                    container_id: event.container_id,
                    asset_name: event.asset_name,
                    geofence_name: event.geofence_name,
                    geofence_kind: event.geofence_kind,
                    timestamp: event.timestamp,
                    acknowledged: false,
                    created_at: Utc::now(),
                };
                if let Some(sink) = &self.sink {
                    deliver_alert(sink.as_ref(), &alert, &self.delivery_failures).await;
                }
                self.store.lock().await.push(alert);
                self.raised = self.raised.saturating_add(1);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::queue::bounded_gate_queue;
    use crate::sink::AlertSinkError;
    use freightwatch_types::GeofenceKind;
    use std::sync::atomic::Ordering;

    fn gate(
        container: ContainerId,
        name: &str,
        direction: GateDirection,
    ) -> GateEvent {
        GateEvent {
            container_id: container,
            asset_name: "FWCU1234567".to_owned(),
            geofence_name: name.to_owned(),
            geofence_kind: GeofenceKind::Terminal,
            timestamp: Utc::now(),
            direction,
        }
    }

    fn pipeline() -> (AlertPipeline, Arc<Mutex<AlertStore>>) {
        let store = Arc::new(Mutex::new(AlertStore::new(100)));
        (AlertPipeline::new(Arc::clone(&store), None), store)
    }

    #[tokio::test]
    async fn gate_in_raises_one_alert() {
        let (mut pipeline, store) = pipeline();
        let container = ContainerId::new();

        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        assert_eq!(store.lock().await.len(), 1);
        assert_eq!(pipeline.raised(), 1);
    }

    #[tokio::test]
    async fn duplicate_gate_in_is_suppressed() {
        let (mut pipeline, store) = pipeline();
        let container = ContainerId::new();

        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        assert_eq!(store.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn gate_out_clears_pair_for_reentry() {
        let (mut pipeline, store) = pipeline();
        let container = ContainerId::new();

        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::Out)).await;
        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        assert_eq!(store.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn gate_out_alone_raises_nothing() {
        let (mut pipeline, store) = pipeline();
        let container = ContainerId::new();

        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::Out)).await;
        assert!(store.lock().await.is_empty());
    }

    #[tokio::test]
    async fn distinct_pairs_alert_independently() {
        let (mut pipeline, store) = pipeline();
        let a = ContainerId::new();
        let b = ContainerId::new();

        pipeline.process(gate(a, "NLRTM Terminal", GateDirection::In)).await;
        pipeline.process(gate(b, "NLRTM Terminal", GateDirection::In)).await;
        pipeline.process(gate(a, "DEHAM Depot", GateDirection::In)).await;
        assert_eq!(store.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn run_drains_queue_until_close() {
        let (mut pipeline, store) = pipeline();
        let (tx, rx) = bounded_gate_queue(16);
        let container = ContainerId::new();

        tx.offer(gate(container, "NLRTM Terminal", GateDirection::In));
        tx.offer(gate(container, "NLRTM Terminal", GateDirection::Out));
        tx.offer(gate(container, "NLRTM Terminal", GateDirection::In));
        drop(tx);

        pipeline.run(rx).await;
        assert_eq!(store.lock().await.len(), 2);
    }

    /// Sink that always fails; alerts still land in the store.
    struct BrokenSink;

    #[async_trait::async_trait]
    impl AlertSink for BrokenSink {
        async fn deliver(&self, _alert: &AlertRecord) -> Result<(), AlertSinkError> {
            Err(AlertSinkError {
                reason: "unreachable".to_owned(),
            })
        }
    }

    #[tokio::test]
    async fn sink_failure_counts_but_keeps_alert() {
        let store = Arc::new(Mutex::new(AlertStore::new(100)));
        let mut pipeline = AlertPipeline::new(Arc::clone(&store), Some(Arc::new(BrokenSink)));
        let container = ContainerId::new();

        pipeline.process(gate(container, "NLRTM Terminal", GateDirection::In)).await;
        assert_eq!(store.lock().await.len(), 1);
        assert_eq!(pipeline.delivery_failures.load(Ordering::SeqCst), 1);
    }
}
