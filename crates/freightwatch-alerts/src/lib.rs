//! Alerting pipeline for Freightwatch.
//!
//! Gate events flow from the scheduler into a bounded queue, through the
//! deduplicating pipeline, and into the in-memory alert store. The
//! pipeline never applies backpressure to telemetry production: when the
//! queue is full the newest event is dropped and counted.
//!
//! # Modules
//!
//! - [`queue`] -- Bounded gate-event queue with drop-newest overflow.
//! - [`pipeline`] -- [`AlertPipeline`]: gate-in filtering and dedup.
//! - [`store`] -- [`AlertStore`]: capped newest-first alert history.
//! - [`sink`] -- [`AlertSink`] seam with retry-then-drop delivery.
//!
//! [`AlertPipeline`]: pipeline::AlertPipeline
//! [`AlertStore`]: store::AlertStore
//! [`AlertSink`]: sink::AlertSink

pub mod pipeline;
pub mod queue;
pub mod sink;
pub mod store;

pub use pipeline::AlertPipeline;
pub use queue::{bounded_gate_queue, GateReceiver, GateSender};
pub use sink::{AlertSink, AlertSinkError, LogAlertSink};
pub use store::AlertStore;
