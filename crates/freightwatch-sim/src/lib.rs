//! Container simulation core for Freightwatch.
//!
//! Drives per-container journeys along generated routes: a simulated
//! clock decoupled from wall time, the container state machine that
//! advances positions and emits telemetry, the pure event renderer, the
//! telemetry sink seam, and the batch scheduler that ticks the fleet.
//!
//! # Modules
//!
//! - [`error`] -- Simulation errors.
//! - [`config`] -- Typed YAML configuration for the whole workspace.
//! - [`clock`] -- [`SimClock`]: simulated time with a speed multiplier.
//! - [`container`] -- [`Container`] state machine and phases.
//! - [`emitter`] -- [`EventEmitter`]: rendering telemetry events.
//! - [`sink`] -- [`TelemetrySink`] seam with retry-then-drop delivery.
//! - [`runner`] -- Batch tick scheduler and control state.
//!
//! [`SimClock`]: clock::SimClock
//! [`Container`]: container::Container
//! [`EventEmitter`]: emitter::EventEmitter
//! [`TelemetrySink`]: sink::TelemetrySink

pub mod clock;
pub mod config;
pub mod container;
pub mod emitter;
pub mod error;
pub mod runner;
pub mod sink;

pub use clock::SimClock;
pub use config::{ConfigError, SimulationConfig};
pub use container::{Container, ContainerPhase, ContainerTuning, TickEvent};
pub use emitter::EventEmitter;
pub use error::SimError;
pub use runner::{ControlState, RunSummary, Scheduler, TickSummary};
pub use sink::{LogSink, SinkError, TelemetrySink};
