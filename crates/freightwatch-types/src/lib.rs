//! Shared type definitions for the Freightwatch container simulation.
//!
//! This crate is the single source of truth for all types used across the
//! Freightwatch workspace: identifiers, transport/event enumerations, the
//! external telemetry schema, and route/alert records.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (transport modes, event kinds, geofence kinds)
//! - [`position`] -- Geographic position with longitude normalization
//! - [`route`] -- Waypoints and routes produced by the route generator
//! - [`telemetry`] -- The external telemetry schema, gate events, and alerts
//! - [`metadata`] -- Container identity metadata and generators

pub mod enums;
pub mod ids;
pub mod metadata;
pub mod position;
pub mod route;
pub mod telemetry;

// Re-export all public types at crate root for convenience.
pub use enums::{EventKind, GateDirection, GeofenceKind, TransportMode};
pub use ids::{AlertId, ContainerId, GeofenceId};
pub use metadata::ContainerMetadata;
pub use position::{normalize_lon, Position};
pub use route::{Route, Waypoint, WaypointKind};
pub use telemetry::{AlertRecord, GateEvent, TelemetryEvent};
