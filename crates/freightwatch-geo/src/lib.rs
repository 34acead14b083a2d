//! Geofences, containment, and gate detection for the Freightwatch simulation.
//!
//! This crate models the geographic reference data: geofence polygons with
//! optional parent nesting, an immutable containment index with a coarse
//! bounding-box prefilter, the gate detector that turns consecutive
//! containment sets into entry/exit transitions, and the spherical geodesy
//! helpers used by both the router and the state machine.
//!
//! # Modules
//!
//! - [`error`] -- Error types for geofence operations.
//! - [`geodesy`] -- Haversine distance, great-circle interpolation,
//!   destination points (spherical approximations).
//! - [`geofence`] -- [`Geofence`] polygons with precomputed bounding boxes.
//! - [`geojson`] -- Loading geofences from GeoJSON feature collections.
//! - [`index`] -- [`GeofenceIndex`]: which polygons contain a point.
//! - [`gate`] -- [`GateDetector`]: containment-set diffing into gate events.
//!
//! [`Geofence`]: geofence::Geofence
//! [`GeofenceIndex`]: index::GeofenceIndex
//! [`GateDetector`]: gate::GateDetector

pub mod error;
pub mod gate;
pub mod geodesy;
pub mod geofence;
pub mod geojson;
pub mod index;

pub use error::GeoError;
pub use gate::GateDetector;
pub use geofence::{BoundingBox, Geofence};
pub use geojson::load_geojson;
pub use index::GeofenceIndex;
