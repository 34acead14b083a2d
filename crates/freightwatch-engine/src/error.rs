//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: freightwatch_sim::ConfigError,
    },

    /// Geofence loading or index construction failed.
    #[error("geofence error: {source}")]
    Geo {
        /// The underlying geofence error.
        #[from]
        source: freightwatch_geo::GeoError,
    },

    /// Fleet spawning failed.
    #[error("spawn error: {source}")]
    Spawn {
        /// The underlying routing error.
        #[from]
        source: freightwatch_routing::RouteError,
    },
}
