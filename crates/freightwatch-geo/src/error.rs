//! Error types for the `freightwatch-geo` crate.

/// Errors that can occur during geofence operations.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// The index was constructed with no geofences at all. This is the
    /// one fatal startup condition: a run without reference data cannot
    /// detect anything.
    #[error("geofence index is empty: no reference data loaded")]
    EmptyIndex,

    /// A geofence polygon has fewer than three vertices.
    #[error("geofence {name} has a degenerate polygon ({vertices} vertices)")]
    DegeneratePolygon {
        /// Name of the offending geofence.
        name: String,
        /// Number of vertices found.
        vertices: usize,
    },

    /// A geofence references a parent that does not exist in the same set.
    #[error("geofence {name} references unknown parent {parent}")]
    UnknownParent {
        /// Name of the child geofence.
        name: String,
        /// The missing parent name.
        parent: String,
    },

    /// Failed to read a GeoJSON source file.
    #[error("failed to read geofence file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse GeoJSON content.
    #[error("failed to parse GeoJSON: {source}")]
    Json {
        /// The underlying JSON parse error.
        #[from]
        source: serde_json::Error,
    },

    /// A GeoJSON feature is missing a required property or has an
    /// unsupported geometry.
    #[error("invalid GeoJSON feature: {reason}")]
    InvalidFeature {
        /// Explanation of what is wrong with the feature.
        reason: String,
    },
}
