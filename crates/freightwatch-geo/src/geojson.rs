//! GeoJSON geofence import.
//!
//! Loads a `FeatureCollection` of `Polygon` features into [`Geofence`]
//! values. Each feature carries its metadata in `properties`:
//! `name` (required, UN/LOCODE-prefixed by convention), `typeId`
//! (required, one of the [`GeofenceKind`] external names), and an
//! optional `parent` naming an enclosing fence. Only the outer ring of
//! each polygon is used; holes are not supported.

use std::path::Path;

use freightwatch_types::{GeofenceKind, Position};
use serde::Deserialize;
use tracing::debug;

use crate::error::GeoError;
use crate::geofence::Geofence;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Properties {
    name: String,
    #[serde(rename = "typeId")]
    type_id: String,
    #[serde(default)]
    parent: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    /// Outer ring plus optional holes; holes are ignored.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

/// Load geofences from a GeoJSON file on disk.
///
/// # Errors
///
/// Fails on I/O or JSON errors, on features missing a usable outer
/// ring, on unknown `typeId` values, and on degenerate polygons.
pub fn load_geojson(path: &Path) -> Result<Vec<Geofence>, GeoError> {
    let raw = std::fs::read_to_string(path)?;
    let fences = parse_geojson(&raw)?;
    debug!(path = %path.display(), count = fences.len(), "loaded geofences");
    Ok(fences)
}

/// Parse a GeoJSON `FeatureCollection` string into geofences.
///
/// # Errors
///
/// See [`load_geojson`].
pub fn parse_geojson(raw: &str) -> Result<Vec<Geofence>, GeoError> {
    let collection: FeatureCollection = serde_json::from_str(raw)?;
    let mut fences = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let Some(kind) = GeofenceKind::parse(&feature.properties.type_id) else {
            return Err(GeoError::InvalidFeature {
                reason: format!(
                    "feature '{}' has unknown typeId '{}'",
                    feature.properties.name, feature.properties.type_id
                ),
            });
        };
        let Geometry::Polygon { coordinates } = feature.geometry;
        let Some(outer) = coordinates.first() else {
            return Err(GeoError::InvalidFeature {
                reason: format!("feature '{}' has no outer ring", feature.properties.name),
            });
        };
        // GeoJSON rings are closed; drop the repeated closing vertex.
        let mut vertices: Vec<Position> = outer
            .iter()
            .map(|&[lon, lat]| Position::new(lat, lon))
            .collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        fences.push(Geofence::new(
            feature.properties.name,
            kind,
            vertices,
            feature.properties.parent,
        )?);
    }
    Ok(fences)
}
