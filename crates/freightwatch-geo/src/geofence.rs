//! Geofence polygons with precomputed bounding boxes.
//!
//! A [`Geofence`] is immutable reference data: a named polygon around a
//! terminal, depot, or rail ramp. Nesting is expressed as a flat optional
//! parent name, not a tree -- containment queries return a set and "most
//! specific" is a derived question answered by the index.

use freightwatch_types::{GeofenceId, GeofenceKind, Position};
use serde::{Deserialize, Serialize};

use crate::error::GeoError;

/// Axis-aligned bounding box used as a coarse containment prefilter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum latitude.
    pub min_lat: f64,
    /// Minimum longitude.
    pub min_lon: f64,
    /// Maximum latitude.
    pub max_lat: f64,
    /// Maximum longitude.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Compute the bounding box of a vertex list.
    ///
    /// Returns `None` for an empty list.
    pub fn of(vertices: &[Position]) -> Option<Self> {
        let first = vertices.first()?;
        let mut bbox = Self {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        };
        for v in vertices {
            bbox.min_lat = bbox.min_lat.min(v.lat);
            bbox.min_lon = bbox.min_lon.min(v.lon);
            bbox.max_lat = bbox.max_lat.max(v.lat);
            bbox.max_lon = bbox.max_lon.max(v.lon);
        }
        Some(bbox)
    }

    /// Whether a point falls inside (or on the edge of) this box.
    pub fn contains(&self, p: Position) -> bool {
        p.lat >= self.min_lat
            && p.lat <= self.max_lat
            && p.lon >= self.min_lon
            && p.lon <= self.max_lon
    }
}

/// A named geofence polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    /// Unique identifier.
    pub id: GeofenceId,
    /// Geofence name, unique within one index. By convention the first
    /// two characters are the ISO country code (UN/LOCODE prefix).
    pub name: String,
    /// Facility kind.
    pub kind: GeofenceKind,
    /// Polygon vertices in order. The closing vertex is implicit; the
    /// polygon must have at least three vertices.
    pub polygon: Vec<Position>,
    /// Optional enclosing geofence name (e.g. a rail ramp inside a
    /// terminal complex).
    pub parent: Option<String>,
    /// Precomputed bounding box of the polygon.
    pub bbox: BoundingBox,
}

impl Geofence {
    /// Create a geofence, validating and precomputing its bounding box.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::DegeneratePolygon`] if the polygon has fewer
    /// than three vertices.
    pub fn new(
        name: impl Into<String>,
        kind: GeofenceKind,
        polygon: Vec<Position>,
        parent: Option<String>,
    ) -> Result<Self, GeoError> {
        let name = name.into();
        let Some(bbox) = BoundingBox::of(&polygon) else {
            return Err(GeoError::DegeneratePolygon { name, vertices: 0 });
        };
        if polygon.len() < 3 {
            return Err(GeoError::DegeneratePolygon {
                name,
                vertices: polygon.len(),
            });
        }
        Ok(Self {
            id: GeofenceId::new(),
            name,
            kind,
            polygon,
            parent,
            bbox,
        })
    }

    /// The ISO country code derived from the UN/LOCODE name prefix,
    /// or `None` when the name is too short.
    pub fn country(&self) -> Option<&str> {
        self.name.get(0..2)
    }

    /// Whether the point lies inside this polygon.
    ///
    /// Standard ray-casting (even-odd rule): a point is inside when a
    /// ray cast to the east crosses the boundary an odd number of
    /// times. Points exactly on an edge may land on either side; the
    /// facility polygons here are far larger than that ambiguity.
    pub fn contains(&self, p: Position) -> bool {
        if !self.bbox.contains(p) {
            return false;
        }
        let mut inside = false;
        let n = self.polygon.len();
        let mut j = n.saturating_sub(1);
        for i in 0..n {
            let (Some(vi), Some(vj)) = (self.polygon.get(i), self.polygon.get(j)) else {
                return false;
            };
            let crosses = (vi.lat > p.lat) != (vj.lat > p.lat)
                && p.lon
                    < (vj.lon - vi.lon) * (p.lat - vi.lat) / (vj.lat - vi.lat) + vi.lon;
            if crosses {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Centroid of the polygon (vertex average, matching how the route
    /// generator anchors journeys at facilities).
    pub fn centroid(&self) -> Position {
        let n = self.polygon.len().max(1);
        let (lat_sum, lon_sum) = self
            .polygon
            .iter()
            .fold((0.0_f64, 0.0_f64), |(la, lo), v| (la + v.lat, lo + v.lon));
        #[allow(clippy::cast_precision_loss)]
        Position::new(lat_sum / n as f64, lon_sum / n as f64)
    }
}

/// Build a small square geofence centered on a point, `half_side_deg`
/// degrees to each side. Convenience for the demo world and tests.
pub fn square_fence(
    name: impl Into<String>,
    kind: GeofenceKind,
    center: Position,
    half_side_deg: f64,
    parent: Option<String>,
) -> Result<Geofence, GeoError> {
    let d = half_side_deg;
    Geofence::new(
        name,
        kind,
        vec![
            Position::new(center.lat - d, center.lon - d),
            Position::new(center.lat - d, center.lon + d),
            Position::new(center.lat + d, center.lon + d),
            Position::new(center.lat + d, center.lon - d),
        ],
        parent,
    )
}
