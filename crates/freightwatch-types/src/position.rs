//! Geographic position in decimal degrees.
//!
//! Positions are plain `(lat, lon)` pairs. Longitude is normalized to
//! the `[-180, 180]` range on construction so dateline-crossing routes
//! compare consistently everywhere downstream.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude, -90 to 90.
    pub lat: f64,
    /// Longitude, normalized to -180 to 180.
    pub lon: f64,
}

impl Position {
    /// Create a position, normalizing longitude into `[-180, 180]`.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon: normalize_lon(lon),
        }
    }
}

/// Normalize a longitude value into the `[-180, 180]` range.
pub fn normalize_lon(mut lon: f64) -> f64 {
    while lon > 180.0 {
        lon -= 360.0;
    }
    while lon < -180.0 {
        lon += 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longitude_normalizes_on_construction() {
        let p = Position::new(35.0, 190.0);
        assert_eq!(p.lon, -170.0);
        let q = Position::new(35.0, -190.0);
        assert_eq!(q.lon, 170.0);
    }

    #[test]
    fn in_range_longitude_unchanged() {
        let p = Position::new(51.9, 4.1);
        assert_eq!(p.lon, 4.1);
        assert_eq!(p.lat, 51.9);
    }
}
