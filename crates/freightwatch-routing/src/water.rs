//! Water-region tables and ocean segment validation.
//!
//! The tables are deliberately coarse: named ocean and sea bounding boxes
//! (two of which wrap the antimeridian) plus conservative continental
//! boxes. A point counts as "clearly on land" only when it sits well
//! inside a continental box and outside every water region, so coastal
//! approaches never fail validation. The validator is pure; callers own
//! the retry policy.

use freightwatch_geo::geodesy::{great_circle_point, haversine_km};
use freightwatch_types::{normalize_lon, Position};

/// A lon/lat bounding box in degrees, `(min_lon, min_lat, max_lon, max_lat)`.
type Bounds = (f64, f64, f64, f64);

/// A named body of water used as a positive signal for validation.
#[derive(Debug, Clone, Copy)]
pub struct WaterRegion {
    /// Stable identifier.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    bounds: Bounds,
    /// Whether the box crosses the antimeridian (max_lon < min_lon).
    wraps_dateline: bool,
}

impl WaterRegion {
    const fn new(key: &'static str, name: &'static str, bounds: Bounds) -> Self {
        Self {
            key,
            name,
            bounds,
            wraps_dateline: false,
        }
    }

    const fn wrapping(key: &'static str, name: &'static str, bounds: Bounds) -> Self {
        Self {
            key,
            name,
            bounds,
            wraps_dateline: true,
        }
    }

    /// Whether the region's box contains the point.
    pub fn contains(&self, p: Position) -> bool {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        let lon = normalize_lon(p.lon);
        let lon_match = if self.wraps_dateline && max_lon < min_lon {
            lon >= min_lon || lon <= max_lon
        } else {
            lon >= min_lon && lon <= max_lon
        };
        lon_match && p.lat >= min_lat && p.lat <= max_lat
    }

    /// Geometric center of the box, wrap-aware.
    pub fn center(&self) -> Position {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        let lon = if self.wraps_dateline && max_lon < min_lon {
            normalize_lon((min_lon + max_lon + 360.0) / 2.0)
        } else {
            (min_lon + max_lon) / 2.0
        };
        Position::new((min_lat + max_lat) / 2.0, lon)
    }

    /// Clamp a point into the region's box, wrap-aware in longitude.
    pub fn clamp(&self, p: Position) -> Position {
        let (min_lon, min_lat, max_lon, max_lat) = self.bounds;
        let lat = p.lat.clamp(min_lat, max_lat);
        let lon = if self.wraps_dateline && max_lon < min_lon {
            // Shift into a contiguous [min, max + 360] domain.
            let mut lon = normalize_lon(p.lon);
            if lon < min_lon {
                lon += 360.0;
            }
            normalize_lon(lon.clamp(min_lon, max_lon + 360.0))
        } else {
            normalize_lon(p.lon).clamp(min_lon, max_lon)
        };
        Position::new(lat, lon)
    }
}

/// Named ocean and sea bounding boxes.
pub const WATER_REGIONS: &[WaterRegion] = &[
    WaterRegion::new("north_atlantic", "North Atlantic Ocean", (-80.0, 0.0, 0.0, 65.0)),
    WaterRegion::new("south_atlantic", "South Atlantic Ocean", (-70.0, -60.0, 20.0, 0.0)),
    WaterRegion::wrapping("north_pacific", "North Pacific Ocean", (100.0, 0.0, -100.0, 65.0)),
    WaterRegion::wrapping("south_pacific", "South Pacific Ocean", (140.0, -60.0, -70.0, 0.0)),
    WaterRegion::new("indian_ocean", "Indian Ocean", (20.0, -60.0, 120.0, 30.0)),
    WaterRegion::new("mediterranean", "Mediterranean Sea", (-6.0, 30.0, 42.0, 47.0)),
    WaterRegion::new("red_sea", "Red Sea", (32.0, 12.0, 44.0, 30.0)),
    WaterRegion::new("arabian_sea", "Arabian Sea", (45.0, 5.0, 78.0, 26.0)),
    WaterRegion::new("bay_of_bengal", "Bay of Bengal", (78.0, 5.0, 100.0, 23.0)),
    WaterRegion::new("south_china_sea", "South China Sea", (100.0, 0.0, 122.0, 25.0)),
    WaterRegion::new("east_china_sea", "East China Sea", (117.0, 23.0, 132.0, 35.0)),
    WaterRegion::new("sea_of_japan", "Sea of Japan", (127.0, 33.0, 142.0, 52.0)),
    WaterRegion::new("caribbean", "Caribbean Sea", (-90.0, 8.0, -60.0, 28.0)),
    WaterRegion::new("gulf_of_mexico", "Gulf of Mexico", (-98.0, 18.0, -80.0, 31.0)),
    WaterRegion::new("north_sea", "North Sea", (-5.0, 50.0, 10.0, 62.0)),
    WaterRegion::new("baltic_sea", "Baltic Sea", (9.0, 53.0, 30.0, 66.0)),
    WaterRegion::new("persian_gulf", "Persian Gulf", (47.0, 23.0, 57.0, 31.0)),
    WaterRegion::new("gulf_of_aden", "Gulf of Aden", (43.0, 10.0, 52.0, 16.0)),
    WaterRegion::new("malacca_strait", "Strait of Malacca", (95.0, -1.0, 105.0, 8.0)),
    WaterRegion::new("english_channel", "English Channel", (-6.0, 48.0, 2.0, 52.0)),
    WaterRegion::new("suez_canal_region", "Suez Canal Region", (31.0, 29.0, 35.0, 32.0)),
    WaterRegion::new("panama_canal_region", "Panama Canal Region", (-82.0, 7.0, -77.0, 11.0)),
];

/// Conservative continental bounding boxes, used as a negative signal.
pub const LAND_MASSES: &[(&str, Bounds)] = &[
    ("north_america", (-170.0, 25.0, -52.0, 85.0)),
    ("south_america", (-82.0, -56.0, -34.0, 12.0)),
    ("europe", (-10.0, 36.0, 40.0, 72.0)),
    ("africa", (-18.0, -35.0, 52.0, 37.0)),
    ("asia", (25.0, 1.0, 180.0, 78.0)),
    ("asia_far_east", (-180.0, 50.0, -170.0, 72.0)),
    ("australia", (113.0, -45.0, 154.0, -10.0)),
    ("india", (68.0, 6.0, 98.0, 38.0)),
];

/// Degrees a point must sit inside a continental box before it counts as
/// clearly on land. Keeps coastal approaches valid.
const COASTAL_TOLERANCE_DEG: f64 = 2.0;

/// Kilometers between validation samples along a segment.
const SAMPLE_SPACING_KM: f64 = 100.0;

/// Maximum samples per segment regardless of length.
const MAX_SAMPLES: usize = 50;

/// Pure water plausibility checks over the static tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterValidator;

impl WaterValidator {
    /// Create a validator over the built-in tables.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Whether the point falls in any named water region.
    pub fn in_water_region(self, p: Position) -> bool {
        WATER_REGIONS.iter().any(|r| r.contains(p))
    }

    /// Whether the point is clearly on land: well inside a continental
    /// box (with coastal tolerance) and outside every water region.
    pub fn clearly_on_land(self, p: Position) -> bool {
        let lon = normalize_lon(p.lon);
        let inside_continent = LAND_MASSES.iter().any(|&(_, (min_lon, min_lat, max_lon, max_lat))| {
            lon >= min_lon + COASTAL_TOLERANCE_DEG
                && lon <= max_lon - COASTAL_TOLERANCE_DEG
                && p.lat >= min_lat + COASTAL_TOLERANCE_DEG
                && p.lat <= max_lat - COASTAL_TOLERANCE_DEG
        });
        inside_continent && !self.in_water_region(p)
    }

    /// Whether a sea segment is plausible: no sample along the great
    /// circle between the endpoints is clearly on land. Endpoints are
    /// exempt, they anchor at port facilities.
    pub fn segment_is_plausible(self, a: Position, b: Position) -> bool {
        let distance = haversine_km(a, b);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let samples = ((distance / SAMPLE_SPACING_KM).ceil() as usize).clamp(2, MAX_SAMPLES);
        #[allow(clippy::cast_precision_loss)]
        (1..samples).all(|i| {
            let f = i as f64 / samples as f64;
            !self.clearly_on_land(great_circle_point(a, b, f))
        })
    }

    /// Move a failed point toward the nearest water region, clamped into
    /// its bounds. Distance is compared in squared degrees, which is
    /// enough to pick a region.
    pub fn nudge_toward_water(self, p: Position) -> Position {
        let nearest = WATER_REGIONS.iter().min_by(|a, b| {
            let da = degree_dist_sq(p, a.center());
            let db = degree_dist_sq(p, b.center());
            da.total_cmp(&db)
        });
        match nearest {
            Some(region) => region.clamp(p),
            None => p,
        }
    }
}

fn degree_dist_sq(a: Position, b: Position) -> f64 {
    let dlat = a.lat - b.lat;
    let dlon = a.lon - b.lon;
    dlat * dlat + dlon * dlon
}
