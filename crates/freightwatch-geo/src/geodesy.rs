//! Spherical geodesy helpers.
//!
//! Distance and interpolation math on a spherical Earth. These are
//! standard approximations -- good to a fraction of a percent, which is
//! far tighter than the simulation needs. Nothing here models the
//! ellipsoid.

use freightwatch_types::Position;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two positions in kilometers
/// (haversine formula).
pub fn haversine_km(a: Position, b: Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Intermediate point at fraction `f` (0..=1) along the great circle
/// from `a` to `b`.
///
/// For coincident endpoints the result is `a`.
pub fn great_circle_point(a: Position, b: Position, f: f64) -> Position {
    let lat1 = a.lat.to_radians();
    let lon1 = a.lon.to_radians();
    let lat2 = b.lat.to_radians();
    let lon2 = b.lon.to_radians();

    let d = angular_distance(a, b);
    if d <= f64::EPSILON {
        return a;
    }

    let coef_a = ((1.0 - f) * d).sin() / d.sin();
    let coef_b = (f * d).sin() / d.sin();

    let x = coef_a * lat1.cos() * lon1.cos() + coef_b * lat2.cos() * lon2.cos();
    let y = coef_a * lat1.cos() * lon1.sin() + coef_b * lat2.cos() * lon2.sin();
    let z = coef_a * lat1.sin() + coef_b * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lon = y.atan2(x).to_degrees();
    Position::new(lat, lon)
}

/// Subdivide the great circle from `a` to `b` into `segments` legs,
/// returning the `segments + 1` points including both endpoints.
pub fn great_circle_points(a: Position, b: Position, segments: usize) -> Vec<Position> {
    let n = segments.max(1);
    let mut points = Vec::with_capacity(n.saturating_add(1));
    for i in 0..=n {
        #[allow(clippy::cast_precision_loss)]
        let f = i as f64 / n as f64;
        points.push(great_circle_point(a, b, f));
    }
    points
}

/// Move from `start` toward `target` by `distance_km` along the great
/// circle, clamping at the target.
///
/// Returns the new position and the distance actually covered.
pub fn advance_toward(start: Position, target: Position, distance_km: f64) -> (Position, f64) {
    let total = haversine_km(start, target);
    if total <= f64::EPSILON || distance_km >= total {
        return (target, total);
    }
    let f = distance_km / total;
    (great_circle_point(start, target, f), distance_km)
}

/// Central angle between two positions in radians.
fn angular_distance(a: Position, b: Position) -> f64 {
    haversine_km(a, b) / EARTH_RADIUS_KM
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shanghai and Rotterdam, the canonical long-haul pair in the
    /// route tests.
    fn shanghai() -> Position {
        Position::new(31.23, 121.49)
    }

    fn rotterdam() -> Position {
        Position::new(51.95, 4.14)
    }

    #[test]
    fn haversine_known_distance() {
        // Great-circle Shanghai-Rotterdam is roughly 8,900 km.
        let d = haversine_km(shanghai(), rotterdam());
        assert!((8000.0..10000.0).contains(&d), "got {d}");
    }

    #[test]
    fn haversine_zero_for_same_point() {
        let d = haversine_km(shanghai(), shanghai());
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn interpolation_endpoints_are_exact() {
        let a = shanghai();
        let b = rotterdam();
        let start = great_circle_point(a, b, 0.0);
        let end = great_circle_point(a, b, 1.0);
        assert!(haversine_km(a, start) < 1.0);
        assert!(haversine_km(b, end) < 1.0);
    }

    #[test]
    fn midpoint_is_equidistant() {
        let a = shanghai();
        let b = rotterdam();
        let mid = great_circle_point(a, b, 0.5);
        let d1 = haversine_km(a, mid);
        let d2 = haversine_km(mid, b);
        assert!((d1 - d2).abs() < 1.0, "asymmetric midpoint: {d1} vs {d2}");
    }

    #[test]
    fn subdivision_has_expected_point_count() {
        let pts = great_circle_points(shanghai(), rotterdam(), 20);
        assert_eq!(pts.len(), 21);
    }

    #[test]
    fn advance_clamps_at_target() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 1.0); // ~111 km east
        let (pos, covered) = advance_toward(a, b, 10_000.0);
        assert!(haversine_km(pos, b) < 0.001);
        assert!(covered < 120.0);
    }

    #[test]
    fn advance_partial_step() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(0.0, 10.0);
        let (pos, covered) = advance_toward(a, b, 100.0);
        assert!((covered - 100.0).abs() < 1e-6);
        assert!((haversine_km(a, pos) - 100.0).abs() < 1.0);
    }
}
