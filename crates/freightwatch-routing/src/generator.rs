//! Route generation from geofence pairs.
//!
//! A route is assembled from anchors: the origin centroid, the transit
//! waypoints of every chokepoint on the path, and the destination
//! centroid. Consecutive anchors are expanded with great-circle
//! interpolation, intermediate points are jittered to look like real
//! shipping lanes, and each sea segment is checked against the water
//! tables with a bounded nudge-and-retry on failure.
//!
//! Generation never fails: a missing chokepoint path or unclassifiable
//! facility degrades to a direct great-circle route marked unvalidated.

use std::f64::consts::TAU;

use chrono::Duration;
use freightwatch_geo::geodesy::{great_circle_point, haversine_km};
use freightwatch_geo::Geofence;
use freightwatch_types::{Position, Route, TransportMode, Waypoint, WaypointKind};
use rand::Rng;
use tracing::warn;

use crate::chokepoints::ChokepointRouter;
use crate::regions::Region;
use crate::water::WaterValidator;

/// Kilometers per degree of latitude.
const KM_PER_DEG_LAT: f64 = 111.0;

/// Tuning knobs for route generation.
#[derive(Debug, Clone, Copy)]
pub struct RouteConfig {
    /// Probability that a rail-eligible journey gets a rail final leg.
    pub rail_probability: f64,
    /// Maximum lateral deviation applied to intermediate sea points, km.
    pub max_deviation_km: f64,
    /// Water-validation nudge attempts per failed segment.
    pub nudge_retries: usize,
    /// Target spacing between generated transit points, km.
    pub transit_spacing_km: f64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            rail_probability: 0.30,
            max_deviation_km: 50.0,
            nudge_retries: 3,
            transit_spacing_km: 500.0,
        }
    }
}

/// Builds complete [`Route`]s between geofences.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGenerator {
    config: RouteConfig,
    router: ChokepointRouter,
    validator: WaterValidator,
}

impl RouteGenerator {
    /// Create a generator with the given tuning.
    #[must_use]
    pub const fn new(config: RouteConfig) -> Self {
        Self {
            config,
            router: ChokepointRouter::new(),
            validator: WaterValidator::new(),
        }
    }

    /// Generate a route from `origin` to `destination`.
    ///
    /// When `rail_ramp` is given the journey is rail-eligible: with the
    /// configured probability the final approach is spliced into a yard
    /// leg, a rail ramp call, and a rail transit to the destination.
    pub fn generate(
        &self,
        origin: &Geofence,
        destination: &Geofence,
        rail_ramp: Option<&Geofence>,
        rng: &mut impl Rng,
    ) -> Route {
        let start = origin.centroid();
        let end = destination.centroid();

        let anchors = match self.chokepoint_anchors(origin, destination, start, end) {
            Some(anchors) => anchors,
            None => {
                warn!(
                    origin = %origin.name,
                    destination = %destination.name,
                    "no chokepoint path, falling back to direct route"
                );
                return self.direct_route(start, end, rng);
            }
        };

        let (mut points, validated) = self.expand_anchors(&anchors, rng);

        let splice_rail = rail_ramp
            .is_some_and(|_| rng.random_bool(self.config.rail_probability.clamp(0.0, 1.0)));
        if splice_rail && let Some(ramp) = rail_ramp {
            splice_rail_approach(&mut points, ramp.centroid());
        }

        Route {
            waypoints: assign_timing(&points),
            validated,
        }
    }

    /// Anchor sequence through the chokepoint graph, or `None` when the
    /// journey cannot be classified or routed.
    fn chokepoint_anchors(
        &self,
        origin: &Geofence,
        destination: &Geofence,
        start: Position,
        end: Position,
    ) -> Option<Vec<(Position, WaypointKind)>> {
        let origin_region = Region::classify(origin.country().unwrap_or_default(), start.lon)?;
        let dest_region =
            Region::classify(destination.country().unwrap_or_default(), end.lon)?;
        let sequence = self.router.route(origin_region, dest_region).ok()?;

        let mut anchors = vec![(start, WaypointKind::Origin)];
        for chokepoint in sequence {
            let mut transit = chokepoint.positions();
            orient_toward(&mut transit, anchors.last().map_or(start, |a| a.0));
            for position in transit {
                anchors.push((position, WaypointKind::Chokepoint(chokepoint.key.to_owned())));
            }
        }
        anchors.push((end, WaypointKind::Destination));
        Some(anchors)
    }

    /// Expand anchor pairs into jittered, water-validated transit points.
    /// Returns the point list and whether every sea segment validated.
    fn expand_anchors(
        &self,
        anchors: &[(Position, WaypointKind)],
        rng: &mut impl Rng,
    ) -> (Vec<(Position, WaypointKind, TransportMode)>, bool) {
        let mut points = Vec::new();
        let mut validated = true;

        for (i, (position, kind)) in anchors.iter().enumerate() {
            let mode = if i == 0 {
                TransportMode::Yard
            } else {
                TransportMode::Sea
            };
            if let Some(&(prev, _, _)) = points.last() {
                for transit in self.interpolate(prev, *position, rng) {
                    points.push((transit, WaypointKind::Transit, TransportMode::Sea));
                }
            }
            points.push((*position, kind.clone(), mode));
        }

        // Walk the polyline and repair implausible sea segments.
        for i in 1..points.len() {
            let Some(&(prev, _, _)) = points.get(i.wrapping_sub(1)) else {
                continue;
            };
            let Some((current, kind, _)) = points.get_mut(i) else {
                continue;
            };
            if self.validator.segment_is_plausible(prev, *current) {
                continue;
            }
            if *kind != WaypointKind::Transit {
                // Anchors stay put; accept the segment.
                validated = false;
                continue;
            }
            let mut repaired = false;
            for _ in 0..self.config.nudge_retries {
                *current = self.validator.nudge_toward_water(*current);
                if self.validator.segment_is_plausible(prev, *current) {
                    repaired = true;
                    break;
                }
            }
            if !repaired {
                validated = false;
            }
        }

        (points, validated)
    }

    /// Jittered great-circle points strictly between `a` and `b`.
    fn interpolate(&self, a: Position, b: Position, rng: &mut impl Rng) -> Vec<Position> {
        let distance = haversine_km(a, b);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let segments = ((distance / self.config.transit_spacing_km).ceil() as usize).clamp(1, 12);
        #[allow(clippy::cast_precision_loss)]
        (1..segments)
            .map(|i| {
                let f = i as f64 / segments as f64;
                jitter(great_circle_point(a, b, f), self.config.max_deviation_km, rng)
            })
            .collect()
    }

    /// Direct great-circle route used when no chokepoint path exists.
    /// Always marked unvalidated.
    fn direct_route(&self, start: Position, end: Position, rng: &mut impl Rng) -> Route {
        let mut points = vec![(start, WaypointKind::Origin, TransportMode::Yard)];
        for transit in self.interpolate(start, end, rng) {
            points.push((transit, WaypointKind::Transit, TransportMode::Sea));
        }
        points.push((end, WaypointKind::Destination, TransportMode::Sea));
        Route {
            waypoints: assign_timing(&points),
            validated: false,
        }
    }
}

/// Reverse transit waypoints when their tail is nearer the approach than
/// their head, so chokepoints are steamed through in travel direction.
fn orient_toward(transit: &mut [Position], approach: Position) {
    if let (Some(&first), Some(&last)) = (transit.first(), transit.last())
        && haversine_km(approach, first) > haversine_km(approach, last)
    {
        transit.reverse();
    }
}

/// Replace the sea arrival at the destination with a yard leg, a rail
/// ramp call, and a rail transit.
fn splice_rail_approach(
    points: &mut Vec<(Position, WaypointKind, TransportMode)>,
    ramp: Position,
) {
    let Some((destination, _, _)) = points.pop() else {
        return;
    };
    let handoff = points.last().map_or(destination, |&(p, _, _)| p);
    let yard = great_circle_point(handoff, ramp, 0.5);
    points.push((yard, WaypointKind::Yard, TransportMode::Yard));
    points.push((ramp, WaypointKind::RailRamp, TransportMode::Yard));
    points.push((destination, WaypointKind::Destination, TransportMode::Rail));
}

/// Attach cumulative arrival offsets from per-leg distance and speed.
fn assign_timing(points: &[(Position, WaypointKind, TransportMode)]) -> Vec<Waypoint> {
    let mut waypoints = Vec::with_capacity(points.len());
    let mut elapsed_secs = 0.0_f64;
    let mut previous: Option<Position> = None;

    for &(position, ref kind, mode) in points {
        if let Some(prev) = previous {
            let hours = haversine_km(prev, position) / mode.speed_kmh();
            elapsed_secs += hours * 3600.0;
        }
        #[allow(clippy::cast_possible_truncation)]
        waypoints.push(Waypoint {
            position,
            mode,
            arrival_offset: Duration::seconds(elapsed_secs as i64),
            kind: kind.clone(),
        });
        previous = Some(position);
    }
    waypoints
}

/// Displace a point by a roughly normal deviation (σ = `max_km` / 3) in
/// a uniform random direction. Twelve summed uniforms approximate the
/// normal well enough for lane variation.
fn jitter(p: Position, max_km: f64, rng: &mut impl Rng) -> Position {
    let normal: f64 = (0..12).map(|_| rng.random::<f64>()).sum::<f64>() - 6.0;
    let deviation_km = normal * (max_km / 3.0);
    let angle = rng.random_range(0.0..TAU);

    let lat_offset = deviation_km * angle.sin() / KM_PER_DEG_LAT;
    let cos_lat = p.lat.to_radians().cos();
    let lon_offset = if cos_lat.abs() < f64::EPSILON {
        0.0
    } else {
        deviation_km * angle.cos() / (KM_PER_DEG_LAT * cos_lat)
    };
    Position::new(p.lat + lat_offset, p.lon + lon_offset)
}
