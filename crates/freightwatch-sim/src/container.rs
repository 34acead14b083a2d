//! The per-container state machine.
//!
//! A container owns one route for its lifetime and walks it phase by
//! phase: origin, sea/rail/yard transit, chokepoint and rail-ramp
//! passes, dwell stops, and finally the destination where it freezes.
//! Each tick advances the position `speed x elapsed` kilometers along
//! the current segment with great-circle interpolation, so the position
//! always lies on the route polyline.
//!
//! Mutation happens only inside [`Container::tick`]; the scheduler owns
//! each container exclusively, which is what makes the batch tick safe
//! to dispatch without locks.

use chrono::{DateTime, Duration, Utc};
use freightwatch_geo::geodesy::advance_toward;
use freightwatch_types::{
    ContainerId, ContainerMetadata, EventKind, Position, Route, TransportMode, Waypoint,
    WaypointKind,
};
use rand::Rng;
use tracing::debug;

use crate::error::SimError;

/// Where a container currently is in its journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPhase {
    /// At the origin facility, not yet moving.
    AtOrigin,
    /// Moving along a route segment.
    InTransit(TransportMode),
    /// Dwelling at a waypoint until the resume time.
    StoppedAtWaypoint {
        /// Simulated time at which movement resumes.
        resume_at: DateTime<Utc>,
    },
    /// Passing through a named chokepoint.
    AtChokepoint,
    /// Handling at an intermodal rail ramp.
    AtRailRamp,
    /// Arrived at the destination facility. Terminal state.
    AtDestination,
}

/// A semantic event produced by one container tick, before rendering
/// into the external telemetry schema.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickEvent {
    /// What happened.
    pub kind: EventKind,
    /// Where it happened.
    pub position: Position,
    /// Simulated time it happened.
    pub time: DateTime<Utc>,
}

/// Stochastic tuning for container behavior.
#[derive(Debug, Clone, Copy)]
pub struct ContainerTuning {
    /// Probability of a dwell pause at a waypoint crossing.
    pub dwell_probability: f64,
    /// Shortest dwell pause, simulated minutes.
    pub dwell_min_minutes: i64,
    /// Longest dwell pause, simulated minutes.
    pub dwell_max_minutes: i64,
    /// Interval between location pings, simulated minutes.
    pub ping_interval_minutes: i64,
    /// Probability of door activity at an arrival stop.
    pub door_probability: f64,
    /// Consecutive faults before the container is removed.
    pub fault_threshold: u32,
}

impl Default for ContainerTuning {
    fn default() -> Self {
        Self {
            dwell_probability: 0.15,
            dwell_min_minutes: 30,
            dwell_max_minutes: 360,
            ping_interval_minutes: 15,
            door_probability: 0.3,
            fault_threshold: 3,
        }
    }
}

/// Simulation state for one tracked container.
#[derive(Debug, Clone)]
pub struct Container {
    /// Internal identifier.
    pub id: ContainerId,
    /// Identity metadata rendered into telemetry.
    pub metadata: ContainerMetadata,
    /// Current phase.
    pub phase: ContainerPhase,
    /// Current position, always on the route polyline.
    pub position: Position,
    route: Route,
    /// Index of the waypoint currently being approached.
    waypoint_index: usize,
    tuning: ContainerTuning,
    last_tick: DateTime<Utc>,
    last_ping: DateTime<Utc>,
    door_close_at: Option<DateTime<Utc>>,
    faults: u32,
}

impl Container {
    /// Create a container at the origin of its route.
    #[must_use]
    pub fn new(
        metadata: ContainerMetadata,
        route: Route,
        tuning: ContainerTuning,
        start: DateTime<Utc>,
    ) -> Self {
        let position = route
            .origin()
            .map_or(Position::new(0.0, 0.0), |w| w.position);
        Self {
            id: ContainerId::new(),
            metadata,
            phase: ContainerPhase::AtOrigin,
            position,
            route,
            waypoint_index: 1,
            tuning,
            last_tick: start,
            last_ping: start,
            door_close_at: None,
            faults: 0,
        }
    }

    /// The route being followed.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Accumulated fault count.
    #[must_use]
    pub const fn faults(&self) -> u32 {
        self.faults
    }

    /// Whether the fault threshold is reached and the container should
    /// be removed from the live set.
    #[must_use]
    pub const fn is_faulted(&self) -> bool {
        self.faults >= self.tuning.fault_threshold
    }

    /// Whether the journey is complete.
    #[must_use]
    pub fn is_arrived(&self) -> bool {
        self.phase == ContainerPhase::AtDestination
    }

    /// Advance the container to simulated time `now`.
    ///
    /// # Errors
    ///
    /// [`SimError::CorruptContainerState`] when the route is empty or
    /// the waypoint cursor is out of range. The fault counter is
    /// incremented and the tick is otherwise a no-op.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<Vec<TickEvent>, SimError> {
        if self.route.is_empty()
            || (self.waypoint_index > self.route.len()
                && self.phase != ContainerPhase::AtDestination)
        {
            self.faults = self.faults.saturating_add(1);
            return Err(SimError::CorruptContainerState {
                container_id: self.id,
                waypoint_index: self.waypoint_index,
            });
        }

        let elapsed = now.signed_duration_since(self.last_tick);
        if elapsed <= Duration::zero() {
            return Ok(Vec::new());
        }
        self.last_tick = now;

        let mut events = Vec::new();

        if let Some(close_at) = self.door_close_at
            && now >= close_at
        {
            self.door_close_at = None;
            events.push(self.event(EventKind::DoorClosed, close_at));
        }

        match self.phase {
            ContainerPhase::AtDestination => {}
            ContainerPhase::StoppedAtWaypoint { resume_at } => {
                if now >= resume_at {
                    let mode = self.current_mode();
                    self.phase = ContainerPhase::InTransit(mode);
                    events.push(self.event(EventKind::InMotion, now));
                }
            }
            ContainerPhase::AtOrigin => {
                let mode = self.current_mode();
                self.phase = ContainerPhase::InTransit(mode);
                events.push(self.event(EventKind::InMotion, now));
                self.advance(elapsed, now, rng, &mut events);
            }
            ContainerPhase::AtChokepoint | ContainerPhase::AtRailRamp => {
                let mode = self.current_mode();
                self.phase = ContainerPhase::InTransit(mode);
                self.advance(elapsed, now, rng, &mut events);
            }
            ContainerPhase::InTransit(_) => {
                self.advance(elapsed, now, rng, &mut events);
            }
        }

        if matches!(self.phase, ContainerPhase::InTransit(_))
            && now.signed_duration_since(self.last_ping)
                >= Duration::minutes(self.tuning.ping_interval_minutes)
        {
            self.last_ping = now;
            events.push(self.event(EventKind::LocationUpdate, now));
        }

        Ok(events)
    }

    /// Transport mode of the leg arriving at the current target.
    fn current_mode(&self) -> TransportMode {
        self.target().map_or(TransportMode::Sea, |w| w.mode)
    }

    fn target(&self) -> Option<&Waypoint> {
        self.route.waypoints.get(self.waypoint_index)
    }

    const fn event(&self, kind: EventKind, time: DateTime<Utc>) -> TickEvent {
        TickEvent {
            kind,
            position: self.position,
            time,
        }
    }

    /// Move along the route for the elapsed simulated duration, crossing
    /// waypoints as the distance budget allows.
    fn advance(
        &mut self,
        elapsed: Duration,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        #[allow(clippy::cast_precision_loss)]
        let hours = elapsed.num_seconds() as f64 / 3600.0;
        let mode = self.current_mode();
        let mut budget_km = mode.speed_kmh() * hours;

        while budget_km > 0.0 {
            let Some(target) = self.target().cloned() else {
                self.phase = ContainerPhase::AtDestination;
                break;
            };
            let (position, traveled) = advance_toward(self.position, target.position, budget_km);
            self.position = position;
            budget_km -= traveled;

            if self.position != target.position && traveled > 0.0 {
                break;
            }
            if !self.cross_waypoint(&target, now, rng, events) {
                break;
            }
        }
    }

    /// Handle arrival at `target`. Returns whether movement continues
    /// within this tick.
    fn cross_waypoint(
        &mut self,
        target: &Waypoint,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) -> bool {
        let arriving_mode = target.mode;
        self.waypoint_index = self.waypoint_index.saturating_add(1);
        let next_mode = self.target().map(|w| w.mode);

        match &target.kind {
            WaypointKind::Destination => {
                self.phase = ContainerPhase::AtDestination;
                events.push(self.event(EventKind::MotionStop, now));
                self.maybe_open_doors(now, rng, events);
                debug!(container = %self.metadata.container_id, "arrived at destination");
                false
            }
            WaypointKind::Chokepoint(_) => {
                self.phase = ContainerPhase::AtChokepoint;
                false
            }
            WaypointKind::RailRamp => {
                self.phase = ContainerPhase::AtRailRamp;
                if next_mode.is_some_and(|m| m != arriving_mode) {
                    events.push(self.event(EventKind::MotionStop, now));
                    self.maybe_open_doors(now, rng, events);
                    events.push(self.event(EventKind::InMotion, now));
                }
                false
            }
            WaypointKind::Origin | WaypointKind::Transit | WaypointKind::Yard => {
                if next_mode.is_some_and(|m| m != arriving_mode) {
                    events.push(self.event(EventKind::MotionStop, now));
                    events.push(self.event(EventKind::InMotion, now));
                }
                if rng.random_bool(self.tuning.dwell_probability.clamp(0.0, 1.0)) {
                    let minutes = rng
                        .random_range(self.tuning.dwell_min_minutes..=self.tuning.dwell_max_minutes);
                    let resume_at = now
                        .checked_add_signed(Duration::minutes(minutes))
                        .unwrap_or(now);
                    self.phase = ContainerPhase::StoppedAtWaypoint { resume_at };
                    events.push(self.event(EventKind::MotionStop, now));
                    return false;
                }
                true
            }
        }
    }

    /// With the configured probability, open the doors now and schedule
    /// the closing event.
    fn maybe_open_doors(
        &mut self,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
        events: &mut Vec<TickEvent>,
    ) {
        if rng.random_bool(self.tuning.door_probability.clamp(0.0, 1.0)) {
            events.push(self.event(EventKind::DoorOpened, now));
            let minutes = rng.random_range(5..=30);
            self.door_close_at = now.checked_add_signed(Duration::minutes(minutes));
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use freightwatch_types::Position;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn wp(lat: f64, lon: f64, mode: TransportMode, kind: WaypointKind) -> Waypoint {
        Waypoint {
            position: Position::new(lat, lon),
            mode,
            arrival_offset: Duration::zero(),
            kind,
        }
    }

    /// Short sea hop: two waypoints roughly 110 km apart.
    fn short_route() -> Route {
        Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(1.0, 0.0, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        }
    }

    fn no_dwell_tuning() -> ContainerTuning {
        ContainerTuning {
            dwell_probability: 0.0,
            door_probability: 0.0,
            ..ContainerTuning::default()
        }
    }

    fn container(route: Route) -> Container {
        let mut rng = SmallRng::seed_from_u64(42);
        let metadata = ContainerMetadata::generate(&mut rng);
        Container::new(metadata, route, no_dwell_tuning(), start())
    }

    #[test]
    fn first_tick_emits_in_motion() {
        let mut c = container(short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        let events = c.tick(start() + Duration::minutes(1), &mut rng).unwrap();
        assert!(events.iter().any(|e| e.kind == EventKind::InMotion));
        assert!(matches!(c.phase, ContainerPhase::InTransit(_)));
    }

    #[test]
    fn position_advances_along_segment() {
        let mut c = container(short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        c.tick(start() + Duration::hours(1), &mut rng).unwrap();
        // One hour at sea speed is ~33 km, about 0.3 degrees north.
        assert!(c.position.lat > 0.2 && c.position.lat < 0.4);
        assert!(c.position.lon.abs() < 1e-6);
    }

    #[test]
    fn arrival_freezes_position() {
        let mut c = container(short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        // 110 km at 33 km/h needs under 4 hours.
        c.tick(start() + Duration::hours(5), &mut rng).unwrap();
        assert_eq!(c.phase, ContainerPhase::AtDestination);
        let frozen = c.position;

        let events = c.tick(start() + Duration::hours(10), &mut rng).unwrap();
        assert_eq!(c.position, frozen);
        assert!(events.iter().all(|e| e.kind == EventKind::DoorClosed));
        assert!(c.is_arrived());
    }

    #[test]
    fn arrival_emits_motion_stop() {
        let mut c = container(short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        let events = c.tick(start() + Duration::hours(5), &mut rng).unwrap();
        assert!(events.iter().any(|e| e.kind == EventKind::MotionStop));
    }

    #[test]
    fn pings_arrive_every_interval() {
        // Long route so the container stays in transit.
        let route = Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(30.0, 0.0, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        };
        let mut c = container(route);
        let mut rng = SmallRng::seed_from_u64(1);

        let mut pings = 0;
        for minute in (15..=60).step_by(15) {
            let events = c
                .tick(start() + Duration::minutes(minute), &mut rng)
                .unwrap();
            pings += events
                .iter()
                .filter(|e| e.kind == EventKind::LocationUpdate)
                .count();
        }
        assert_eq!(pings, 4);
    }

    #[test]
    fn mode_change_emits_stop_start_pair() {
        let route = Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(0.2, 0.0, TransportMode::Sea, WaypointKind::Transit),
                wp(0.4, 0.0, TransportMode::Rail, WaypointKind::Destination),
            ],
            validated: true,
        };
        let mut c = container(route);
        let mut rng = SmallRng::seed_from_u64(1);

        let mut all = Vec::new();
        for hour in 1..=4 {
            all.extend(c.tick(start() + Duration::hours(hour), &mut rng).unwrap());
        }
        let stop = all.iter().position(|e| e.kind == EventKind::MotionStop);
        let restart = all.iter().rposition(|e| e.kind == EventKind::InMotion);
        assert!(stop.is_some());
        assert!(restart.is_some());
    }

    #[test]
    fn dwell_pauses_then_resumes() {
        let route = Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(0.5, 0.0, TransportMode::Sea, WaypointKind::Transit),
                wp(5.0, 0.0, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        };
        let tuning = ContainerTuning {
            dwell_probability: 1.0,
            door_probability: 0.0,
            ..ContainerTuning::default()
        };
        let mut rng = SmallRng::seed_from_u64(9);
        let metadata = ContainerMetadata::generate(&mut rng);
        let mut c = Container::new(metadata, route, tuning, start());

        // Reaches the transit waypoint within 2 hours and must dwell.
        c.tick(start() + Duration::hours(2), &mut rng).unwrap();
        assert!(matches!(c.phase, ContainerPhase::StoppedAtWaypoint { .. }));
        let paused_at = c.position;

        // Dwell lasts at most 6 hours; after 7 more it resumes.
        let events = c.tick(start() + Duration::hours(9), &mut rng).unwrap();
        assert!(events.iter().any(|e| e.kind == EventKind::InMotion));
        assert!(matches!(c.phase, ContainerPhase::InTransit(_)));
        assert_eq!(c.position, paused_at);
    }

    #[test]
    fn chokepoint_waypoint_passes_through_phase() {
        let route = Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(0.5, 0.0, TransportMode::Sea, WaypointKind::Chokepoint("suez".to_owned())),
                wp(5.0, 0.0, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        };
        let mut c = container(route);
        let mut rng = SmallRng::seed_from_u64(1);

        c.tick(start() + Duration::hours(2), &mut rng).unwrap();
        assert_eq!(c.phase, ContainerPhase::AtChokepoint);

        c.tick(start() + Duration::hours(3), &mut rng).unwrap();
        assert!(matches!(c.phase, ContainerPhase::InTransit(_)));
    }

    #[test]
    fn empty_route_is_corrupt_and_counts_faults() {
        let route = Route {
            waypoints: Vec::new(),
            validated: false,
        };
        let mut c = container(route);
        let mut rng = SmallRng::seed_from_u64(1);

        for i in 1..=3 {
            let result = c.tick(start() + Duration::minutes(i), &mut rng);
            assert!(matches!(
                result,
                Err(SimError::CorruptContainerState { .. })
            ));
        }
        assert_eq!(c.faults(), 3);
        assert!(c.is_faulted());
    }

    #[test]
    fn forced_doors_open_then_close() {
        let tuning = ContainerTuning {
            dwell_probability: 0.0,
            door_probability: 1.0,
            ..ContainerTuning::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let metadata = ContainerMetadata::generate(&mut rng);
        let mut c = Container::new(metadata, short_route(), tuning, start());

        let events = c.tick(start() + Duration::hours(5), &mut rng).unwrap();
        assert!(events.iter().any(|e| e.kind == EventKind::DoorOpened));

        // Doors close within 30 minutes.
        let events = c.tick(start() + Duration::hours(6), &mut rng).unwrap();
        assert!(events.iter().any(|e| e.kind == EventKind::DoorClosed));
    }

    #[test]
    fn backwards_time_is_a_no_op() {
        let mut c = container(short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        c.tick(start() + Duration::hours(1), &mut rng).unwrap();
        let position = c.position;
        let events = c.tick(start(), &mut rng).unwrap();
        assert!(events.is_empty());
        assert_eq!(c.position, position);
    }
}
