//! The batch tick scheduler.
//!
//! Drives every live container once per tick. Container state mutation
//! is synchronous (each container is owned exclusively by the
//! scheduler, so one slow container can never corrupt another), while
//! telemetry delivery for the whole batch is dispatched concurrently
//! and awaited before simulated time advances. Gate detection runs
//! against an atomically-swappable geofence index snapshot taken once
//! per tick, so a reload mid-tick never produces a half-updated view.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use freightwatch_alerts::GateSender;
use freightwatch_geo::{GateDetector, GeofenceIndex};
use freightwatch_types::TelemetryEvent;
use rand::Rng;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clock::SimClock;
use crate::container::Container;
use crate::emitter::EventEmitter;
use crate::sink::{deliver, TelemetrySink};

/// Cooperative stop flag shared with signal handlers.
#[derive(Debug, Default)]
pub struct ControlState {
    stop: AtomicBool,
}

impl ControlState {
    /// Create an un-stopped control state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stop: AtomicBool::new(false),
        }
    }

    /// Request a stop. The scheduler finishes the in-flight tick and
    /// halts before issuing the next one.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy)]
pub struct TickSummary {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Containers still live after the tick.
    pub containers_live: usize,
    /// Of the live containers, how many have arrived.
    pub containers_arrived: usize,
    /// Telemetry events rendered this tick.
    pub events_emitted: usize,
    /// Gate transitions detected this tick.
    pub gate_events: usize,
}

/// Whole-run counters, logged at shutdown.
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Ticks executed.
    pub total_ticks: u64,
    /// Telemetry events rendered.
    pub events_emitted: u64,
    /// Telemetry events dropped after sink retry.
    pub telemetry_dropped: u64,
    /// Gate transitions detected.
    pub gate_events: u64,
    /// Gate events dropped by the bounded queue.
    pub gate_dropped: u64,
    /// Containers removed for repeated corrupt-state faults.
    pub containers_removed: u64,
}

/// Drives the container fleet.
pub struct Scheduler {
    containers: Vec<Container>,
    clock: SimClock,
    emitter: EventEmitter,
    detector: GateDetector,
    index: Arc<RwLock<Arc<GeofenceIndex>>>,
    sink: Arc<dyn TelemetrySink>,
    gate_tx: GateSender,
    telemetry_dropped: Arc<AtomicU64>,
    tick: u64,
    events_total: u64,
    gate_total: u64,
    removed_total: u64,
}

impl Scheduler {
    /// Create a scheduler over an empty fleet.
    #[must_use]
    pub fn new(
        clock: SimClock,
        emitter: EventEmitter,
        index: Arc<RwLock<Arc<GeofenceIndex>>>,
        sink: Arc<dyn TelemetrySink>,
        gate_tx: GateSender,
    ) -> Self {
        Self {
            containers: Vec::new(),
            clock,
            emitter,
            detector: GateDetector::new(),
            index,
            sink,
            gate_tx,
            telemetry_dropped: Arc::new(AtomicU64::new(0)),
            tick: 0,
            events_total: 0,
            gate_total: 0,
            removed_total: 0,
        }
    }

    /// Add a container to the fleet.
    pub fn add_container(&mut self, container: Container) {
        self.containers.push(container);
    }

    /// Number of live containers.
    #[must_use]
    pub const fn fleet_size(&self) -> usize {
        self.containers.len()
    }

    /// Current simulated time.
    #[must_use]
    pub const fn now(&self) -> chrono::DateTime<chrono::Utc> {
        self.clock.now()
    }

    /// Execute one tick covering `real_elapsed` of wall time.
    ///
    /// All container state is updated synchronously, then the batch of
    /// rendered telemetry is delivered concurrently and awaited before
    /// this call returns, so simulated time never outruns delivery.
    pub async fn tick_once(
        &mut self,
        real_elapsed: Duration,
        rng: &mut (impl Rng + Send),
    ) -> TickSummary {
        let index = Arc::clone(&*self.index.read().await);
        let now = self.clock.advance(real_elapsed);
        self.tick = self.tick.saturating_add(1);

        let mut batch: Vec<TelemetryEvent> = Vec::new();
        let mut gate_count = 0_usize;

        for container in &mut self.containers {
            let events = match container.tick(now, rng) {
                Ok(events) => events,
                Err(error) => {
                    warn!(
                        container = %container.id,
                        faults = container.faults(),
                        %error,
                        "container tick skipped"
                    );
                    continue;
                }
            };
            for event in events {
                let location = index.most_specific(event.position);
                batch.push(
                    self.emitter
                        .render(&container.metadata, event, location, rng),
                );
            }

            let gates = self.detector.observe(
                &index,
                container.id,
                &container.metadata.container_id,
                container.position,
                now,
            );
            gate_count = gate_count.saturating_add(gates.len());
            for gate in gates {
                let tick_event = crate::container::TickEvent {
                    kind: gate.direction.event_kind(),
                    position: container.position,
                    time: gate.timestamp,
                };
                let location = index.get(&gate.geofence_name);
                batch.push(
                    self.emitter
                        .render(&container.metadata, tick_event, location, rng),
                );
                self.gate_tx.offer(gate);
            }
        }

        // Remove containers past the fault threshold.
        let before = self.containers.len();
        let detector = &mut self.detector;
        self.containers.retain(|c| {
            if c.is_faulted() {
                warn!(container = %c.id, "removing container after repeated faults");
                detector.forget(c.id);
                false
            } else {
                true
            }
        });
        self.removed_total = self
            .removed_total
            .saturating_add((before.saturating_sub(self.containers.len())) as u64);

        // Deliver the whole batch before sim time advances again.
        let sink = Arc::clone(&self.sink);
        let dropped = Arc::clone(&self.telemetry_dropped);
        futures::future::join_all(
            batch
                .iter()
                .map(|event| deliver(sink.as_ref(), event, &dropped)),
        )
        .await;

        self.events_total = self.events_total.saturating_add(batch.len() as u64);
        self.gate_total = self.gate_total.saturating_add(gate_count as u64);

        TickSummary {
            tick: self.tick,
            containers_live: self.containers.len(),
            containers_arrived: self.containers.iter().filter(|c| c.is_arrived()).count(),
            events_emitted: batch.len(),
            gate_events: gate_count,
        }
    }

    /// Run the tick loop until stop, tick limit, or fleet completion.
    pub async fn run(
        &mut self,
        control: &ControlState,
        max_ticks: u64,
        tick_interval_ms: u64,
        rng: &mut (impl Rng + Send),
    ) -> RunSummary {
        info!(
            fleet = self.fleet_size(),
            max_ticks,
            tick_interval_ms,
            speed = self.clock.speed(),
            "scheduler starting"
        );

        loop {
            if control.is_stop_requested() {
                info!("stop requested");
                break;
            }

            let summary = self
                .tick_once(Duration::milliseconds(to_i64(tick_interval_ms)), rng)
                .await;

            if summary.containers_live == 0 {
                info!(tick = summary.tick, "fleet empty, stopping");
                break;
            }
            if summary.containers_arrived == summary.containers_live {
                info!(
                    tick = summary.tick,
                    arrived = summary.containers_arrived,
                    "all containers arrived"
                );
                break;
            }
            if max_ticks > 0 && summary.tick >= max_ticks {
                info!(tick = summary.tick, max_ticks, "tick limit reached");
                break;
            }

            if tick_interval_ms > 0 {
                tokio::time::sleep(tokio::time::Duration::from_millis(tick_interval_ms)).await;
            }
        }

        self.summary()
    }

    /// Whole-run counters so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_ticks: self.tick,
            events_emitted: self.events_total,
            telemetry_dropped: self.telemetry_dropped.load(Ordering::Relaxed),
            gate_events: self.gate_total,
            gate_dropped: self.gate_tx.dropped(),
            containers_removed: self.removed_total,
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn to_i64(value: u64) -> i64 {
    if value > i64::MAX as u64 {
        i64::MAX
    } else {
        value as i64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::container::ContainerTuning;
    use crate::sink::LogSink;
    use chrono::{TimeZone, Utc};
    use freightwatch_alerts::bounded_gate_queue;
    use freightwatch_geo::geofence::square_fence;
    use freightwatch_types::{
        ContainerMetadata, GeofenceKind, Position, Route, TransportMode, Waypoint, WaypointKind,
    };
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn index() -> Arc<RwLock<Arc<GeofenceIndex>>> {
        let terminal = square_fence(
            "NLRTM Terminal",
            GeofenceKind::Terminal,
            Position::new(1.0, 0.0),
            0.2,
            None,
        )
        .unwrap();
        Arc::new(RwLock::new(Arc::new(
            GeofenceIndex::build(vec![terminal]).unwrap(),
        )))
    }

    fn wp(lat: f64, lon: f64, mode: TransportMode, kind: WaypointKind) -> Waypoint {
        Waypoint {
            position: Position::new(lat, lon),
            mode,
            arrival_offset: chrono::Duration::zero(),
            kind,
        }
    }

    fn short_route() -> Route {
        Route {
            waypoints: vec![
                wp(0.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(1.0, 0.0, TransportMode::Sea, WaypointKind::Destination),
            ],
            validated: true,
        }
    }

    fn quiet_tuning() -> ContainerTuning {
        ContainerTuning {
            dwell_probability: 0.0,
            door_probability: 0.0,
            ..ContainerTuning::default()
        }
    }

    fn scheduler() -> (Scheduler, freightwatch_alerts::GateReceiver) {
        let (gate_tx, gate_rx) = bounded_gate_queue(64);
        // 3600x speed: one real second is one simulated hour.
        let clock = SimClock::new(start(), 3600.0);
        let scheduler = Scheduler::new(
            clock,
            EventEmitter::default(),
            index(),
            Arc::new(LogSink),
            gate_tx,
        );
        (scheduler, gate_rx)
    }

    fn add_container(scheduler: &mut Scheduler, route: Route) {
        let mut rng = SmallRng::seed_from_u64(99);
        let metadata = ContainerMetadata::generate(&mut rng);
        scheduler.add_container(Container::new(metadata, route, quiet_tuning(), start()));
    }

    #[tokio::test]
    async fn tick_advances_containers_and_emits() {
        let (mut scheduler, _gate_rx) = scheduler();
        add_container(&mut scheduler, short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        let summary = scheduler.tick_once(Duration::seconds(1), &mut rng).await;
        assert_eq!(summary.tick, 1);
        assert_eq!(summary.containers_live, 1);
        assert!(summary.events_emitted > 0);
    }

    #[tokio::test]
    async fn arrival_inside_fence_sends_gate_event() {
        let (mut scheduler, mut gate_rx) = scheduler();
        add_container(&mut scheduler, short_route());
        let mut rng = SmallRng::seed_from_u64(1);

        // 5 simulated hours, enough to cover ~110 km at sea speed.
        let summary = scheduler.tick_once(Duration::seconds(5), &mut rng).await;
        assert_eq!(summary.containers_arrived, 1);
        assert!(summary.gate_events >= 1);

        let gate = gate_rx.recv().await.unwrap();
        assert_eq!(gate.geofence_name, "NLRTM Terminal");
    }

    #[tokio::test]
    async fn starting_inside_a_fence_raises_exactly_one_alert() {
        let (mut scheduler, gate_rx) = scheduler();
        // Origin and destination both sit inside the terminal square,
        // so every reading is contained but only the first gates in.
        let route = Route {
            waypoints: vec![
                wp(1.0, 0.0, TransportMode::Yard, WaypointKind::Origin),
                wp(1.0, 0.05, TransportMode::Yard, WaypointKind::Destination),
            ],
            validated: true,
        };
        add_container(&mut scheduler, route);
        let mut rng = SmallRng::seed_from_u64(1);

        scheduler.tick_once(Duration::seconds(1), &mut rng).await;
        scheduler.tick_once(Duration::seconds(1), &mut rng).await;
        drop(scheduler);

        let store = Arc::new(tokio::sync::Mutex::new(
            freightwatch_alerts::AlertStore::new(16),
        ));
        let mut pipeline = freightwatch_alerts::AlertPipeline::new(Arc::clone(&store), None);
        pipeline.run(gate_rx).await;
        assert_eq!(pipeline.raised(), 1);
        assert_eq!(store.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn faulted_container_is_removed() {
        let (mut scheduler, _gate_rx) = scheduler();
        let empty = Route {
            waypoints: Vec::new(),
            validated: false,
        };
        add_container(&mut scheduler, empty);
        let mut rng = SmallRng::seed_from_u64(1);

        for _ in 0..3 {
            scheduler.tick_once(Duration::seconds(1), &mut rng).await;
        }
        assert_eq!(scheduler.fleet_size(), 0);
        assert_eq!(scheduler.summary().containers_removed, 1);
    }

    #[tokio::test]
    async fn run_stops_when_all_arrived() {
        let (gate_tx, _gate_rx) = bounded_gate_queue(64);
        // One real millisecond is one simulated hour, so the short hop
        // completes within a few 1 ms ticks.
        let clock = SimClock::new(start(), 3_600_000.0);
        let mut scheduler = Scheduler::new(
            clock,
            EventEmitter::default(),
            index(),
            Arc::new(LogSink),
            gate_tx,
        );
        add_container(&mut scheduler, short_route());
        let control = ControlState::new();
        let mut rng = SmallRng::seed_from_u64(1);

        let summary = scheduler.run(&control, 50, 1, &mut rng).await;
        assert!(summary.total_ticks <= 50);
        assert!(summary.events_emitted > 0);
    }

    #[tokio::test]
    async fn stop_request_halts_promptly() {
        let (mut scheduler, _gate_rx) = scheduler();
        add_container(&mut scheduler, short_route());
        let control = ControlState::new();
        control.request_stop();
        let mut rng = SmallRng::seed_from_u64(1);

        let summary = scheduler.run(&control, 0, 0, &mut rng).await;
        assert_eq!(summary.total_ticks, 0);
    }
}
