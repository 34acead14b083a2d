//! Gate-in / gate-out detection.
//!
//! The [`GateDetector`] keeps, per container, the set of geofence names
//! that contained the container at the previous observation. Each new
//! observation is diffed against that set: a name newly present becomes
//! a gate-in event, a name newly absent becomes a gate-out event. The
//! first observation for a container starts from the empty set, so a
//! container spawned inside a terminal gates in on its first fix rather
//! than silently "already being there".

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use freightwatch_types::{ContainerId, GateDirection, GateEvent, Position};

use crate::index::GeofenceIndex;

/// Stateful per-container gate transition detector.
#[derive(Debug, Default)]
pub struct GateDetector {
    /// Geofence names containing each container at its last observation.
    last_containment: HashMap<ContainerId, BTreeSet<String>>,
}

impl GateDetector {
    /// Create a detector with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a container position and emit gate transitions.
    ///
    /// Events are ordered gate-outs first, then gate-ins, each group in
    /// lexicographic geofence-name order, so a single observation that
    /// leaves one fence and enters another reads as out-then-in.
    pub fn observe(
        &mut self,
        index: &GeofenceIndex,
        container_id: ContainerId,
        asset_name: &str,
        position: Position,
        timestamp: DateTime<Utc>,
    ) -> Vec<GateEvent> {
        let current: BTreeSet<String> = index
            .containing(position)
            .into_iter()
            .map(str::to_owned)
            .collect();
        let previous = self.last_containment.entry(container_id).or_default();

        let mut events = Vec::new();
        for name in previous.difference(&current) {
            if let Some(fence) = index.get(name) {
                events.push(GateEvent {
                    container_id,
                    asset_name: asset_name.to_owned(),
                    geofence_name: name.clone(),
                    geofence_kind: fence.kind,
                    timestamp,
                    direction: GateDirection::Out,
                });
            }
        }
        for name in current.difference(previous) {
            if let Some(fence) = index.get(name) {
                events.push(GateEvent {
                    container_id,
                    asset_name: asset_name.to_owned(),
                    geofence_name: name.clone(),
                    geofence_kind: fence.kind,
                    timestamp,
                    direction: GateDirection::In,
                });
            }
        }

        *previous = current;
        events
    }

    /// Drop all history for a container, e.g. when it is removed from
    /// the simulation.
    pub fn forget(&mut self, container_id: ContainerId) {
        self.last_containment.remove(&container_id);
    }

    /// Number of containers with recorded history.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.last_containment.len()
    }
}
