//! The geofence containment index.
//!
//! A [`GeofenceIndex`] holds the full geofence set for a run and answers
//! "which polygons contain point P". The index is immutable once built;
//! a reload builds a fresh index and the caller swaps the whole structure
//! atomically (behind an `Arc`), so in-flight containment checks never
//! observe a half-updated state.
//!
//! # Overlap semantics
//!
//! Containment is a **set**: when a point falls inside both a parent
//! fence and a nested child, both names are reported. Callers that need
//! a single "most specific" answer use [`GeofenceIndex::most_specific`],
//! which prefers a fence carrying a parent link.

use std::collections::BTreeSet;

use freightwatch_types::{GeofenceKind, Position};

use crate::error::GeoError;
use crate::geofence::Geofence;

/// Immutable containment index over a set of geofences.
#[derive(Debug, Clone)]
pub struct GeofenceIndex {
    /// All geofences, in load order. Names are unique.
    fences: Vec<Geofence>,
}

impl GeofenceIndex {
    /// Build an index from a geofence set.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::EmptyIndex`] for an empty set (no reference
    /// data is a fatal startup condition) and [`GeoError::UnknownParent`]
    /// if any parent link does not resolve within the set.
    pub fn build(fences: Vec<Geofence>) -> Result<Self, GeoError> {
        if fences.is_empty() {
            return Err(GeoError::EmptyIndex);
        }
        let names: BTreeSet<&str> = fences.iter().map(|f| f.name.as_str()).collect();
        for fence in &fences {
            if let Some(parent) = &fence.parent
                && !names.contains(parent.as_str())
            {
                return Err(GeoError::UnknownParent {
                    name: fence.name.clone(),
                    parent: parent.clone(),
                });
            }
        }
        Ok(Self { fences })
    }

    /// All geofence names whose polygon contains the point.
    ///
    /// Candidates are narrowed by the bounding-box prefilter before the
    /// exact ray-casting test runs.
    pub fn containing(&self, p: Position) -> BTreeSet<&str> {
        self.fences
            .iter()
            .filter(|f| f.contains(p))
            .map(|f| f.name.as_str())
            .collect()
    }

    /// The most specific geofence containing the point: among the
    /// containing set, a fence with a parent link wins over one without.
    /// Returns `None` when the point is outside every fence.
    pub fn most_specific(&self, p: Position) -> Option<&Geofence> {
        let mut best: Option<&Geofence> = None;
        for fence in self.fences.iter().filter(|f| f.contains(p)) {
            match best {
                None => best = Some(fence),
                Some(current) if current.parent.is_none() && fence.parent.is_some() => {
                    best = Some(fence);
                }
                Some(_) => {}
            }
        }
        best
    }

    /// Look up a geofence by name.
    pub fn get(&self, name: &str) -> Option<&Geofence> {
        self.fences.iter().find(|f| f.name == name)
    }

    /// Centroid of a named geofence, if present.
    pub fn centroid(&self, name: &str) -> Option<Position> {
        self.get(name).map(Geofence::centroid)
    }

    /// All geofences of the given kind, in load order.
    pub fn of_kind(&self, kind: GeofenceKind) -> Vec<&Geofence> {
        self.fences.iter().filter(|f| f.kind == kind).collect()
    }

    /// Iterate over all geofences.
    pub fn iter(&self) -> impl Iterator<Item = &Geofence> {
        self.fences.iter()
    }

    /// Number of geofences in the index.
    pub fn len(&self) -> usize {
        self.fences.len()
    }

    /// Whether the index is empty. Construction forbids this, so the
    /// answer is always `false` for a built index.
    pub fn is_empty(&self) -> bool {
        self.fences.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geofence::square_fence;

    fn demo_index() -> GeofenceIndex {
        let terminal = square_fence(
            "NLRTM Terminal",
            GeofenceKind::Terminal,
            Position::new(51.95, 4.05),
            0.5,
            None,
        )
        .unwrap();
        // Rail ramp nested inside the terminal complex.
        let ramp = square_fence(
            "NLRTM Rail Ramp",
            GeofenceKind::RailRamp,
            Position::new(51.95, 4.05),
            0.1,
            Some("NLRTM Terminal".to_owned()),
        )
        .unwrap();
        let depot = square_fence(
            "DEHAM Depot",
            GeofenceKind::Depot,
            Position::new(53.55, 9.99),
            0.3,
            None,
        )
        .unwrap();
        GeofenceIndex::build(vec![terminal, ramp, depot]).unwrap()
    }

    #[test]
    fn empty_index_is_fatal() {
        let result = GeofenceIndex::build(vec![]);
        assert!(matches!(result, Err(GeoError::EmptyIndex)));
    }

    #[test]
    fn unknown_parent_rejected() {
        let ramp = square_fence(
            "USNYC Rail Ramp",
            GeofenceKind::RailRamp,
            Position::new(40.7, -74.0),
            0.1,
            Some("USNYC Terminal".to_owned()),
        )
        .unwrap();
        let result = GeofenceIndex::build(vec![ramp]);
        assert!(matches!(result, Err(GeoError::UnknownParent { .. })));
    }

    #[test]
    fn point_inside_single_fence_returns_exactly_that_fence() {
        let index = demo_index();
        let inside_depot = Position::new(53.55, 9.99);
        let set = index.containing(inside_depot);
        assert_eq!(set.len(), 1);
        assert!(set.contains("DEHAM Depot"));
    }

    #[test]
    fn point_outside_all_fences_returns_empty_set() {
        let index = demo_index();
        let mid_atlantic = Position::new(40.0, -35.0);
        assert!(index.containing(mid_atlantic).is_empty());
    }

    #[test]
    fn nested_fences_both_reported() {
        let index = demo_index();
        let inside_ramp = Position::new(51.95, 4.05);
        let set = index.containing(inside_ramp);
        assert_eq!(set.len(), 2);
        assert!(set.contains("NLRTM Terminal"));
        assert!(set.contains("NLRTM Rail Ramp"));
    }

    #[test]
    fn most_specific_prefers_child() {
        let index = demo_index();
        let inside_ramp = Position::new(51.95, 4.05);
        let fence = index.most_specific(inside_ramp).unwrap();
        assert_eq!(fence.name, "NLRTM Rail Ramp");
    }

    #[test]
    fn most_specific_outside_is_none() {
        let index = demo_index();
        assert!(index.most_specific(Position::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn of_kind_filters() {
        let index = demo_index();
        assert_eq!(index.of_kind(GeofenceKind::Terminal).len(), 1);
        assert_eq!(index.of_kind(GeofenceKind::Depot).len(), 1);
        assert_eq!(index.of_kind(GeofenceKind::RailRamp).len(), 1);
    }

    #[test]
    fn point_inside_terminal_but_outside_ramp() {
        let index = demo_index();
        // Inside the 0.5-degree terminal square, outside the 0.1-degree
        // ramp square.
        let p = Position::new(51.95, 4.35);
        let set = index.containing(p);
        assert_eq!(set.len(), 1);
        assert!(set.contains("NLRTM Terminal"));
    }
}
