//! Random journey selection.
//!
//! A journey pairs an origin terminal with a distinct destination
//! terminal, then attaches the supporting facilities: depots preferred
//! in the same country as their terminal, and a rail ramp in the
//! destination country when one exists (which makes the journey
//! rail-eligible).

use freightwatch_geo::{Geofence, GeofenceIndex};
use freightwatch_types::GeofenceKind;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::RouteError;

/// A selected journey with its supporting facilities.
#[derive(Debug, Clone)]
pub struct Journey {
    /// Where the container is gated in and loaded.
    pub origin_terminal: Geofence,
    /// Where the sea transit ends.
    pub destination_terminal: Geofence,
    /// Depot near the origin terminal, when one exists.
    pub origin_depot: Option<Geofence>,
    /// Depot near the destination terminal, when one exists.
    pub destination_depot: Option<Geofence>,
    /// Rail ramp in the destination country. Present makes the journey
    /// rail-eligible.
    pub destination_rail_ramp: Option<Geofence>,
}

/// Picks random journeys out of a geofence index.
#[derive(Debug, Clone, Copy, Default)]
pub struct JourneyPlanner;

impl JourneyPlanner {
    /// Create a planner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Select a random journey from the index.
    ///
    /// # Errors
    ///
    /// [`RouteError::NoTerminals`] when the index holds no terminal
    /// geofences.
    pub fn select(
        self,
        index: &GeofenceIndex,
        rng: &mut impl Rng,
    ) -> Result<Journey, RouteError> {
        let terminals = index.of_kind(GeofenceKind::Terminal);
        let Some(&origin) = terminals.choose(rng) else {
            return Err(RouteError::NoTerminals);
        };

        let others: Vec<&Geofence> = terminals
            .iter()
            .copied()
            .filter(|t| t.name != origin.name)
            .collect();
        // A single-terminal world loops back on itself.
        let destination = others.choose(rng).copied().unwrap_or(origin);

        let depots = index.of_kind(GeofenceKind::Depot);
        let ramps = index.of_kind(GeofenceKind::RailRamp);

        Ok(Journey {
            origin_terminal: origin.clone(),
            destination_terminal: destination.clone(),
            origin_depot: near_country(&depots, origin.country(), rng).cloned(),
            destination_depot: near_country(&depots, destination.country(), rng).cloned(),
            destination_rail_ramp: same_country(&ramps, destination.country(), rng).cloned(),
        })
    }
}

/// A random facility in the given country, falling back to any facility.
fn near_country<'a>(
    candidates: &[&'a Geofence],
    country: Option<&str>,
    rng: &mut impl Rng,
) -> Option<&'a Geofence> {
    same_country(candidates, country, rng).or_else(|| candidates.choose(rng).copied())
}

/// A random facility in the given country, or `None`.
fn same_country<'a>(
    candidates: &[&'a Geofence],
    country: Option<&str>,
    rng: &mut impl Rng,
) -> Option<&'a Geofence> {
    let country = country?;
    let matching: Vec<&&Geofence> = candidates
        .iter()
        .filter(|f| f.country() == Some(country))
        .collect();
    matching.choose(rng).map(|f| **f)
}
