//! Maritime chokepoints and the region connectivity graph.
//!
//! Each chokepoint carries the transit waypoints a vessel steams through
//! and the region pairs it connects. The [`ChokepointRouter`] treats
//! regions as graph nodes and chokepoints as undirected edges, then finds
//! the fewest-hops path between origin and destination regions. Ties are
//! broken by the table's declaration order, so routing is deterministic.

use std::collections::{HashMap, VecDeque};

use freightwatch_types::Position;

use crate::error::RouteError;
use crate::regions::Region;

/// A named maritime chokepoint (strait or canal).
#[derive(Debug)]
pub struct Chokepoint {
    /// Stable identifier.
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Transit waypoints as `(lat, lon)`, ordered along one transit
    /// direction. Consumers reverse them for the opposite direction.
    pub waypoints: &'static [(f64, f64)],
    /// Region pairs this chokepoint connects.
    pub connects: &'static [(Region, Region)],
}

impl Chokepoint {
    /// Transit waypoints as positions, in declared order.
    pub fn positions(&self) -> Vec<Position> {
        self.waypoints
            .iter()
            .map(|&(lat, lon)| Position::new(lat, lon))
            .collect()
    }
}

/// The chokepoint table. Declaration order is the routing tie-break.
pub const CHOKEPOINTS: &[Chokepoint] = &[
    Chokepoint {
        key: "suez",
        name: "Suez Canal",
        waypoints: &[(31.23, 32.37), (30.00, 32.55), (29.93, 32.53)],
        connects: &[
            (Region::Eu, Region::Asia),
            (Region::Mena, Region::Asia),
            (Region::UsEast, Region::Asia),
            (Region::Med, Region::Asia),
        ],
    },
    Chokepoint {
        key: "panama",
        name: "Panama Canal",
        waypoints: &[(9.38, -79.92), (8.95, -79.55)],
        connects: &[
            (Region::UsEast, Region::UsWest),
            (Region::UsEast, Region::Asia),
            (Region::Eu, Region::UsWest),
        ],
    },
    Chokepoint {
        key: "malacca",
        name: "Strait of Malacca",
        waypoints: &[(5.0, 100.0), (1.2, 103.5)],
        connects: &[
            (Region::India, Region::China),
            (Region::India, Region::Asia),
            (Region::Mena, Region::Asia),
            (Region::Eu, Region::Asia),
        ],
    },
    Chokepoint {
        key: "gibraltar",
        name: "Strait of Gibraltar",
        waypoints: &[(35.95, -5.6), (35.9, -5.95)],
        connects: &[
            (Region::Med, Region::Atlantic),
            (Region::Med, Region::UsEast),
            (Region::Med, Region::UsWest),
            (Region::Eu, Region::Med),
        ],
    },
    Chokepoint {
        key: "cape_good_hope",
        name: "Cape of Good Hope",
        waypoints: &[(-34.36, 18.47), (-35.0, 20.0), (-34.0, 25.0)],
        connects: &[
            (Region::Atlantic, Region::India),
            (Region::Eu, Region::Asia),
            (Region::UsEast, Region::Asia),
        ],
    },
    Chokepoint {
        key: "english_channel",
        name: "English Channel",
        waypoints: &[(50.0, -1.5), (51.0, 1.5)],
        connects: &[
            (Region::Eu, Region::Atlantic),
            (Region::Eu, Region::UsEast),
        ],
    },
    Chokepoint {
        key: "bab_el_mandeb",
        name: "Bab el-Mandeb Strait",
        waypoints: &[(12.6, 43.3), (12.4, 43.5)],
        connects: &[
            (Region::Med, Region::India),
            (Region::Mena, Region::India),
            (Region::Eu, Region::India),
        ],
    },
    Chokepoint {
        key: "singapore",
        name: "Singapore Strait",
        waypoints: &[(1.25, 103.8), (1.2, 104.1)],
        connects: &[
            (Region::Asia, Region::India),
            (Region::Asia, Region::Mena),
            (Region::China, Region::India),
        ],
    },
    Chokepoint {
        key: "taiwan",
        name: "Taiwan Strait",
        waypoints: &[(24.0, 119.5), (25.0, 120.0)],
        connects: &[
            (Region::China, Region::Japan),
            (Region::China, Region::Korea),
        ],
    },
    Chokepoint {
        key: "hormuz",
        name: "Strait of Hormuz",
        waypoints: &[(26.5, 56.4), (26.0, 56.0)],
        connects: &[
            (Region::Mena, Region::India),
            (Region::Mena, Region::Asia),
        ],
    },
];

/// Fewest-hops routing over the chokepoint connectivity graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChokepointRouter;

impl ChokepointRouter {
    /// Create a router over the built-in table.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The ordered chokepoint sequence from `origin` to `destination`.
    ///
    /// Breadth-first search by hop count; when several chokepoints reach
    /// the same region at the same depth, the earliest-declared one wins.
    /// A same-region journey resolves to an empty sequence.
    ///
    /// # Errors
    ///
    /// [`RouteError::RouteUnresolvable`] when the regions are not
    /// connected. Callers recover with a direct route.
    pub fn route(
        self,
        origin: Region,
        destination: Region,
    ) -> Result<Vec<&'static Chokepoint>, RouteError> {
        if origin == destination {
            return Ok(Vec::new());
        }

        // predecessor: region -> (previous region, chokepoint index)
        let mut previous: HashMap<Region, (Region, usize)> = HashMap::new();
        let mut queue = VecDeque::from([origin]);

        'search: while let Some(region) = queue.pop_front() {
            for (idx, chokepoint) in CHOKEPOINTS.iter().enumerate() {
                for &(a, b) in chokepoint.connects {
                    let neighbor = if a == region {
                        b
                    } else if b == region {
                        a
                    } else {
                        continue;
                    };
                    if neighbor == origin || previous.contains_key(&neighbor) {
                        continue;
                    }
                    previous.insert(neighbor, (region, idx));
                    if neighbor == destination {
                        break 'search;
                    }
                    queue.push_back(neighbor);
                }
            }
        }

        if !previous.contains_key(&destination) {
            return Err(RouteError::RouteUnresolvable {
                origin,
                destination,
            });
        }

        let mut sequence = Vec::new();
        let mut cursor = destination;
        while cursor != origin {
            let Some(&(prev, idx)) = previous.get(&cursor) else {
                return Err(RouteError::RouteUnresolvable {
                    origin,
                    destination,
                });
            };
            let Some(chokepoint) = CHOKEPOINTS.get(idx) else {
                return Err(RouteError::RouteUnresolvable {
                    origin,
                    destination,
                });
            };
            sequence.push(chokepoint);
            cursor = prev;
        }
        sequence.reverse();
        Ok(sequence)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn keys(seq: &[&Chokepoint]) -> Vec<&'static str> {
        seq.iter().map(|c| c.key).collect()
    }

    #[test]
    fn same_region_is_empty_sequence() {
        let router = ChokepointRouter::new();
        assert!(router.route(Region::Eu, Region::Eu).unwrap().is_empty());
    }

    #[test]
    fn china_to_northern_europe_transits_in_order() {
        let router = ChokepointRouter::new();
        let seq = router.route(Region::China, Region::Eu).unwrap();
        assert_eq!(keys(&seq), vec!["malacca", "bab_el_mandeb"]);
    }

    #[test]
    fn reverse_direction_reverses_sequence() {
        let router = ChokepointRouter::new();
        let forward = keys(&router.route(Region::China, Region::Eu).unwrap());
        let mut backward = keys(&router.route(Region::Eu, Region::China).unwrap());
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn us_coast_to_coast_goes_through_panama() {
        let router = ChokepointRouter::new();
        let seq = router.route(Region::UsEast, Region::UsWest).unwrap();
        assert_eq!(keys(&seq), vec!["panama"]);
    }

    #[test]
    fn declaration_order_breaks_ties() {
        // Both suez and malacca directly connect EU and Asia; suez is
        // declared first and must win.
        let router = ChokepointRouter::new();
        let seq = router.route(Region::Eu, Region::Asia).unwrap();
        assert_eq!(keys(&seq), vec!["suez"]);
    }

    #[test]
    fn mena_to_asia_is_direct() {
        let router = ChokepointRouter::new();
        let seq = router.route(Region::Mena, Region::Asia).unwrap();
        assert_eq!(keys(&seq), vec!["suez"]);
    }

    #[test]
    fn oceania_reaches_nothing() {
        // No chokepoint connects Oceania; the direct-route fallback
        // handles these journeys.
        let router = ChokepointRouter::new();
        let result = router.route(Region::Oceania, Region::Eu);
        assert!(matches!(
            result,
            Err(RouteError::RouteUnresolvable { .. })
        ));
    }
}
