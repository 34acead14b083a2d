//! Errors raised during route construction.
//!
//! None of these are fatal to the engine: an unresolvable chokepoint path
//! falls back to a direct great-circle route, and journey planning errors
//! only skip the container being spawned.

use thiserror::Error;

use crate::regions::Region;

/// Route construction and journey planning errors.
#[derive(Debug, Error)]
pub enum RouteError {
    /// No chokepoint path connects the two regions. Recovered by falling
    /// back to an unvalidated direct route.
    #[error("no chokepoint path from {origin:?} to {destination:?}")]
    RouteUnresolvable {
        /// Origin shipping region.
        origin: Region,
        /// Destination shipping region.
        destination: Region,
    },

    /// The geofence index holds no terminals to plan journeys between.
    #[error("no terminal geofences available for journey planning")]
    NoTerminals,
}
