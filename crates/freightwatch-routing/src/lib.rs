//! Route construction for the Freightwatch simulation.
//!
//! Turns a pair of geofences into a plausible container journey: shipping
//! regions classified from UN/LOCODE country prefixes, a chokepoint
//! connectivity graph searched by hop count, great-circle interpolation
//! between anchors, and a conservative water-region check that keeps ocean
//! legs off the continents.
//!
//! # Modules
//!
//! - [`error`] -- Route construction errors.
//! - [`regions`] -- Shipping [`Region`] classification.
//! - [`chokepoints`] -- Static chokepoint table and the [`ChokepointRouter`].
//! - [`water`] -- Water-region tables and the [`WaterValidator`].
//! - [`generator`] -- [`RouteGenerator`]: anchors to a full [`Route`].
//! - [`journey`] -- [`JourneyPlanner`]: random origin/destination selection.
//!
//! [`Region`]: regions::Region
//! [`ChokepointRouter`]: chokepoints::ChokepointRouter
//! [`WaterValidator`]: water::WaterValidator
//! [`RouteGenerator`]: generator::RouteGenerator
//! [`JourneyPlanner`]: journey::JourneyPlanner
//! [`Route`]: freightwatch_types::Route

pub mod chokepoints;
pub mod error;
pub mod generator;
pub mod journey;
pub mod regions;
pub mod water;

pub use chokepoints::{Chokepoint, ChokepointRouter, CHOKEPOINTS};
pub use error::RouteError;
pub use generator::{RouteConfig, RouteGenerator};
pub use journey::{Journey, JourneyPlanner};
pub use regions::Region;
pub use water::WaterValidator;
