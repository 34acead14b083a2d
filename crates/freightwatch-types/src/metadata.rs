//! Container identity metadata and generators.
//!
//! Container and tracker identifiers follow the ISO 6346 shape: a
//! four-letter owner code plus seven digits. Generation takes an
//! injected [`Rng`] so populated fleets are reproducible under a seed.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Owner code prefix used for generated container identifiers.
const OWNER_CODE: &str = "FWCU";

/// Cargo descriptions assigned to generated containers.
const CARGO_TYPES: &[&str] = &[
    "General Cargo",
    "Electronics",
    "Textiles",
    "Machinery",
    "Food Products",
    "Chemicals",
    "Auto Parts",
    "Furniture",
];

/// Physical container sizes.
const CONTAINER_TYPES: &[&str] = &["20ft", "40ft", "40ft HC", "45ft HC"];

/// Fraction of generated containers that are refrigerated.
const REEFER_RATIO: f64 = 0.15;

/// Static identity data for one simulated container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerMetadata {
    /// ISO 6346-style container identifier (owner code + 7 digits).
    pub container_id: String,
    /// Tracking device identifier.
    pub tracker_id: String,
    /// Physical container size.
    pub container_type: String,
    /// Whether the container is a reefer.
    pub refrigerated: bool,
    /// Declared cargo category.
    pub cargo_type: String,
}

impl ContainerMetadata {
    /// Generate metadata for a new container from the given randomness
    /// source.
    pub fn generate(rng: &mut impl Rng) -> Self {
        let serial: u32 = rng.random_range(0..10_000_000);
        let tracker: u32 = rng.random_range(0..10_000_000);
        let container_type = CONTAINER_TYPES
            .get(rng.random_range(0..CONTAINER_TYPES.len()))
            .copied()
            .unwrap_or("40ft")
            .to_owned();
        let refrigerated = rng.random_bool(REEFER_RATIO);
        let cargo_type = if refrigerated {
            "Food Products".to_owned()
        } else {
            CARGO_TYPES
                .get(rng.random_range(0..CARGO_TYPES.len()))
                .copied()
                .unwrap_or("General Cargo")
                .to_owned()
        };
        Self {
            container_id: format!("{OWNER_CODE}{serial:07}"),
            tracker_id: format!("A{tracker:07}"),
            container_type,
            refrigerated,
            cargo_type,
        }
    }
}
