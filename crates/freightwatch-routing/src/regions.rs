//! Shipping region classification.
//!
//! Facilities classify into coarse shipping regions by the ISO country
//! code at the front of their UN/LOCODE name. The United States splits
//! into east and west coasts at longitude -100 so transpacific and
//! transatlantic journeys route through different chokepoints.

use serde::{Deserialize, Serialize};

/// Coarse shipping regions used as nodes in the chokepoint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    /// United States, east of longitude -100.
    UsEast,
    /// United States, west of longitude -100.
    UsWest,
    /// Canada.
    Canada,
    /// Northern Europe.
    Eu,
    /// Mediterranean Europe.
    Med,
    /// China and Hong Kong.
    China,
    /// Japan.
    Japan,
    /// South Korea.
    Korea,
    /// Southeast Asia.
    Asia,
    /// Indian subcontinent.
    India,
    /// Middle East and North Africa.
    Mena,
    /// Australia and New Zealand.
    Oceania,
    /// South American Atlantic coast.
    Atlantic,
    /// Sub-Saharan and North Africa.
    Africa,
}

impl Region {
    /// Classify a facility by its ISO country code and centroid longitude.
    ///
    /// Country codes that belong to several regions resolve to the first
    /// declared match, except the US where the -100 longitude split picks
    /// the coast. Unknown codes return `None`.
    pub fn classify(country: &str, lon: f64) -> Option<Self> {
        let region = match country {
            "US" => {
                if lon > -100.0 {
                    Self::UsEast
                } else {
                    Self::UsWest
                }
            }
            "CA" => Self::Canada,
            "GB" | "DE" | "NL" | "BE" | "FR" | "ES" | "IT" | "PT" | "PL" | "SE" | "NO" | "DK"
            | "FI" | "IE" => Self::Eu,
            "GR" | "TR" | "HR" | "SI" | "MT" | "CY" => Self::Med,
            "CN" | "HK" => Self::China,
            "JP" => Self::Japan,
            "KR" => Self::Korea,
            "TW" | "SG" | "MY" | "TH" | "VN" | "ID" | "PH" => Self::Asia,
            "IN" | "BD" | "LK" | "PK" => Self::India,
            "AE" | "SA" | "EG" | "IL" | "JO" | "OM" | "QA" | "KW" | "BH" => Self::Mena,
            "AU" | "NZ" => Self::Oceania,
            "BR" | "AR" | "CL" | "CO" | "VE" | "PE" | "EC" => Self::Atlantic,
            "ZA" | "KE" | "NG" | "GH" | "TZ" | "MA" | "DZ" | "TN" => Self::Africa,
            _ => return None,
        };
        Some(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn us_splits_east_west_at_minus_100() {
        assert_eq!(Region::classify("US", -74.0), Some(Region::UsEast));
        assert_eq!(Region::classify("US", -118.2), Some(Region::UsWest));
        assert_eq!(Region::classify("US", -100.0), Some(Region::UsWest));
    }

    #[test]
    fn shared_codes_resolve_to_first_declared_region() {
        // Spain and Italy ship from both EU and Mediterranean ranges;
        // the coarse classification keeps them in EU.
        assert_eq!(Region::classify("ES", -5.0), Some(Region::Eu));
        assert_eq!(Region::classify("IT", 9.0), Some(Region::Eu));
        assert_eq!(Region::classify("TR", 29.0), Some(Region::Med));
    }

    #[test]
    fn asian_codes() {
        assert_eq!(Region::classify("CN", 121.5), Some(Region::China));
        assert_eq!(Region::classify("SG", 103.8), Some(Region::Asia));
        assert_eq!(Region::classify("IN", 72.9), Some(Region::India));
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(Region::classify("XX", 0.0), None);
        assert_eq!(Region::classify("", 0.0), None);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn regions_roundtrip_through_serde() {
        let json = serde_json::to_string(&Region::UsEast).unwrap();
        assert_eq!(json, "\"UsEast\"");
        let back: Region = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Region::UsEast);
    }
}
