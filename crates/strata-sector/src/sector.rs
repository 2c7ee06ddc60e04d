//! Sector classification keys
//!
//! A [`Sector`] selects the field schema for both grid columns and form
//! validation. The set is closed: adding a sector is a data change in the
//! registry table, not new control flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enumerated sector key
///
/// Mirrors the investment-data taxonomy. The string form (`key()`) is the
/// routing and wire representation; the human label lives in the registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Sector {
    /// Residential properties
    Residential,
    /// Undeveloped land
    Land,
    /// Healthcare facilities
    Healthcare,
    /// Retail properties
    Retail,
    /// Hotels
    Hotel,
    /// Street-level survey aggregates
    Street,
    /// Industrial properties
    Industrial,
    /// Office properties
    Office,
    /// Event venues
    Events,
}

impl Sector {
    /// Default sector used for the initial redirect when a request carries
    /// no (or an unknown) sector key
    pub const DEFAULT: Sector = Sector::Residential;

    /// All sectors in registry order
    pub const ALL: [Sector; 9] = [
        Sector::Residential,
        Sector::Land,
        Sector::Healthcare,
        Sector::Retail,
        Sector::Hotel,
        Sector::Street,
        Sector::Industrial,
        Sector::Office,
        Sector::Events,
    ];

    /// Stable string key used in routes, queries, and cache keys
    #[inline]
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Sector::Residential => "residential",
            Sector::Land => "land",
            Sector::Healthcare => "healthcare",
            Sector::Retail => "retail",
            Sector::Hotel => "hotel",
            Sector::Street => "street",
            Sector::Industrial => "industrial",
            Sector::Office => "office",
            Sector::Events => "events",
        }
    }

    /// Resolve a raw key to a sector
    ///
    /// # Errors
    /// Returns [`UnknownSectorError`] for keys outside the taxonomy. Callers
    /// at the routing boundary are expected to redirect to
    /// [`Sector::DEFAULT`]; the key is never silently defaulted here.
    pub fn from_key(key: &str) -> Result<Self, UnknownSectorError> {
        Sector::ALL
            .into_iter()
            .find(|s| s.key() == key)
            .ok_or_else(|| UnknownSectorError {
                key: key.to_string(),
            })
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Sector {
    type Err = UnknownSectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::from_key(s)
    }
}

/// A sector key that is not part of the taxonomy
///
/// Fatal to the current request; recoverable by redirecting to
/// [`Sector::DEFAULT`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sector: {key}")]
pub struct UnknownSectorError {
    /// The rejected key
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_round_trips_for_all_sectors() {
        for sector in Sector::ALL {
            assert_eq!(Sector::from_key(sector.key()).unwrap(), sector);
        }
    }

    #[test]
    fn from_key_rejects_unknown() {
        let err = Sector::from_key("warehouse").unwrap_err();
        assert_eq!(err.key, "warehouse");
        assert!(err.to_string().contains("unknown sector"));
    }

    #[test]
    fn from_key_is_case_sensitive() {
        assert!(Sector::from_key("Residential").is_err());
    }

    #[test]
    fn default_sector_is_residential() {
        assert_eq!(Sector::DEFAULT, Sector::Residential);
    }

    #[test]
    fn serde_uses_key_string() {
        let json = serde_json::to_string(&Sector::Healthcare).unwrap();
        assert_eq!(json, "\"healthcare\"");
        let back: Sector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sector::Healthcare);
    }

    #[test]
    fn display_matches_key() {
        assert_eq!(Sector::Land.to_string(), "land");
    }
}
