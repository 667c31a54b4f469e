//! Price bands

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown price band name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown price band: {0} (expected all, under50, 50-100 or over100)")]
pub struct PriceBandError(String);

/// Coarse price range used by the catalogue filter chips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    /// No price restriction.
    #[default]
    #[serde(rename = "all")]
    All,

    /// Strictly below 50.
    #[serde(rename = "under50")]
    Under50,

    /// From 50 to 100, both inclusive.
    #[serde(rename = "50-100")]
    From50To100,

    /// Strictly above 100.
    #[serde(rename = "over100")]
    Over100,
}

impl PriceBand {
    const FIFTY: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
    const HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

    /// Returns `true` if `price` falls inside the band.
    pub fn contains(self, price: Decimal) -> bool {
        match self {
            PriceBand::All => true,
            PriceBand::Under50 => price < Self::FIFTY,
            PriceBand::From50To100 => price >= Self::FIFTY && price <= Self::HUNDRED,
            PriceBand::Over100 => price > Self::HUNDRED,
        }
    }

    /// The wire name of the band.
    pub fn as_str(self) -> &'static str {
        match self {
            PriceBand::All => "all",
            PriceBand::Under50 => "under50",
            PriceBand::From50To100 => "50-100",
            PriceBand::Over100 => "over100",
        }
    }

    /// Chip label shown to shoppers.
    pub fn label(self) -> &'static str {
        match self {
            PriceBand::All => "All",
            PriceBand::Under50 => "Under $50",
            PriceBand::From50To100 => "$50-$100",
            PriceBand::Over100 => "Over $100",
        }
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBand {
    type Err = PriceBandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(PriceBand::All),
            "under50" => Ok(PriceBand::Under50),
            "50-100" => Ok(PriceBand::From50To100),
            "over100" => Ok(PriceBand::Over100),
            other => Err(PriceBandError(other.to_string())),
        }
    }
}
