//! Electricity tariff tiers (ANEEL "bandeiras tarifárias")
//!
//! Four fixed tiers: a base rate plus three strictly increasing surcharges.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tariff tier, ordered from cheapest to most expensive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TariffTier {
    Green,
    Yellow,
    Red1,
    Red2,
}

impl TariffTier {
    pub const ALL: [TariffTier; 4] = [
        TariffTier::Green,
        TariffTier::Yellow,
        TariffTier::Red1,
        TariffTier::Red2,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            TariffTier::Green => 0,
            TariffTier::Yellow => 1,
            TariffTier::Red1 => 2,
            TariffTier::Red2 => 3,
        }
    }

    /// Short key used in CSV files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            TariffTier::Green => "green",
            TariffTier::Yellow => "yellow",
            TariffTier::Red1 => "red1",
            TariffTier::Red2 => "red2",
        }
    }
}

impl fmt::Display for TariffTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TariffTier::Green => "Green",
            TariffTier::Yellow => "Yellow",
            TariffTier::Red1 => "Red 1",
            TariffTier::Red2 => "Red 2",
        };
        f.write_str(label)
    }
}

impl FromStr for TariffTier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "green" => Ok(TariffTier::Green),
            "yellow" => Ok(TariffTier::Yellow),
            "red1" => Ok(TariffTier::Red1),
            "red2" => Ok(TariffTier::Red2),
            _ => Err(Error::invalid_input(
                "tariff",
                format!("unknown tier '{}', expected one of green, yellow, red1, red2", s),
            )),
        }
    }
}

/// Rate per kWh for each tier
#[derive(Debug, Clone, PartialEq)]
pub struct TariffTable {
    rates: [f64; 4],
}

impl TariffTable {
    /// Build from per-tier rates in tier order
    ///
    /// Rates must be finite, non-negative and strictly increasing.
    pub fn new(rates: [f64; 4]) -> Result<Self> {
        for (tier, &rate) in TariffTier::ALL.iter().zip(rates.iter()) {
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(Error::invalid_reference(
                    "tariff",
                    format!("{} rate must be non-negative, got {}", tier, rate),
                ));
            }
        }
        for pair in TariffTier::ALL.windows(2) {
            let (lower, upper) = (pair[0], pair[1]);
            if rates[upper.index()] <= rates[lower.index()] {
                return Err(Error::invalid_reference(
                    "tariff",
                    format!("{} rate must exceed {} rate", upper, lower),
                ));
            }
        }
        Ok(Self { rates })
    }

    /// Build from a base (green) rate and the three surcharges on top of it
    pub fn from_base_and_surcharges(base_rate: f64, surcharges: [f64; 3]) -> Result<Self> {
        Self::new([
            base_rate,
            base_rate + surcharges[0],
            base_rate + surcharges[1],
            base_rate + surcharges[2],
        ])
    }

    /// Neoenergia Brasília base rate with the ANEEL flag increments
    pub fn default_table() -> Self {
        Self {
            rates: [
                0.82672,
                0.82672 + 0.01885,
                0.82672 + 0.04463,
                0.82672 + 0.07877,
            ],
        }
    }

    pub fn rate(&self, tier: TariffTier) -> f64 {
        self.rates[tier.index()]
    }

    /// Surcharge of a tier over the green rate
    pub fn surcharge(&self, tier: TariffTier) -> f64 {
        self.rate(tier) - self.rate(TariffTier::Green)
    }

    /// (tier, rate) pairs in tier order
    pub fn iter(&self) -> impl Iterator<Item = (TariffTier, f64)> + '_ {
        TariffTier::ALL.into_iter().map(move |tier| (tier, self.rate(tier)))
    }
}

impl Default for TariffTable {
    fn default() -> Self {
        Self::default_table()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_rates() {
        let table = TariffTable::default_table();
        assert_eq!(table.rate(TariffTier::Green), 0.82672);
        assert_abs_diff_eq!(table.rate(TariffTier::Yellow), 0.84557, epsilon = 1e-12);
        assert_abs_diff_eq!(table.rate(TariffTier::Red1), 0.87135, epsilon = 1e-12);
        assert_abs_diff_eq!(table.rate(TariffTier::Red2), 0.90549, epsilon = 1e-12);
        assert_abs_diff_eq!(table.surcharge(TariffTier::Red2), 0.07877, epsilon = 1e-12);
    }

    #[test]
    fn test_default_table_satisfies_invariant() {
        let table = TariffTable::default_table();
        let rates: Vec<f64> = table.iter().map(|(_, r)| r).collect();
        assert!(TariffTable::new([rates[0], rates[1], rates[2], rates[3]]).is_ok());
    }

    #[test]
    fn test_rejects_non_increasing_rates() {
        assert!(TariffTable::new([0.8, 0.8, 0.9, 1.0]).is_err());
        assert!(TariffTable::new([0.8, 0.9, 0.85, 1.0]).is_err());
        assert!(TariffTable::new([-0.1, 0.9, 0.95, 1.0]).is_err());
        assert!(TariffTable::from_base_and_surcharges(0.5, [0.01, 0.02, 0.03]).is_ok());
    }

    #[test]
    fn test_parse_tier() {
        assert_eq!("green".parse::<TariffTier>().unwrap(), TariffTier::Green);
        assert_eq!("Red 1".parse::<TariffTier>().unwrap(), TariffTier::Red1);
        assert_eq!("RED-2".parse::<TariffTier>().unwrap(), TariffTier::Red2);
        assert!("purple".parse::<TariffTier>().is_err());
    }
}
