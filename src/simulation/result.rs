//! Simulation output structures

use serde::{Deserialize, Serialize};

use crate::reference::TariffTier;

/// Time until accumulated margin covers the investment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreakEven {
    Reached { months: f64, hours: f64 },
    /// Revenue does not exceed the recurring energy cost
    Unreachable,
}

impl BreakEven {
    pub fn is_reached(&self) -> bool {
        matches!(self, BreakEven::Reached { .. })
    }

    pub fn months(&self) -> Option<f64> {
        match *self {
            BreakEven::Reached { months, .. } => Some(months),
            BreakEven::Unreachable => None,
        }
    }

    pub fn hours(&self) -> Option<f64> {
        match *self {
            BreakEven::Reached { hours, .. } => Some(hours),
            BreakEven::Unreachable => None,
        }
    }
}

/// Figures derived from one `SimulationInput`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    // Power
    pub gpu_power_watts: u64,
    pub server_power_watts: f64,

    // Energy
    pub tariff_tier: TariffTier,
    pub tariff_rate: f64,
    pub monthly_energy_kwh: f64,
    pub monthly_energy_cost: f64,

    // Investment
    pub gpu_acquisition_cost: f64,
    pub solar_installation_cost: f64,
    pub total_investment: f64,

    // Market
    pub competitor: String,
    pub competitor_monthly_cost: f64,
    pub monthly_revenue: f64,

    /// Revenue minus energy cost; negative when the server runs at a loss
    pub monthly_margin: f64,

    pub break_even: BreakEven,
}
