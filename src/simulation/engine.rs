//! Financial model: runs the calculation stages in order for one input

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::input::SimulationInput;
use super::model::{self, HOURS_PER_MONTH, SERVER_POWER_MULTIPLIER};
use super::result::{BreakEven, SimulationResult};
use crate::error::{Error, Result};
use crate::reference::ReferenceData;

fn default_hours_per_month() -> f64 { HOURS_PER_MONTH }
fn default_server_power_multiplier() -> f64 { SERVER_POWER_MULTIPLIER }

/// Tunable constants of the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Hours of continuous operation per month (default 24 x 30)
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: f64,

    /// Server draw as a multiple of GPU draw (default 2.5)
    #[serde(default = "default_server_power_multiplier")]
    pub server_power_multiplier: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            hours_per_month: HOURS_PER_MONTH,
            server_power_multiplier: SERVER_POWER_MULTIPLIER,
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.hours_per_month.is_finite() && self.hours_per_month > 0.0) {
            return Err(Error::invalid_input(
                "hours_per_month",
                format!("must be positive, got {}", self.hours_per_month),
            ));
        }
        if !(self.server_power_multiplier.is_finite() && self.server_power_multiplier >= 1.0) {
            return Err(Error::invalid_input(
                "server_power_multiplier",
                format!("must be at least 1.0, got {}", self.server_power_multiplier),
            ));
        }
        Ok(())
    }

    /// Load and validate a config from a JSON file; omitted fields take their defaults
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let config: Self = serde_json::from_str(&fs::read_to_string(path)?)?;
        config.validate()?;
        Ok(config)
    }
}

/// Calculation pipeline bound to a set of reference tables and a config
#[derive(Debug, Clone)]
pub struct FinancialModel {
    reference: ReferenceData,
    config: ModelConfig,
}

impl FinancialModel {
    /// Create a model; the config is validated once here
    pub fn new(reference: ReferenceData, config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { reference, config })
    }

    /// Built-in reference tables with the default config
    pub fn with_defaults() -> Self {
        Self {
            reference: ReferenceData::default_reference(),
            config: ModelConfig::default(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Run the whole chain for one input
    ///
    /// power -> server power -> energy cost -> competitor cost -> revenue -> investment -> break-even
    pub fn simulate(&self, input: &SimulationInput) -> Result<SimulationResult> {
        input.validate()?;
        let offer = self.reference.competitors.lookup(&input.competitor)?;
        let tariff_rate = self.reference.tariffs.rate(input.tariff);

        let gpu_power_watts = model::total_gpu_power(&input.gpus, &self.reference.gpus)?;
        let gpu_acquisition_cost = model::gpu_acquisition_cost(&input.gpus);
        let server_power_watts = model::server_power_estimate_with_multiplier(
            gpu_power_watts as f64,
            self.config.server_power_multiplier,
        );
        log::debug!(
            "GPU power {} W, server power {:.0} W, GPU cost {:.2}",
            gpu_power_watts,
            server_power_watts,
            gpu_acquisition_cost
        );

        let energy =
            model::monthly_energy_cost_over(server_power_watts, tariff_rate, self.config.hours_per_month);
        log::debug!(
            "Energy {:.2} kWh/month at {} ({:.5}/kWh) costs {:.2}",
            energy.kwh,
            input.tariff,
            tariff_rate,
            energy.cost
        );

        let competitor_monthly_cost = model::competitor_cost_over(
            offer.hourly_price_usd,
            input.exchange_rate,
            self.config.hours_per_month,
        );
        let monthly_revenue =
            model::monthly_revenue(competitor_monthly_cost, input.discount_pct, input.subscribers);
        log::debug!(
            "{} costs {:.2}/month; revenue {:.2} from {} subscribers at {}% discount",
            offer.name,
            competitor_monthly_cost,
            monthly_revenue,
            input.subscribers,
            input.discount_pct
        );

        let total_investment = input.solar_installation_cost + gpu_acquisition_cost;
        let break_even = model::break_even_over(
            energy.cost,
            monthly_revenue,
            total_investment,
            self.config.hours_per_month,
        );
        match break_even {
            BreakEven::Reached { months, .. } => {
                log::debug!("Break-even after {:.2} months on {:.2} invested", months, total_investment)
            }
            BreakEven::Unreachable => log::warn!(
                "Revenue {:.2} does not exceed energy cost {:.2}; break-even unreachable",
                monthly_revenue,
                energy.cost
            ),
        }

        Ok(SimulationResult {
            gpu_power_watts,
            server_power_watts,
            tariff_tier: input.tariff,
            tariff_rate,
            monthly_energy_kwh: energy.kwh,
            monthly_energy_cost: energy.cost,
            gpu_acquisition_cost,
            solar_installation_cost: input.solar_installation_cost,
            total_investment,
            competitor: offer.name.clone(),
            competitor_monthly_cost,
            monthly_revenue,
            monthly_margin: monthly_revenue - energy.cost,
            break_even,
        })
    }
}

impl Default for FinancialModel {
    fn default() -> Self {
        Self::with_defaults()
    }
}
