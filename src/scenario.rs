//! Scenario runner for batch and sensitivity simulations
//!
//! Loads reference data once, then evaluates many inputs against it. Runs are
//! independent, so batches are evaluated in parallel.

use rayon::prelude::*;

use crate::error::Result;
use crate::reference::{ReferenceData, TariffTier};
use crate::simulation::{FinancialModel, ModelConfig, SimulationInput, SimulationResult};

/// One point of a sensitivity sweep: the varied input and its result
#[derive(Debug, Clone)]
pub struct SensitivityPoint {
    pub input: SimulationInput,
    pub result: SimulationResult,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for tier_result in runner.tariff_sweep(&input)? {
///     println!("{}: {:?}", tier_result.tariff_tier, tier_result.break_even);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    model: FinancialModel,
}

impl ScenarioRunner {
    /// Create runner with built-in reference data and default config
    pub fn new() -> Self {
        Self {
            model: FinancialModel::with_defaults(),
        }
    }

    /// Create runner by loading reference data from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            model: FinancialModel::new(ReferenceData::from_csv()?, ModelConfig::default())?,
        })
    }

    /// Create runner from a specific reference directory
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self> {
        Ok(Self {
            model: FinancialModel::new(ReferenceData::from_csv_path(path)?, ModelConfig::default())?,
        })
    }

    /// Create runner around an already configured model
    pub fn with_model(model: FinancialModel) -> Self {
        Self { model }
    }

    pub fn run(&self, input: &SimulationInput) -> Result<SimulationResult> {
        self.model.simulate(input)
    }

    /// Run many inputs; results are in input order, one per input
    pub fn run_batch(&self, inputs: &[SimulationInput]) -> Vec<Result<SimulationResult>> {
        log::info!("Running batch of {} simulations", inputs.len());
        inputs.par_iter().map(|input| self.model.simulate(input)).collect()
    }

    /// The same input under every tariff tier, cheapest first
    pub fn tariff_sweep(&self, input: &SimulationInput) -> Result<Vec<SimulationResult>> {
        TariffTier::ALL
            .iter()
            .map(|&tariff| {
                let variant = SimulationInput {
                    tariff,
                    ..input.clone()
                };
                self.model.simulate(&variant)
            })
            .collect()
    }

    /// Every combination of tariff tier, discount and subscriber count
    ///
    /// Ordered by tier, then discount, then subscriber count. Fails on the first invalid variant.
    pub fn sensitivity_grid(
        &self,
        input: &SimulationInput,
        discounts: &[f64],
        subscriber_counts: &[u32],
    ) -> Result<Vec<SensitivityPoint>> {
        let variants: Vec<SimulationInput> = TariffTier::ALL
            .iter()
            .flat_map(|&tariff| {
                discounts.iter().flat_map(move |&discount_pct| {
                    subscriber_counts.iter().map(move |&subscribers| SimulationInput {
                        tariff,
                        discount_pct,
                        subscribers,
                        ..input.clone()
                    })
                })
            })
            .collect();

        log::info!("Running sensitivity grid of {} points", variants.len());

        variants
            .into_par_iter()
            .map(|variant| {
                let result = self.model.simulate(&variant)?;
                Ok(SensitivityPoint { input: variant, result })
            })
            .collect()
    }

    pub fn model(&self) -> &FinancialModel {
        &self.model
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
