//! Simulation inputs and boundary validation

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reference::{GpuCatalog, TariffTier};

/// Cost of the residential solar + battery installation (portalsolar.com.br estimate)
pub const DEFAULT_SOLAR_INSTALLATION_COST: f64 = 31_050.0;

/// Discount offered to subscribers relative to the competitor price (%)
pub const DEFAULT_DISCOUNT_PCT: f64 = 25.0;

fn default_discount_pct() -> f64 { DEFAULT_DISCOUNT_PCT }
fn default_subscribers() -> u32 { 1 }
fn default_solar_installation_cost() -> f64 { DEFAULT_SOLAR_INSTALLATION_COST }

/// One line of the user-built GPU list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuSelection {
    /// Key into the GPU catalog
    pub model: String,
    pub quantity: u32,

    /// Price actually paid per unit; may differ from the catalog reference price
    pub unit_price: f64,
}

impl GpuSelection {
    pub fn new(model: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            model: model.into(),
            quantity,
            unit_price,
        }
    }

    /// Selection priced at the catalog reference price
    pub fn at_reference_price(catalog: &GpuCatalog, model: &str, quantity: u32) -> Result<Self> {
        let entry = catalog.lookup(model)?;
        Ok(Self::new(model, quantity, entry.reference_price))
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.quantity == 0 {
            return Err(Error::invalid_input(
                format!("gpus[{}].quantity", position),
                format!("{} quantity must be at least 1", self.model),
            ));
        }
        if !(self.unit_price.is_finite() && self.unit_price > 0.0) {
            return Err(Error::invalid_input(
                format!("gpus[{}].unit_price", position),
                format!("{} unit price must be positive, got {}", self.model, self.unit_price),
            ));
        }
        Ok(())
    }
}

/// Everything one simulation run needs besides reference data and model config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Ordered GPU selections
    pub gpus: Vec<GpuSelection>,

    pub tariff: TariffTier,

    /// Local currency per USD
    pub exchange_rate: f64,

    /// Key into the competitor table
    pub competitor: String,

    /// Discount on the competitor price, 0-100 inclusive
    #[serde(default = "default_discount_pct")]
    pub discount_pct: f64,

    #[serde(default = "default_subscribers")]
    pub subscribers: u32,

    #[serde(default = "default_solar_installation_cost")]
    pub solar_installation_cost: f64,
}

impl SimulationInput {
    /// Input with default discount, one subscriber and the default solar cost
    pub fn new(
        gpus: Vec<GpuSelection>,
        tariff: TariffTier,
        exchange_rate: f64,
        competitor: impl Into<String>,
    ) -> Self {
        Self {
            gpus,
            tariff,
            exchange_rate,
            competitor: competitor.into(),
            discount_pct: DEFAULT_DISCOUNT_PCT,
            subscribers: 1,
            solar_installation_cost: DEFAULT_SOLAR_INSTALLATION_COST,
        }
    }

    /// Reject inputs that would produce meaningless downstream numbers
    ///
    /// Catalog and competitor lookups are checked later, against the model's reference data.
    pub fn validate(&self) -> Result<()> {
        if self.gpus.is_empty() {
            return Err(Error::invalid_input("gpus", "at least one GPU selection is required"));
        }
        for (position, selection) in self.gpus.iter().enumerate() {
            selection.validate(position)?;
        }
        if !(self.exchange_rate.is_finite() && self.exchange_rate > 0.0) {
            return Err(Error::invalid_input(
                "exchange_rate",
                format!("must be positive, got {}", self.exchange_rate),
            ));
        }
        if !(0.0..=100.0).contains(&self.discount_pct) {
            return Err(Error::invalid_input(
                "discount_pct",
                format!("must be within [0, 100], got {}", self.discount_pct),
            ));
        }
        if self.subscribers == 0 {
            return Err(Error::invalid_input("subscribers", "must be at least 1"));
        }
        if !(self.solar_installation_cost.is_finite() && self.solar_installation_cost > 0.0) {
            return Err(Error::invalid_input(
                "solar_installation_cost",
                format!("must be positive, got {}", self.solar_installation_cost),
            ));
        }
        Ok(())
    }

    /// Parse an input from JSON, applying defaults for omitted optional fields
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
