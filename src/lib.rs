//! Solar GPU Break-Even - feasibility model for solar-backed on-premise GPU servers
//!
//! This library provides:
//! - Static reference data (GPU catalog, tariff tiers, cloud competitor offers) with CSV loading
//! - The financial model: power, energy cost, competitor cost, revenue and break-even stages
//! - Batch and sensitivity scenario runs
//! - Text and CSV reporting

pub mod error;
pub mod reference;
pub mod simulation;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use reference::{ReferenceData, GpuCatalog, TariffTable, TariffTier, CompetitorTable};
pub use simulation::{FinancialModel, ModelConfig, GpuSelection, SimulationInput, SimulationResult, BreakEven};
pub use scenario::{ScenarioRunner, SensitivityPoint};
