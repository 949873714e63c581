//! Static reference data: GPU catalog, tariff tiers and competitor offers

mod gpu;
mod tariff;
mod competitor;
pub mod loader;

pub use gpu::{GpuCatalog, GpuCatalogEntry};
pub use tariff::{TariffTable, TariffTier};
pub use competitor::{CompetitorOffer, CompetitorTable};

use std::path::Path;

use crate::error::Result;

/// Container for all reference tables a simulation reads
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub gpus: GpuCatalog,
    pub tariffs: TariffTable,
    pub competitors: CompetitorTable,
}

impl ReferenceData {
    /// Built-in tables (November 2025 prices)
    pub fn default_reference() -> Self {
        Self {
            gpus: GpuCatalog::default_catalog(),
            tariffs: TariffTable::default_table(),
            competitors: CompetitorTable::default_table(),
        }
    }

    /// Load reference tables from CSV files in the default location (data/reference/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_REFERENCE_PATH))
    }

    /// Load reference tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let reference = Self {
            gpus: loader::load_gpu_catalog(path)?,
            tariffs: loader::load_tariff_table(path)?,
            competitors: loader::load_competitor_table(path)?,
        };

        log::info!(
            "Loaded reference data from {}: {} GPU models, {} competitor offers",
            path.display(),
            reference.gpus.len(),
            reference.competitors.len()
        );

        Ok(reference)
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::default_reference()
    }
}
