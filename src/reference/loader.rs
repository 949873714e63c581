//! CSV-based reference data loader
//!
//! Loads the GPU catalog, tariff tiers and competitor offers from CSV files in data/reference/

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use super::{CompetitorOffer, CompetitorTable, GpuCatalog, GpuCatalogEntry, TariffTable, TariffTier};
use crate::error::{Error, Result};

/// Default path to reference data directory
pub const DEFAULT_REFERENCE_PATH: &str = "data/reference";

pub const GPU_CATALOG_FILE: &str = "gpu_catalog.csv";
pub const TARIFF_TIERS_FILE: &str = "tariff_tiers.csv";
pub const COMPETITOR_OFFERS_FILE: &str = "competitor_offers.csv";

#[derive(Debug, Deserialize)]
struct GpuRow {
    #[serde(rename = "Model")]
    model: String,
    #[serde(rename = "TdpWatts")]
    tdp_watts: u32,
    #[serde(rename = "ReferencePrice")]
    reference_price: f64,
}

#[derive(Debug, Deserialize)]
struct TariffRow {
    #[serde(rename = "Tier")]
    tier: String,
    #[serde(rename = "RatePerKwh")]
    rate_per_kwh: f64,
}

#[derive(Debug, Deserialize)]
struct CompetitorRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "HourlyPriceUsd")]
    hourly_price_usd: f64,
}

/// Load the GPU catalog from any reader
pub fn load_gpu_catalog_from_reader<R: Read>(reader: R) -> Result<GpuCatalog> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in csv_reader.deserialize() {
        let row: GpuRow = result?;
        entries.push(GpuCatalogEntry {
            model: row.model,
            tdp_watts: row.tdp_watts,
            reference_price: row.reference_price,
        });
    }

    GpuCatalog::from_entries(entries)
}

/// Load the tariff table from any reader
///
/// Every tier must appear exactly once.
pub fn load_tariff_table_from_reader<R: Read>(reader: R) -> Result<TariffTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rates: [Option<f64>; 4] = [None; 4];

    for result in csv_reader.deserialize() {
        let row: TariffRow = result?;
        let tier: TariffTier = row
            .tier
            .parse()
            .map_err(|_| Error::invalid_reference("tariff", format!("unknown tier '{}'", row.tier)))?;
        let slot = &mut rates[tier.index()];
        if slot.is_some() {
            return Err(Error::invalid_reference("tariff", format!("duplicate tier {}", tier)));
        }
        *slot = Some(row.rate_per_kwh);
    }

    let mut resolved = [0.0; 4];
    for (i, tier) in TariffTier::ALL.iter().enumerate() {
        resolved[i] = rates[i]
            .ok_or_else(|| Error::invalid_reference("tariff", format!("missing tier {}", tier)))?;
    }

    TariffTable::new(resolved)
}

/// Load competitor offers from any reader
pub fn load_competitor_table_from_reader<R: Read>(reader: R) -> Result<CompetitorTable> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut offers = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CompetitorRow = result?;
        offers.push(CompetitorOffer {
            name: row.name,
            hourly_price_usd: row.hourly_price_usd,
        });
    }

    CompetitorTable::from_offers(offers)
}

pub fn load_gpu_catalog(path: &Path) -> Result<GpuCatalog> {
    load_gpu_catalog_from_reader(File::open(path.join(GPU_CATALOG_FILE))?)
}

pub fn load_tariff_table(path: &Path) -> Result<TariffTable> {
    load_tariff_table_from_reader(File::open(path.join(TARIFF_TIERS_FILE))?)
}

pub fn load_competitor_table(path: &Path) -> Result<CompetitorTable> {
    load_competitor_table_from_reader(File::open(path.join(COMPETITOR_OFFERS_FILE))?)
}
