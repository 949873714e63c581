//! GPU catalog: thermal design power and reference acquisition price per model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuCatalogEntry {
    pub model: String,

    /// Thermal design power per unit (W)
    pub tdp_watts: u32,

    /// Default acquisition price per unit (local currency)
    pub reference_price: f64,
}

/// GPU catalog keyed by model name
#[derive(Debug, Clone, Default)]
pub struct GpuCatalog {
    entries: BTreeMap<String, GpuCatalogEntry>,
}

impl GpuCatalog {
    /// Build a catalog, rejecting duplicates and non-positive values
    pub fn from_entries(entries: Vec<GpuCatalogEntry>) -> Result<Self> {
        let mut map = BTreeMap::new();

        for entry in entries {
            if entry.tdp_watts == 0 {
                return Err(Error::invalid_reference(
                    "gpu catalog",
                    format!("{} has zero TDP", entry.model),
                ));
            }
            if !(entry.reference_price.is_finite() && entry.reference_price > 0.0) {
                return Err(Error::invalid_reference(
                    "gpu catalog",
                    format!("{} has non-positive reference price {}", entry.model, entry.reference_price),
                ));
            }
            if map.contains_key(&entry.model) {
                return Err(Error::invalid_reference(
                    "gpu catalog",
                    format!("duplicate model {}", entry.model),
                ));
            }
            map.insert(entry.model.clone(), entry);
        }

        Ok(Self { entries: map })
    }

    /// NVIDIA datacenter and workstation parts (TDP from nvidia.com)
    pub fn default_catalog() -> Self {
        let entries = [
            ("NVIDIA T4", 70, 15_000.0),
            ("NVIDIA A100", 400, 120_000.0),
            ("NVIDIA H100", 700, 200_000.0),
            ("NVIDIA RTX 4090", 450, 12_000.0),
            ("NVIDIA L40S", 350, 80_000.0),
        ];

        Self {
            entries: entries
                .iter()
                .map(|&(model, tdp_watts, reference_price)| {
                    (
                        model.to_string(),
                        GpuCatalogEntry {
                            model: model.to_string(),
                            tdp_watts,
                            reference_price,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, model: &str) -> Option<&GpuCatalogEntry> {
        self.entries.get(model)
    }

    /// Look up a model, failing with `UnknownModel`
    pub fn lookup(&self, model: &str) -> Result<&GpuCatalogEntry> {
        self.get(model).ok_or_else(|| Error::UnknownModel {
            model: model.to_string(),
        })
    }

    /// Entries in model-name order
    pub fn iter(&self) -> impl Iterator<Item = &GpuCatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
