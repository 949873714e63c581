//! Cloud competitor offers (on-demand hourly price in USD)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorOffer {
    /// Provider and instance type, e.g. "AWS (p4d.24xlarge)"
    pub name: String,
    pub hourly_price_usd: f64,
}

/// Competitor offers keyed by name
#[derive(Debug, Clone, Default)]
pub struct CompetitorTable {
    offers: BTreeMap<String, CompetitorOffer>,
}

impl CompetitorTable {
    pub fn from_offers(offers: Vec<CompetitorOffer>) -> Result<Self> {
        let mut map = BTreeMap::new();

        for offer in offers {
            if !(offer.hourly_price_usd.is_finite() && offer.hourly_price_usd > 0.0) {
                return Err(Error::invalid_reference(
                    "competitor",
                    format!("{} has non-positive hourly price {}", offer.name, offer.hourly_price_usd),
                ));
            }
            if map.contains_key(&offer.name) {
                return Err(Error::invalid_reference(
                    "competitor",
                    format!("duplicate offer {}", offer.name),
                ));
            }
            map.insert(offer.name.clone(), offer);
        }

        Ok(Self { offers: map })
    }

    /// On-demand 8-GPU instance prices, November 2025
    pub fn default_table() -> Self {
        let offers = [
            ("AWS (p4d.24xlarge)", 21.96),
            ("AWS (p5.48xlarge)", 55.04),
            ("AWS (p6-b200.48xlarge)", 113.93),
            ("Azure (ND40rs)", 22.03),
            ("Azure (ND96asr)", 27.20),
            ("Azure (ND96isr)", 98.32),
            ("GCP (a2-highgpu-8g)", 29.39),
            ("GCP (a2-ultragpu-8g)", 40.55),
            ("GCP (a4-highgpu-8g)", 88.93),
        ];

        Self {
            offers: offers
                .iter()
                .map(|&(name, hourly_price_usd)| {
                    (
                        name.to_string(),
                        CompetitorOffer {
                            name: name.to_string(),
                            hourly_price_usd,
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CompetitorOffer> {
        self.offers.get(name)
    }

    /// Look up an offer, failing with `UnknownCompetitor`
    pub fn lookup(&self, name: &str) -> Result<&CompetitorOffer> {
        self.get(name).ok_or_else(|| Error::UnknownCompetitor {
            name: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompetitorOffer> {
        self.offers.values()
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = CompetitorTable::default_table();
        assert_eq!(table.len(), 9);
        assert_eq!(table.get("AWS (p4d.24xlarge)").unwrap().hourly_price_usd, 21.96);
        assert_eq!(table.get("GCP (a4-highgpu-8g)").unwrap().hourly_price_usd, 88.93);
    }

    #[test]
    fn test_lookup_unknown() {
        let table = CompetitorTable::default_table();
        assert!(matches!(
            table.lookup("Oracle (BM.GPU4.8)"),
            Err(Error::UnknownCompetitor { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_price() {
        let offer = CompetitorOffer {
            name: "Free Cloud".to_string(),
            hourly_price_usd: 0.0,
        };
        assert!(CompetitorTable::from_offers(vec![offer]).is_err());
    }
}
