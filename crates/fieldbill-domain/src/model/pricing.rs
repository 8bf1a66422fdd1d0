use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Consumable item with its default unit rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    pub rate: Decimal,
}

/// Named set of default labor rates plus a consumables catalog
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Keyed by labor category key (`loadUnload`, `mileage`, ...)
    #[serde(default)]
    pub labor_rates: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
}

/// Case-insensitive catalog lookup
pub fn find_catalog_item<'a>(items: &'a [CatalogItem], name: &str) -> Option<&'a CatalogItem> {
    let name = name.trim();
    items.iter().find(|item| item.name.eq_ignore_ascii_case(name))
}
