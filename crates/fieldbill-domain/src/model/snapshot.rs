//! Serializable view of a ledger, handed to the submission payload

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::labor::LaborCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSnapshot {
    pub label: String,
    pub quantity: String,
    pub rate: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborLineSnapshot {
    pub category: LaborCategory,
    pub label: String,
    pub quantity: String,
    pub rate: String,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub labor: Vec<LaborLineSnapshot>,
    pub consumables: Vec<LineSnapshot>,
    pub labor_total: Decimal,
    pub consumables_total: Decimal,
    pub extra_charges: String,
    pub total: Decimal,
}
