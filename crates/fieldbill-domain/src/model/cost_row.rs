use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::service::amount::line_amount;

/// Identifier of a cost row, unique within one ledger and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Editable field of a labor row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaborField {
    Rate,
    Qty,
}

/// Editable field of a consumable row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsumableField {
    Item,
    Qty,
    Rate,
}

/// One billable line.
///
/// `quantity` and `rate` hold the raw text the technician typed. `amount`
/// is derived and only changes when both inputs parse; it stays `None`
/// until that happens for the first time.
#[derive(Debug, Clone, PartialEq)]
pub struct CostRow {
    id: RowId,
    label: String,
    quantity: String,
    rate: String,
    amount: Option<Decimal>,
}

impl CostRow {
    pub fn new(id: RowId) -> Self {
        Self::with_label(id, String::new())
    }

    pub fn with_label(id: RowId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            quantity: String::new(),
            rate: String::new(),
            amount: None,
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Contribution of this row to a section total
    pub fn amount_or_zero(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    pub(crate) fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Store the raw quantity; returns whether `amount` was recomputed
    pub(crate) fn set_quantity(&mut self, raw: impl Into<String>) -> bool {
        self.quantity = raw.into();
        self.recompute()
    }

    /// Store the raw rate; returns whether `amount` was recomputed
    pub(crate) fn set_rate(&mut self, raw: impl Into<String>) -> bool {
        self.rate = raw.into();
        self.recompute()
    }

    fn recompute(&mut self) -> bool {
        match line_amount(&self.rate, &self.quantity) {
            Some(amount) => {
                self.amount = Some(amount);
                true
            }
            None => false,
        }
    }
}
