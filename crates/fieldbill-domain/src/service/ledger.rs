//! Line-item ledger for invoice forms
//!
//! Holds the fixed labor rows, the user-extensible consumables list and a
//! flat extra charge, and keeps every derived amount and the grand total in
//! step with each edit. Nothing here performs I/O or fails: malformed
//! numeric text simply does not trigger a recompute.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::model::pricing::CatalogItem;
use crate::model::{
    ConsumableField, CostRow, LaborCategory, LaborField, LaborLineSnapshot, LaborSection,
    LedgerSnapshot, LineSnapshot, PricingPlan, RowId,
};
use crate::service::amount::{parse_or_zero, round2};

/// Item value that asks the UI for a custom label
pub const OTHER_ITEM: &str = "Other";

/// What happens when the sole consumable row is removed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastRowPolicy {
    /// Removal is a no-op
    #[default]
    KeepRow,
    /// The row is replaced by a fresh empty row with a new id
    ResetRow,
}

impl std::fmt::Display for LastRowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LastRowPolicy::KeepRow => write!(f, "keep_row"),
            LastRowPolicy::ResetRow => write!(f, "reset_row"),
        }
    }
}

impl std::str::FromStr for LastRowPolicy {
    type Err = fieldbill_types::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "keep_row" | "keep" => Ok(LastRowPolicy::KeepRow),
            "reset_row" | "reset" => Ok(LastRowPolicy::ResetRow),
            other => Err(fieldbill_types::Error::Validation(format!(
                "unknown last-row policy: {}",
                other
            ))),
        }
    }
}

/// Outcome of a consumable field edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Applied,
    /// The "Other" item was picked; the UI should collect a label and call
    /// `Ledger::set_consumable_label`
    CustomLabelRequested(RowId),
    UnknownRow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    labor: LaborSection,
    consumables: Vec<CostRow>,
    extra_charges: String,
    next_id: u64,
    last_row_policy: LastRowPolicy,
    total: Decimal,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_policy(LastRowPolicy::default())
    }

    /// Five labor rows and a single empty consumable row
    pub fn with_policy(last_row_policy: LastRowPolicy) -> Self {
        let mut next_id = 1;
        let labor = LaborSection::new(|| {
            let id = RowId(next_id);
            next_id += 1;
            id
        });
        let first = CostRow::new(RowId(next_id));
        next_id += 1;

        let mut ledger = Self {
            labor,
            consumables: vec![first],
            extra_charges: String::new(),
            next_id,
            last_row_policy,
            total: Decimal::ZERO,
        };
        ledger.recompute_total();
        ledger
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        id
    }

    fn consumable_mut(&mut self, row_id: RowId) -> Option<&mut CostRow> {
        self.consumables.iter_mut().find(|row| row.id() == row_id)
    }

    fn recompute_total(&mut self) {
        let sum = self
            .labor
            .total()
            .saturating_add(self.consumables_sum())
            .saturating_add(parse_or_zero(&self.extra_charges));
        self.total = round2(sum);
        trace!(total = %self.total, "ledger total recomputed");
    }

    fn consumables_sum(&self) -> Decimal {
        self.consumables
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.amount_or_zero()))
    }

    pub fn last_row_policy(&self) -> LastRowPolicy {
        self.last_row_policy
    }

    pub fn labor_row(&self, category: LaborCategory) -> &CostRow {
        self.labor.row(category)
    }

    pub fn labor_rows(&self) -> impl Iterator<Item = (LaborCategory, &CostRow)> {
        self.labor.iter()
    }

    pub fn consumable_rows(&self) -> &[CostRow] {
        &self.consumables
    }

    pub fn consumable_row(&self, row_id: RowId) -> Option<&CostRow> {
        self.consumables.iter().find(|row| row.id() == row_id)
    }

    pub fn extra_charges(&self) -> &str {
        &self.extra_charges
    }

    pub fn labor_total(&self) -> Decimal {
        round2(self.labor.total())
    }

    pub fn consumables_total(&self) -> Decimal {
        round2(self.consumables_sum())
    }

    /// Current grand total. Always reflects the latest edit.
    ///
    /// Section and grand-total sums clamp at `Decimal::MAX` rather than
    /// overflow.
    pub fn compute_total(&self) -> Decimal {
        self.total
    }

    pub fn update_labor_field(&mut self, category: LaborCategory, field: LaborField, value: &str) {
        let row = self.labor.row_mut(category);
        let recomputed = match field {
            LaborField::Rate => row.set_rate(value),
            LaborField::Qty => row.set_quantity(value),
        };
        debug!(category = %category, ?field, recomputed, "labor field updated");
        self.recompute_total();
    }

    pub fn update_consumable_field(
        &mut self,
        row_id: RowId,
        field: ConsumableField,
        value: &str,
    ) -> FieldUpdate {
        let Some(row) = self.consumable_mut(row_id) else {
            debug!(row = %row_id, "consumable update ignored: unknown row");
            return FieldUpdate::UnknownRow;
        };
        let outcome = match field {
            ConsumableField::Item => {
                row.set_label(value);
                if value == OTHER_ITEM {
                    FieldUpdate::CustomLabelRequested(row_id)
                } else {
                    FieldUpdate::Applied
                }
            }
            ConsumableField::Qty => {
                row.set_quantity(value);
                FieldUpdate::Applied
            }
            ConsumableField::Rate => {
                row.set_rate(value);
                FieldUpdate::Applied
            }
        };
        debug!(row = %row_id, ?field, "consumable field updated");
        self.recompute_total();
        outcome
    }

    /// Resolve the label of a row after a custom-label request
    pub fn set_consumable_label(&mut self, row_id: RowId, label: &str) -> bool {
        match self.consumable_mut(row_id) {
            Some(row) => {
                row.set_label(label.trim());
                true
            }
            None => false,
        }
    }

    /// Pick a catalog item for a row; the catalog rate is only used when
    /// the technician has not typed a rate yet
    pub fn select_catalog_item(&mut self, row_id: RowId, item: &CatalogItem) -> bool {
        let Some(row) = self.consumable_mut(row_id) else {
            return false;
        };
        row.set_label(item.name.clone());
        if row.rate().trim().is_empty() {
            row.set_rate(item.rate.to_string());
        }
        self.recompute_total();
        true
    }

    /// Pre-fill labor rates from a plan without touching entered rates
    pub fn apply_pricing_plan(&mut self, plan: &PricingPlan) -> usize {
        let mut applied = 0;
        for (key, rate) in &plan.labor_rates {
            let category = match key.parse::<LaborCategory>() {
                Ok(category) => category,
                Err(e) => {
                    tracing::warn!(plan = %plan.name, "skipping labor rate: {}", e);
                    continue;
                }
            };
            let row = self.labor.row_mut(category);
            if row.rate().trim().is_empty() {
                row.set_rate(rate.to_string());
                applied += 1;
            }
        }
        debug!(plan = %plan.name, applied, "pricing plan applied");
        self.recompute_total();
        applied
    }

    pub fn add_consumable_row(&mut self) -> RowId {
        let id = self.allocate_id();
        self.consumables.push(CostRow::new(id));
        debug!(row = %id, "consumable row added");
        self.recompute_total();
        id
    }

    /// Remove a consumable row. Returns whether the row set changed.
    pub fn remove_consumable_row(&mut self, row_id: RowId) -> bool {
        let Some(position) = self.consumables.iter().position(|row| row.id() == row_id) else {
            debug!(row = %row_id, "remove ignored: unknown row");
            return false;
        };

        if self.consumables.len() == 1 {
            match self.last_row_policy {
                LastRowPolicy::KeepRow => {
                    debug!(row = %row_id, "remove ignored: last consumable row");
                    return false;
                }
                LastRowPolicy::ResetRow => {
                    let id = self.allocate_id();
                    self.consumables[0] = CostRow::new(id);
                    debug!(old = %row_id, new = %id, "last consumable row reset");
                    self.recompute_total();
                    return true;
                }
            }
        }

        self.consumables.remove(position);
        debug!(row = %row_id, "consumable row removed");
        self.recompute_total();
        true
    }

    pub fn set_extra_charges(&mut self, value: &str) {
        self.extra_charges = value.to_string();
        self.recompute_total();
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            labor: self
                .labor
                .iter()
                .map(|(category, row)| LaborLineSnapshot {
                    category,
                    label: row.label().to_string(),
                    quantity: row.quantity().to_string(),
                    rate: row.rate().to_string(),
                    amount: row.amount(),
                })
                .collect(),
            consumables: self
                .consumables
                .iter()
                .map(|row| LineSnapshot {
                    label: row.label().to_string(),
                    quantity: row.quantity().to_string(),
                    rate: row.rate().to_string(),
                    amount: row.amount(),
                })
                .collect(),
            labor_total: self.labor_total(),
            consumables_total: self.consumables_total(),
            extra_charges: self.extra_charges.clone(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ids(ledger: &Ledger) -> Vec<RowId> {
        ledger.consumable_rows().iter().map(CostRow::id).collect()
    }

    #[test]
    fn test_initial_shape() {
        let ledger = Ledger::new();
        assert_eq!(ledger.labor_rows().count(), 5);
        assert_eq!(ledger.consumable_rows().len(), 1);
        assert_eq!(ledger.consumable_rows()[0].amount(), None);
        assert_eq!(ledger.compute_total(), Decimal::ZERO);
    }

    #[test]
    fn test_labor_amount_either_order() {
        for (first, second) in [(LaborField::Rate, LaborField::Qty), (LaborField::Qty, LaborField::Rate)] {
            let mut ledger = Ledger::new();
            let value = |f: LaborField| if f == LaborField::Rate { "85.555" } else { "3" };
            ledger.update_labor_field(LaborCategory::TravelTime, first, value(first));
            ledger.update_labor_field(LaborCategory::TravelTime, second, value(second));
            let row = ledger.labor_row(LaborCategory::TravelTime);
            assert_eq!(row.amount(), Some(d("256.67")));
            assert_eq!(ledger.compute_total(), d("256.67"));
        }
    }

    #[test]
    fn test_partial_input_stored_verbatim() {
        let mut ledger = Ledger::new();
        ledger.update_labor_field(LaborCategory::Mileage, LaborField::Rate, "1.");
        ledger.update_labor_field(LaborCategory::Mileage, LaborField::Qty, "120");
        let row = ledger.labor_row(LaborCategory::Mileage);
        assert_eq!(row.rate(), "1.");
        assert_eq!(row.amount(), Some(d("120.00")));
    }

    #[test]
    fn test_invalid_labor_input_keeps_amount() {
        let mut ledger = Ledger::new();
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Rate, "50");
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Qty, "2");
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Qty, "");
        assert_eq!(ledger.labor_row(LaborCategory::Labor).amount(), Some(d("100")));
        assert_eq!(ledger.compute_total(), d("100"));
    }

    #[test]
    fn test_invalid_consumable_rate_leaves_amount() {
        let mut ledger = Ledger::new();
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Qty, "4");
        ledger.update_consumable_field(row, ConsumableField::Rate, "2.5");
        let before = ledger.consumable_row(row).unwrap().amount();
        ledger.update_consumable_field(row, ConsumableField::Rate, "abc");
        assert_eq!(ledger.consumable_row(row).unwrap().amount(), before);
        assert_eq!(ledger.consumable_row(row).unwrap().rate(), "abc");

        let fresh = ledger.add_consumable_row();
        ledger.update_consumable_field(fresh, ConsumableField::Rate, "abc");
        assert_eq!(ledger.consumable_row(fresh).unwrap().amount(), None);
    }

    #[test]
    fn test_separator_and_exponent_input_keeps_amount() {
        let mut ledger = Ledger::new();
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Rate, "3");
        ledger.update_consumable_field(row, ConsumableField::Qty, "2");
        assert_eq!(ledger.consumable_row(row).unwrap().amount(), Some(d("6")));

        for raw in ["1__2", "1_000", "12..", "1e3"] {
            ledger.update_consumable_field(row, ConsumableField::Qty, raw);
            let current = ledger.consumable_row(row).unwrap();
            assert_eq!(current.quantity(), raw);
            assert_eq!(current.amount(), Some(d("6")), "qty {:?}", raw);
            assert_eq!(ledger.compute_total(), d("6"));
        }
    }

    #[test]
    fn test_add_then_remove_restores_rows() {
        let mut ledger = Ledger::new();
        ledger.add_consumable_row();
        let before = ids(&ledger);
        let added = ledger.add_consumable_row();
        assert!(ledger.remove_consumable_row(added));
        assert_eq!(ids(&ledger), before);
    }

    #[test]
    fn test_compute_total_idempotent() {
        let mut ledger = Ledger::new();
        ledger.set_extra_charges("12.345");
        assert_eq!(ledger.compute_total(), ledger.compute_total());
        assert_eq!(ledger.compute_total(), d("12.35"));
    }

    #[test]
    fn test_scenario_consumable_plus_extra() {
        let mut ledger = Ledger::new();
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Qty, "2");
        ledger.update_consumable_field(row, ConsumableField::Rate, "10.5");
        ledger.set_extra_charges("5");
        assert_eq!(ledger.compute_total(), d("26.00"));
        assert_eq!(ledger.compute_total().to_string(), "26.00");
    }

    #[test]
    fn test_missing_quantity_contributes_zero() {
        let mut ledger = Ledger::new();
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Qty, "");
        ledger.update_consumable_field(row, ConsumableField::Rate, "10");
        assert_eq!(ledger.consumable_row(row).unwrap().amount(), None);
        assert_eq!(ledger.compute_total(), Decimal::ZERO);
    }

    #[test]
    fn test_row_ids_stay_unique() {
        let mut ledger = Ledger::new();
        let mut seen = HashSet::new();
        for i in 0..20 {
            let id = ledger.add_consumable_row();
            assert!(seen.insert(id), "id {} reused", id);
            if i % 3 == 0 {
                ledger.remove_consumable_row(id);
            }
        }
        let current = ids(&ledger);
        let unique: HashSet<_> = current.iter().collect();
        assert_eq!(unique.len(), current.len());
        for (_, labor) in ledger.labor_rows() {
            assert!(!current.contains(&labor.id()));
        }
    }

    #[test]
    fn test_other_item_requests_label() {
        let mut ledger = Ledger::new();
        let row = ledger.consumable_rows()[0].id();
        assert_eq!(
            ledger.update_consumable_field(row, ConsumableField::Item, OTHER_ITEM),
            FieldUpdate::CustomLabelRequested(row)
        );
        assert!(ledger.set_consumable_label(row, " Thread dope "));
        assert_eq!(ledger.consumable_row(row).unwrap().label(), "Thread dope");
        assert_eq!(
            ledger.update_consumable_field(row, ConsumableField::Item, "Fittings"),
            FieldUpdate::Applied
        );
    }

    #[test]
    fn test_unknown_row_is_noop() {
        let mut ledger = Ledger::new();
        let before = ledger.clone();
        assert_eq!(
            ledger.update_consumable_field(RowId(999), ConsumableField::Qty, "3"),
            FieldUpdate::UnknownRow
        );
        assert!(!ledger.remove_consumable_row(RowId(999)));
        assert!(!ledger.set_consumable_label(RowId(999), "x"));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_labor_row_ids_are_not_consumable_rows() {
        let mut ledger = Ledger::new();
        let labor_id = ledger.labor_row(LaborCategory::Labor).id();
        assert_eq!(
            ledger.update_consumable_field(labor_id, ConsumableField::Qty, "1"),
            FieldUpdate::UnknownRow
        );
    }

    #[test]
    fn test_last_row_keep_policy() {
        let mut ledger = Ledger::with_policy(LastRowPolicy::KeepRow);
        let only = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(only, ConsumableField::Qty, "1");
        assert!(!ledger.remove_consumable_row(only));
        assert_eq!(ids(&ledger), vec![only]);
        assert_eq!(ledger.consumable_row(only).unwrap().quantity(), "1");
    }

    #[test]
    fn test_last_row_reset_policy() {
        let mut ledger = Ledger::with_policy(LastRowPolicy::ResetRow);
        let only = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(only, ConsumableField::Qty, "2");
        ledger.update_consumable_field(only, ConsumableField::Rate, "3");
        assert_eq!(ledger.compute_total(), d("6"));

        assert!(ledger.remove_consumable_row(only));
        let rows = ledger.consumable_rows();
        assert_eq!(rows.len(), 1);
        assert_ne!(rows[0].id(), only);
        assert_eq!(rows[0].amount(), None);
        assert_eq!(ledger.compute_total(), Decimal::ZERO);
    }

    #[test]
    fn test_catalog_item_prefills_empty_rate_only() {
        let mut ledger = Ledger::new();
        let item = CatalogItem {
            name: "Check valve".to_string(),
            unit: Some("ea".to_string()),
            rate: d("42.50"),
        };
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Qty, "2");
        assert!(ledger.select_catalog_item(row, &item));
        assert_eq!(ledger.consumable_row(row).unwrap().amount(), Some(d("85.00")));

        let other = ledger.add_consumable_row();
        ledger.update_consumable_field(other, ConsumableField::Rate, "40");
        ledger.select_catalog_item(other, &item);
        let other_row = ledger.consumable_row(other).unwrap();
        assert_eq!(other_row.label(), "Check valve");
        assert_eq!(other_row.rate(), "40");
    }

    #[test]
    fn test_pricing_plan_keeps_entered_rates() {
        let mut ledger = Ledger::new();
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Rate, "95");
        let mut plan = PricingPlan {
            name: "Standard".to_string(),
            ..Default::default()
        };
        plan.labor_rates.insert("labor".to_string(), d("80"));
        plan.labor_rates.insert("mileage".to_string(), d("2.1"));
        plan.labor_rates.insert("overtime".to_string(), d("120"));

        assert_eq!(ledger.apply_pricing_plan(&plan), 1);
        assert_eq!(ledger.labor_row(LaborCategory::Labor).rate(), "95");
        assert_eq!(ledger.labor_row(LaborCategory::Mileage).rate(), "2.1");
    }

    #[test]
    fn test_full_invoice_total_and_snapshot() {
        let mut ledger = Ledger::new();
        ledger.update_labor_field(LaborCategory::LoadUnload, LaborField::Rate, "150");
        ledger.update_labor_field(LaborCategory::LoadUnload, LaborField::Qty, "1");
        ledger.update_labor_field(LaborCategory::Mileage, LaborField::Rate, "2.25");
        ledger.update_labor_field(LaborCategory::Mileage, LaborField::Qty, "87");
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Item, "Tubing clamp");
        ledger.update_consumable_field(row, ConsumableField::Qty, "12");
        ledger.update_consumable_field(row, ConsumableField::Rate, "3.99");
        ledger.set_extra_charges("not a number");

        // 150 + 195.75 + 47.88
        assert_eq!(ledger.labor_total(), d("345.75"));
        assert_eq!(ledger.consumables_total(), d("47.88"));
        assert_eq!(ledger.compute_total(), d("393.63"));

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.labor.len(), 5);
        assert_eq!(snapshot.labor[0].category, LaborCategory::LoadUnload);
        assert_eq!(snapshot.consumables[0].label, "Tubing clamp");
        assert_eq!(snapshot.extra_charges, "not a number");
        assert_eq!(snapshot.total, d("393.63"));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["total"], "393.63");
        assert_eq!(json["labor"][0]["category"], "loadUnload");
        assert!(json["labor"][2]["amount"].is_null());
    }

    #[test]
    fn test_total_clamps_at_decimal_max() {
        let huge = "50000000000000000000000000000";
        let mut ledger = Ledger::new();
        for category in [LaborCategory::Labor, LaborCategory::Mileage] {
            ledger.update_labor_field(category, LaborField::Rate, huge);
            ledger.update_labor_field(category, LaborField::Qty, "1");
        }
        assert_eq!(ledger.labor_row(LaborCategory::Labor).amount(), Some(d(huge)));
        assert_eq!(ledger.labor_total(), Decimal::MAX);
        assert_eq!(ledger.compute_total(), Decimal::MAX);

        ledger.set_extra_charges("10");
        assert_eq!(ledger.compute_total(), Decimal::MAX);
    }
}
