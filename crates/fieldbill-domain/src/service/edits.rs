//! Replay of recorded ledger edits
//!
//! Consumable rows are addressed by position in the current list so a
//! recorded script does not depend on the ids a ledger hands out.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::pricing::{find_catalog_item, CatalogItem};
use crate::model::{ConsumableField, LaborCategory, LaborField, RowId};
use crate::service::ledger::{FieldUpdate, Ledger};

/// One user input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum LedgerEdit {
    Labor {
        category: LaborCategory,
        field: LaborField,
        value: String,
    },
    Consumable {
        row: usize,
        field: ConsumableField,
        value: String,
    },
    Label {
        row: usize,
        label: String,
    },
    AddRow,
    RemoveRow {
        row: usize,
    },
    ExtraCharges {
        value: String,
    },
    CatalogItem {
        row: usize,
        item: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub skipped: usize,
    /// Positions of rows that asked for a custom label and never got one
    pub pending_labels: Vec<usize>,
}

fn row_at(ledger: &Ledger, position: usize) -> Option<RowId> {
    ledger.consumable_rows().get(position).map(|row| row.id())
}

/// Apply edits in order; edits addressing a missing row or catalog item
/// are skipped
pub fn apply_edits(ledger: &mut Ledger, edits: &[LedgerEdit], catalog: &[CatalogItem]) -> ReplayReport {
    let mut report = ReplayReport::default();
    let mut pending: Vec<RowId> = Vec::new();

    for (index, edit) in edits.iter().enumerate() {
        debug!(index, ?edit, "replaying edit");
        let applied = match edit {
            LedgerEdit::Labor {
                category,
                field,
                value,
            } => {
                ledger.update_labor_field(*category, *field, value);
                true
            }
            LedgerEdit::Consumable { row, field, value } => match row_at(ledger, *row) {
                Some(id) => match ledger.update_consumable_field(id, *field, value) {
                    FieldUpdate::CustomLabelRequested(id) => {
                        pending.push(id);
                        true
                    }
                    FieldUpdate::Applied => {
                        if *field == ConsumableField::Item {
                            pending.retain(|p| *p != id);
                        }
                        true
                    }
                    FieldUpdate::UnknownRow => false,
                },
                None => false,
            },
            LedgerEdit::Label { row, label } => match row_at(ledger, *row) {
                Some(id) => {
                    pending.retain(|p| *p != id);
                    ledger.set_consumable_label(id, label)
                }
                None => false,
            },
            LedgerEdit::AddRow => {
                ledger.add_consumable_row();
                true
            }
            LedgerEdit::RemoveRow { row } => match row_at(ledger, *row) {
                Some(id) => {
                    pending.retain(|p| *p != id);
                    ledger.remove_consumable_row(id)
                }
                None => false,
            },
            LedgerEdit::ExtraCharges { value } => {
                ledger.set_extra_charges(value);
                true
            }
            LedgerEdit::CatalogItem { row, item } => {
                match (row_at(ledger, *row), find_catalog_item(catalog, item)) {
                    (Some(id), Some(found)) => {
                        pending.retain(|p| *p != id);
                        ledger.select_catalog_item(id, found)
                    }
                    _ => false,
                }
            }
        };

        if applied {
            report.applied += 1;
        } else {
            warn!(index, ?edit, "edit skipped");
            report.skipped += 1;
        }
    }

    report.pending_labels = pending
        .iter()
        .filter_map(|id| ledger.consumable_rows().iter().position(|row| row.id() == *id))
        .collect();
    report
}
