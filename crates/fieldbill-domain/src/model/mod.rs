//! Domain model types

pub mod app_state;
pub mod cost_row;
pub mod invoice;
pub mod jsa;
pub mod labor;
pub mod pricing;
pub mod snapshot;

pub use app_state::{AppState, AuthFlags, Theme};
pub use cost_row::{ConsumableField, CostRow, LaborField, RowId};
pub use invoice::{InvoiceHeader, InvoiceSubmission};
pub use jsa::{HazardEntry, HazardField, JobInfo, JsaForm, JsaStep, PersonId, Personnel, ValidationIssue};
pub use labor::{LaborCategory, LaborSection};
pub use pricing::{CatalogItem, PricingPlan};
pub use snapshot::{LaborLineSnapshot, LedgerSnapshot, LineSnapshot};
