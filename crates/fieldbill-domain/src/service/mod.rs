//! Domain services

pub mod amount;
pub mod edits;
pub mod ledger;
pub mod style;

pub use edits::{apply_edits, LedgerEdit, ReplayReport};
pub use ledger::{FieldUpdate, LastRowPolicy, Ledger, OTHER_ITEM};
pub use style::{compute_style, Color, StyleDescriptor, StyleVariant};
