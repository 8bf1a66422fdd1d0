//! Use cases

pub mod invoice_service;
pub mod session;

pub use invoice_service::{
    build_submission, load_script, run_script, submit, InvoiceRun, InvoiceScript,
};
pub use session::{load_app_state, update_app_state};
