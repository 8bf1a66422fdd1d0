//! Repository trait definitions for data persistence

use uuid::Uuid;

use crate::model::{AppState, InvoiceSubmission};
use fieldbill_types::Result;

/// Persistence adapter for theme and auth flags
pub trait AppStateStore {
    /// Load the saved state, `None` when nothing was saved yet
    fn load(&self) -> Result<Option<AppState>>;

    /// Save the state, replacing any previous one
    fn save(&self, state: &AppState) -> Result<()>;
}

/// Submissions waiting to be posted to the form endpoint
pub trait SubmissionOutbox {
    /// Queue a submission
    fn enqueue(&self, submission: &InvoiceSubmission) -> Result<()>;

    /// All queued submissions, oldest first
    fn pending(&self) -> Result<Vec<InvoiceSubmission>>;

    /// Drop a submission, returning whether it was queued
    fn remove(&self, id: Uuid) -> Result<bool>;
}
