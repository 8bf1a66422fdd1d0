use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::snapshot::LedgerSnapshot;

/// Job details printed above the line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceHeader {
    pub customer: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_date: Option<NaiveDate>,
    #[serde(default)]
    pub technician: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Payload posted to the form-submission endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSubmission {
    pub id: Uuid,
    pub form: String,
    pub submitted_at: DateTime<Utc>,
    pub header: InvoiceHeader,
    pub ledger: LedgerSnapshot,
}
