//! Invoice use cases: replay a recorded form session, snapshot it and
//! queue it for submission

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use fieldbill_domain::model::{CatalogItem, InvoiceHeader, InvoiceSubmission, PricingPlan};
use fieldbill_domain::repository::SubmissionOutbox;
use fieldbill_domain::service::{apply_edits, LastRowPolicy, Ledger, LedgerEdit, ReplayReport};
use fieldbill_types::{Error, Result};

pub const INVOICE_FORM: &str = "invoice";

/// A recorded invoice session: header fields plus the edits in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceScript {
    pub header: InvoiceHeader,
    #[serde(default)]
    pub edits: Vec<LedgerEdit>,
}

pub struct InvoiceRun {
    pub header: InvoiceHeader,
    pub ledger: Ledger,
    pub report: ReplayReport,
}

pub fn load_script(path: &Path) -> Result<InvoiceScript> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Build a fresh ledger, pre-fill it from the plan and replay the script.
///
/// Catalog lookups see the plan's items first, then `extra_catalog`.
pub fn run_script(
    script: &InvoiceScript,
    policy: LastRowPolicy,
    plan: Option<&PricingPlan>,
    extra_catalog: &[CatalogItem],
) -> InvoiceRun {
    let mut ledger = Ledger::with_policy(policy);

    let mut catalog: Vec<CatalogItem> = Vec::new();
    if let Some(plan) = plan {
        ledger.apply_pricing_plan(plan);
        catalog.extend(plan.items.iter().cloned());
    }
    catalog.extend(extra_catalog.iter().cloned());

    let report = apply_edits(&mut ledger, &script.edits, &catalog);
    if report.skipped > 0 {
        warn!(skipped = report.skipped, "some edits did not apply");
    }
    info!(
        customer = %script.header.customer,
        total = %ledger.compute_total(),
        "invoice replayed"
    );

    InvoiceRun {
        header: script.header.clone(),
        ledger,
        report,
    }
}

pub fn build_submission(header: InvoiceHeader, ledger: &Ledger) -> Result<InvoiceSubmission> {
    if header.customer.trim().is_empty() {
        return Err(Error::Validation("invoice needs a customer".to_string()));
    }
    Ok(InvoiceSubmission {
        id: Uuid::new_v4(),
        form: INVOICE_FORM.to_string(),
        submitted_at: Utc::now(),
        header,
        ledger: ledger.snapshot(),
    })
}

pub fn submit(outbox: &impl SubmissionOutbox, submission: &InvoiceSubmission) -> Result<()> {
    outbox.enqueue(submission)?;
    info!(id = %submission.id, total = %submission.ledger.total, "invoice submitted to outbox");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldbill_infra::persistence::FileOutbox;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::tempdir;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const SCRIPT: &str = r#"{
        "header": {"customer": "Basin Energy", "location": "Pad 7", "technician": "R. Diaz"},
        "edits": [
            {"op":"labor","category":"mileage","field":"qty","value":"40"},
            {"op":"consumable","row":0,"field":"qty","value":"2"},
            {"op":"catalogItem","row":0,"item":"Check valve"},
            {"op":"extraCharges","value":"10"}
        ]
    }"#;

    fn plan() -> PricingPlan {
        let mut plan = PricingPlan {
            name: "Standard".to_string(),
            ..Default::default()
        };
        plan.labor_rates.insert("mileage".to_string(), d("2.5"));
        plan.items.push(CatalogItem {
            name: "Check valve".to_string(),
            unit: Some("ea".to_string()),
            rate: d("42.50"),
        });
        plan
    }

    #[test]
    fn test_run_script_with_plan() {
        let script: InvoiceScript = serde_json::from_str(SCRIPT).unwrap();
        let plan = plan();
        let run = run_script(&script, LastRowPolicy::KeepRow, Some(&plan), &[]);
        assert_eq!(run.report.applied, 4);
        // 40 * 2.5 + 2 * 42.50 + 10
        assert_eq!(run.ledger.compute_total(), d("195.00"));
    }

    #[test]
    fn test_run_script_without_catalog_skips_item() {
        let script: InvoiceScript = serde_json::from_str(SCRIPT).unwrap();
        let run = run_script(&script, LastRowPolicy::KeepRow, None, &[]);
        assert_eq!(run.report.skipped, 1);
        assert_eq!(run.ledger.compute_total(), d("10.00"));
    }

    #[test]
    fn test_build_submission_requires_customer() {
        let ledger = Ledger::new();
        let err = build_submission(InvoiceHeader::default(), &ledger).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_submission_payload_shape() {
        let script: InvoiceScript = serde_json::from_str(SCRIPT).unwrap();
        let plan = plan();
        let run = run_script(&script, LastRowPolicy::KeepRow, Some(&plan), &[]);
        let submission = build_submission(run.header, &run.ledger).unwrap();
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["form"], "invoice");
        assert_eq!(json["header"]["customer"], "Basin Energy");
        assert_eq!(json["ledger"]["total"], "195.00");
        assert_eq!(json["ledger"]["consumables"][0]["label"], "Check valve");
        assert!(json["submittedAt"].is_string());
    }

    #[test]
    fn test_submit_writes_outbox() {
        let dir = tempdir().unwrap();
        let outbox = FileOutbox::open(dir.path().to_path_buf()).unwrap();
        let mut header = InvoiceHeader::default();
        header.customer = "Acme".to_string();
        let submission = build_submission(header, &Ledger::new()).unwrap();
        submit(&outbox, &submission).unwrap();
        let pending = outbox.pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, submission.id);
    }
}
