//! Output formatting module

use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use fieldbill_app::app::InvoiceRun;
use fieldbill_domain::model::{AppState, CatalogItem, CostRow, InvoiceSubmission, JsaForm, JsaStep};
use fieldbill_domain::service::{StyleDescriptor, StyleVariant};
use fieldbill_types::{OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn amount_cell(amount: Option<Decimal>) -> String {
    amount.map(|a| format!("{:.2}", a)).unwrap_or_else(|| "-".to_string())
}

fn print_row(label: &str, row: &CostRow) {
    println!(
        "  {:<24} {:>10} {:>10} {:>12}",
        label,
        row.quantity(),
        row.rate(),
        amount_cell(row.amount())
    );
}

pub fn output_invoice(output_format: OutputFormat, run: &InvoiceRun) -> Result<()> {
    let ledger = &run.ledger;
    if output_format == OutputFormat::Json {
        #[derive(Serialize)]
        struct InvoiceView<'a> {
            header: &'a fieldbill_domain::model::InvoiceHeader,
            ledger: fieldbill_domain::model::LedgerSnapshot,
            replay: &'a fieldbill_domain::service::ReplayReport,
        }
        return print_json(&InvoiceView {
            header: &run.header,
            ledger: ledger.snapshot(),
            replay: &run.report,
        });
    }

    println!("\nInvoice");
    println!("=======");
    println!("Customer:   {}", run.header.customer);
    if !run.header.location.is_empty() {
        println!("Location:   {}", run.header.location);
    }
    if let Some(date) = run.header.job_date {
        println!("Job date:   {}", date);
    }
    if !run.header.technician.is_empty() {
        println!("Technician: {}", run.header.technician);
    }

    println!("\n--- Labor ---");
    println!("  {:<24} {:>10} {:>10} {:>12}", "Item", "Qty", "Rate", "Amount");
    for (_, row) in ledger.labor_rows() {
        print_row(row.label(), row);
    }
    println!("  {:>58.2}", ledger.labor_total());

    println!("\n--- Consumables ---");
    println!("  {:<24} {:>10} {:>10} {:>12}", "Item", "Qty", "Rate", "Amount");
    for row in ledger.consumable_rows() {
        let label = if row.label().is_empty() { "(unset)" } else { row.label() };
        print_row(label, row);
    }
    println!("  {:>58.2}", ledger.consumables_total());

    println!("\nExtra charges:  {}", if ledger.extra_charges().is_empty() { "-" } else { ledger.extra_charges() });
    println!("TOTAL:          {:.2}", ledger.compute_total());

    if run.report.skipped > 0 {
        println!("\n{} edit(s) skipped", run.report.skipped);
    }
    if !run.report.pending_labels.is_empty() {
        println!("Rows waiting for a custom label: {:?}", run.report.pending_labels);
    }

    Ok(())
}

pub fn output_submission_queued(output_format: OutputFormat, submission: &InvoiceSubmission) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(submission);
    }
    println!("\nQueued submission {} ({:.2})", submission.id, submission.ledger.total);
    Ok(())
}

pub fn output_outbox(
    output_format: OutputFormat,
    dir: &Path,
    pending: &[InvoiceSubmission],
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(pending);
    }
    println!("Outbox: {}", dir.display());
    if pending.is_empty() {
        println!("Outbox is empty.");
        return Ok(());
    }
    println!("{:<38} {:<20} {:<24} {:>12}", "ID", "Submitted", "Customer", "Total");
    println!("{}", "-".repeat(97));
    for submission in pending {
        println!(
            "{:<38} {:<20} {:<24} {:>12.2}",
            submission.id,
            submission.submitted_at.format("%Y-%m-%d %H:%M"),
            submission.header.customer,
            submission.ledger.total
        );
    }
    Ok(())
}

pub fn output_catalog(output_format: OutputFormat, items: &[CatalogItem]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(items);
    }
    println!("{:<32} {:<8} {:>10}", "Item", "Unit", "Rate");
    println!("{}", "-".repeat(52));
    for item in items {
        println!(
            "{:<32} {:<8} {:>10.2}",
            item.name,
            item.unit.as_deref().unwrap_or(""),
            item.rate
        );
    }
    Ok(())
}

pub fn output_jsa(output_format: OutputFormat, form: &JsaForm) -> Result<()> {
    if output_format == OutputFormat::Json {
        let issues = form.validate_step(JsaStep::Review);
        return print_json(&issues);
    }

    println!("\nJSA: {} @ {}", form.job.company, form.job.location);
    println!("Crew: {} | Hazards: {}", form.personnel().len(), form.hazards().len());
    for step in [JsaStep::JobInfo, JsaStep::Hazards, JsaStep::Personnel] {
        let issues = form.validate_step(step);
        if issues.is_empty() {
            println!("  [ok]   {}", step.title());
        } else {
            println!("  [todo] {}", step.title());
            for issue in issues {
                println!("         - {}: {}", issue.field, issue.message);
            }
        }
    }
    Ok(())
}

pub fn output_style(
    output_format: OutputFormat,
    variant: StyleVariant,
    style: &StyleDescriptor,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(style);
    }
    println!("Style: {}", variant.name());
    println!("  background:    {}", style.background);
    println!("  foreground:    {}", style.foreground);
    println!(
        "  border:        {}",
        style.border.map(|c| c.to_string()).unwrap_or_else(|| "none".to_string())
    );
    println!("  padding:       {}", style.padding);
    println!("  corner radius: {}", style.corner_radius);
    println!("  font size:     {}{}", style.font_size, if style.bold { " (bold)" } else { "" });
    Ok(())
}

pub fn output_status(output_format: OutputFormat, state: &AppState) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(state);
    }
    println!("Theme:     {}", state.theme);
    match (state.auth.signed_in, state.auth.user_email.as_deref()) {
        (true, Some(email)) => println!("Signed in: {}", email),
        (true, None) => println!("Signed in"),
        (false, _) => println!("Signed out"),
    }
    Ok(())
}
