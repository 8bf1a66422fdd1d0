//! Excel export of a submitted invoice

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::info;

use fieldbill_domain::model::InvoiceSubmission;
use fieldbill_types::{Error, Result};

const LINE_HEADERS: [&str; 4] = ["Item", "Qty", "Rate", "Amount"];

fn xlsx_err(e: rust_xlsxwriter::XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export an invoice to an Excel workbook with a single "Invoice" sheet
pub fn export_invoice_to_excel(submission: &InvoiceSubmission, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_invoice_sheet(sheet, submission)?;

    workbook.save(output_path).map_err(xlsx_err)?;
    info!(path = %output_path.display(), id = %submission.id, "invoice exported");

    Ok(())
}

fn write_invoice_sheet(sheet: &mut Worksheet, submission: &InvoiceSubmission) -> Result<()> {
    sheet.set_name("Invoice").map_err(xlsx_err)?;
    sheet.set_column_width(0, 28).map_err(xlsx_err)?;

    let title_format = Format::new().set_bold().set_font_size(14);
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");
    let bold_money = Format::new().set_bold().set_num_format("#,##0.00");

    sheet
        .write_string_with_format(0, 0, "Field Service Invoice", &title_format)
        .map_err(xlsx_err)?;

    let header = &submission.header;
    let job_date = header
        .job_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    let header_rows = [
        ("Invoice ID:", submission.id.to_string()),
        ("Submitted:", submission.submitted_at.to_rfc3339()),
        ("Customer:", header.customer.clone()),
        ("Location:", header.location.clone()),
        ("Job date:", job_date),
        ("Technician:", header.technician.clone()),
    ];
    let mut row: u32 = 2;
    for (label, value) in header_rows {
        sheet.write_string(row, 0, label).map_err(xlsx_err)?;
        sheet.write_string(row, 1, value).map_err(xlsx_err)?;
        row += 1;
    }

    // Labor
    row += 1;
    sheet.write_string_with_format(row, 0, "Labor", &bold).map_err(xlsx_err)?;
    row += 1;
    write_line_headers(sheet, row, &bold)?;
    row += 1;
    let ledger = &submission.ledger;
    for line in &ledger.labor {
        write_line(sheet, row, &line.label, &line.quantity, &line.rate, line.amount, &money)?;
        row += 1;
    }
    write_total(sheet, row, "Labor total", ledger.labor_total, &bold, &bold_money)?;

    // Consumables
    row += 2;
    sheet
        .write_string_with_format(row, 0, "Consumables", &bold)
        .map_err(xlsx_err)?;
    row += 1;
    write_line_headers(sheet, row, &bold)?;
    row += 1;
    for line in &ledger.consumables {
        write_line(sheet, row, &line.label, &line.quantity, &line.rate, line.amount, &money)?;
        row += 1;
    }
    write_total(sheet, row, "Consumables total", ledger.consumables_total, &bold, &bold_money)?;

    // Totals
    row += 2;
    sheet.write_string(row, 2, "Extra charges").map_err(xlsx_err)?;
    sheet.write_string(row, 3, &ledger.extra_charges).map_err(xlsx_err)?;
    row += 1;
    write_total(sheet, row, "TOTAL", ledger.total, &bold, &bold_money)?;

    if let Some(ref notes) = header.notes {
        row += 2;
        sheet.write_string_with_format(row, 0, "Notes", &bold).map_err(xlsx_err)?;
        sheet.write_string(row, 1, notes).map_err(xlsx_err)?;
    }

    Ok(())
}

fn write_line_headers(sheet: &mut Worksheet, row: u32, bold: &Format) -> Result<()> {
    for (col, header) in LINE_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(row, col as u16, *header, bold)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

fn write_line(
    sheet: &mut Worksheet,
    row: u32,
    label: &str,
    quantity: &str,
    rate: &str,
    amount: Option<Decimal>,
    money: &Format,
) -> Result<()> {
    sheet.write_string(row, 0, label).map_err(xlsx_err)?;
    sheet.write_string(row, 1, quantity).map_err(xlsx_err)?;
    sheet.write_string(row, 2, rate).map_err(xlsx_err)?;
    if let Some(amount) = amount {
        sheet
            .write_number_with_format(row, 3, to_f64(amount), money)
            .map_err(xlsx_err)?;
    }
    Ok(())
}

fn write_total(
    sheet: &mut Worksheet,
    row: u32,
    label: &str,
    value: Decimal,
    bold: &Format,
    bold_money: &Format,
) -> Result<()> {
    sheet
        .write_string_with_format(row, 2, label, bold)
        .map_err(xlsx_err)?;
    sheet
        .write_number_with_format(row, 3, to_f64(value), bold_money)
        .map_err(xlsx_err)?;
    Ok(())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_submission;
    use fieldbill_domain::model::{ConsumableField, InvoiceHeader, LaborCategory, LaborField};
    use fieldbill_domain::service::Ledger;
    use tempfile::tempdir;

    #[test]
    fn test_export_writes_workbook() {
        let mut ledger = Ledger::new();
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Rate, "90");
        ledger.update_labor_field(LaborCategory::Labor, LaborField::Qty, "4");
        let row = ledger.consumable_rows()[0].id();
        ledger.update_consumable_field(row, ConsumableField::Item, "Gasket");
        ledger.update_consumable_field(row, ConsumableField::Qty, "3");
        ledger.update_consumable_field(row, ConsumableField::Rate, "7.25");
        let header = InvoiceHeader {
            customer: "Basin Energy".to_string(),
            notes: Some("Gate code 4411".to_string()),
            ..Default::default()
        };
        let submission = build_submission(header, &ledger).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("invoice.xlsx");
        export_invoice_to_excel(&submission, &path).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }
}
