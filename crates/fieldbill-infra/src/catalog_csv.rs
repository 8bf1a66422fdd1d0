//! Consumables catalog loader (CSV)
//!
//! Expected columns (header optional): name, [unit], rate

use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{info, warn};

use fieldbill_domain::model::CatalogItem;
use fieldbill_domain::service::amount::parse_decimal;
use fieldbill_types::Result;

pub fn load_catalog_from_csv(path: &Path) -> Result<Vec<CatalogItem>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;
    let items = read_catalog(reader)?;
    info!(path = %path.display(), items = items.len(), "catalog loaded");
    Ok(items)
}

pub fn parse_catalog_csv(content: &str) -> Result<Vec<CatalogItem>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());
    read_catalog(reader)
}

fn read_catalog<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<CatalogItem>> {
    let mut items = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if index == 0 && is_header(&record) {
            continue;
        }
        match parse_record(&record) {
            Some(item) => items.push(item),
            None => {
                if record.iter().any(|f| !f.is_empty()) {
                    warn!(line = index + 1, "skipping malformed catalog row");
                }
            }
        }
    }
    Ok(items)
}

fn is_header(record: &StringRecord) -> bool {
    record.iter().any(|h| {
        let h = h.to_lowercase();
        h == "name" || h == "rate" || h == "unit" || h == "item"
    })
}

fn parse_record(record: &StringRecord) -> Option<CatalogItem> {
    let name = record.get(0).filter(|s| !s.is_empty())?.to_string();
    let (unit, rate) = match record.len() {
        2 => (None, record.get(1)?),
        n if n >= 3 => (
            record.get(1).filter(|s| !s.is_empty()).map(str::to_string),
            record.get(2)?,
        ),
        _ => return None,
    };
    let rate = parse_decimal(rate)?;
    Some(CatalogItem { name, unit, rate })
}
