//! Pricing plan loader (TOML)
//!
//! ```toml
//! name = "Standard"
//! description = "Day rates for the north field"
//!
//! [labor_rates]
//! loadUnload = "150"
//! mileage = "2.25"
//!
//! [[items]]
//! name = "Check valve"
//! unit = "ea"
//! rate = "42.50"
//! ```

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use fieldbill_domain::model::{LaborCategory, PricingPlan};
use fieldbill_types::{Error, Result};

pub fn load_pricing_plan(path: &Path) -> Result<PricingPlan> {
    let content = std::fs::read_to_string(path)?;
    let plan = parse_pricing_plan(&content)?;
    info!(
        path = %path.display(),
        plan = %plan.name,
        items = plan.items.len(),
        "pricing plan loaded"
    );
    Ok(plan)
}

pub fn parse_pricing_plan(content: &str) -> Result<PricingPlan> {
    let plan: PricingPlan = toml::from_str(content)?;
    validate_plan(&plan)?;
    Ok(plan)
}

fn validate_plan(plan: &PricingPlan) -> Result<()> {
    if plan.name.trim().is_empty() {
        return Err(Error::Validation("pricing plan needs a name".to_string()));
    }
    for (key, rate) in &plan.labor_rates {
        key.parse::<LaborCategory>()?;
        if *rate < Decimal::ZERO {
            return Err(Error::Validation(format!("negative labor rate for {}", key)));
        }
    }
    let mut seen = HashSet::new();
    for item in &plan.items {
        if item.name.trim().is_empty() {
            return Err(Error::Validation("catalog item without a name".to_string()));
        }
        if item.rate < Decimal::ZERO {
            return Err(Error::Validation(format!("negative rate for {}", item.name)));
        }
        if !seen.insert(item.name.to_lowercase()) {
            return Err(Error::Validation(format!("duplicate catalog item: {}", item.name)));
        }
    }
    Ok(())
}
