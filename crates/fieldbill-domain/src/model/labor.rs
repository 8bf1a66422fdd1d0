//! Fixed labor section of an invoice

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fieldbill_types::Error;

use super::cost_row::{CostRow, RowId};

/// Predefined labor billing categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaborCategory {
    LoadUnload,
    Mileage,
    TravelTime,
    StandbyTime,
    Labor,
}

impl LaborCategory {
    pub const ALL: [LaborCategory; 5] = [
        LaborCategory::LoadUnload,
        LaborCategory::Mileage,
        LaborCategory::TravelTime,
        LaborCategory::StandbyTime,
        LaborCategory::Labor,
    ];

    /// Stable key used in snapshots, plans and edit scripts
    pub fn key(&self) -> &'static str {
        match self {
            LaborCategory::LoadUnload => "loadUnload",
            LaborCategory::Mileage => "mileage",
            LaborCategory::TravelTime => "travelTime",
            LaborCategory::StandbyTime => "standbyTime",
            LaborCategory::Labor => "labor",
        }
    }

    /// Display label printed on the invoice
    pub fn label(&self) -> &'static str {
        match self {
            LaborCategory::LoadUnload => "Load / Unload",
            LaborCategory::Mileage => "Mileage",
            LaborCategory::TravelTime => "Travel Time",
            LaborCategory::StandbyTime => "Standby Time",
            LaborCategory::Labor => "Labor",
        }
    }

    fn index(&self) -> usize {
        match self {
            LaborCategory::LoadUnload => 0,
            LaborCategory::Mileage => 1,
            LaborCategory::TravelTime => 2,
            LaborCategory::StandbyTime => 3,
            LaborCategory::Labor => 4,
        }
    }
}

impl std::fmt::Display for LaborCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for LaborCategory {
    type Err = Error;

    /// Accepts the camelCase key or its snake_case / kebab-case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        LaborCategory::ALL
            .into_iter()
            .find(|c| c.key().to_lowercase() == normalized)
            .ok_or_else(|| Error::Validation(format!("unknown labor category: {}", s)))
    }
}

/// Exactly one row per `LaborCategory`, in `LaborCategory::ALL` order
#[derive(Debug, Clone, PartialEq)]
pub struct LaborSection {
    rows: [CostRow; 5],
}

impl LaborSection {
    /// Build the section, drawing one id per category from `next_id`
    pub fn new(mut next_id: impl FnMut() -> RowId) -> Self {
        let rows = LaborCategory::ALL.map(|category| CostRow::with_label(next_id(), category.label()));
        Self { rows }
    }

    pub fn row(&self, category: LaborCategory) -> &CostRow {
        &self.rows[category.index()]
    }

    pub(crate) fn row_mut(&mut self, category: LaborCategory) -> &mut CostRow {
        &mut self.rows[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LaborCategory, &CostRow)> {
        LaborCategory::ALL.into_iter().zip(self.rows.iter())
    }

    pub fn total(&self) -> Decimal {
        self.rows
            .iter()
            .fold(Decimal::ZERO, |acc, row| acc.saturating_add(row.amount_or_zero()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!("loadUnload".parse::<LaborCategory>().unwrap(), LaborCategory::LoadUnload);
        assert_eq!("travel_time".parse::<LaborCategory>().unwrap(), LaborCategory::TravelTime);
        assert_eq!("Standby-Time".parse::<LaborCategory>().unwrap(), LaborCategory::StandbyTime);
        assert!("overtime".parse::<LaborCategory>().is_err());
    }

    #[test]
    fn test_category_serde_uses_key() {
        for category in LaborCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.key()));
        }
    }

    #[test]
    fn test_section_has_five_labelled_rows() {
        let mut next = 0;
        let section = LaborSection::new(|| {
            next += 1;
            RowId(next)
        });
        let rows: Vec<_> = section.iter().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[1].0, LaborCategory::Mileage);
        assert_eq!(rows[1].1.label(), "Mileage");
        assert_eq!(section.row(LaborCategory::Labor).id(), RowId(5));
        assert_eq!(section.total(), Decimal::ZERO);
    }
}
