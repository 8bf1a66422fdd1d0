//! Infrastructure layer - persistence implementations, loaders

pub mod catalog_csv;
pub mod persistence;
pub mod pricing_plan_loader;
