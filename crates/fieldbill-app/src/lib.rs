//! Application service layer - config, invoices, submissions, export

pub mod app;
pub mod config;
pub mod export;
pub mod repository;
