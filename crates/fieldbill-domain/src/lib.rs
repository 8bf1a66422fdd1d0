//! Domain layer for fieldbill
//!
//! Cost rows, the line-item ledger, JSA forms, application state and the
//! repository traits the infrastructure crate implements.

pub mod model;
pub mod repository;
pub mod service;
