//! Core domain types and logic.

pub mod basket;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod latest_only;
pub mod policy;
pub mod position;
pub mod price;
pub mod screener;
pub mod signal;
pub mod tracker;
