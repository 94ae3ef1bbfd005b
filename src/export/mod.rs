//! Export module for Pocketbook
//!
//! Provides complete data export functionality in multiple formats:
//! - CSV: transactions, budget status and goal progress (spreadsheet-compatible)
//! - JSON: machine-readable full document export, importable again
//! - YAML: human-readable full document export

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_budgets_csv, export_goals_csv, export_transactions_csv};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_full_yaml, import_from_yaml};
