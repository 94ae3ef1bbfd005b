//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod backup;
pub mod budget;
pub mod category;
pub mod export;
pub mod goal;
pub mod insight;
pub mod report;
pub mod transaction;

pub use backup::{handle_backup_command, BackupCommands};
pub use budget::{handle_budget_command, BudgetCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use insight::{handle_insight_command, InsightCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::Money;

pub(crate) fn parse_amount(input: &str) -> PocketbookResult<Money> {
    Money::parse(input).map_err(|e| {
        PocketbookError::validation(format!(
            "Invalid amount format: '{}'. Use format like '50.00' or '100'. Error: {}",
            input, e
        ))
    })
}

pub(crate) fn parse_date(input: &str) -> PocketbookResult<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        PocketbookError::validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", input))
    })
}

pub(crate) fn parse_optional_date(input: Option<String>) -> PocketbookResult<Option<NaiveDate>> {
    input.as_deref().map(parse_date).transpose()
}

/// Parse one of the models' keyword enums, reporting failures as validation errors
pub(crate) fn parse_keyword<T>(input: &str) -> PocketbookResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    input
        .parse()
        .map_err(|e: T::Err| PocketbookError::validation(e.to_string()))
}
