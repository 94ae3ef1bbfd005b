//! Display formatting for terminal output
//!
//! Turns models and evaluated results into tables and text blocks for the
//! command-line interface.

pub mod budget;
pub mod category;
pub mod goal;
pub mod insight;
pub mod report;
pub mod transaction;

pub use budget::{format_alerts, format_budget_details, format_budget_statuses, format_suggestions};
pub use category::format_category_list;
pub use goal::{format_goal_details, format_goal_list};
pub use insight::format_insight_list;
pub use report::{format_bar, format_percentage, format_trend_chart, truncate};
pub use transaction::{format_parsed_preview, format_transaction_details, format_transaction_register};
