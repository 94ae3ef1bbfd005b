//! Reports module for Pocketbook
//!
//! Read-only aggregations over the ledger: spending summaries, trend
//! series, month-over-month comparison and the composed monthly report.
//! Everything here is a pure function of the transactions passed in.

pub mod comparison;
pub mod monthly;
pub mod spending;
pub mod trend;

pub use comparison::{CategoryChange, MonthComparison};
pub use monthly::MonthlyReport;
pub use spending::{CategoryTotal, SpendingSummary};
pub use trend::{TrendPoint, TrendReport};
