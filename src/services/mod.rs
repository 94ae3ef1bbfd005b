//! Service layer for Pocketbook
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, derived figures, and audit logging. Services that
//! depend on the current date take it from the local clock unless pinned
//! with `as_of`.

pub mod analytics;
pub mod budget;
pub mod category;
pub mod goal;
pub mod insights;
pub mod transaction;

use chrono::NaiveDate;

pub use analytics::AnalyticsService;
pub use budget::{BudgetService, BudgetUpdate, CreateBudgetInput};
pub use category::CategoryService;
pub use goal::{CreateGoalInput, GoalService, GoalUpdate};
pub use insights::InsightsService;
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};

/// Today's date on the local clock
pub(crate) fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
