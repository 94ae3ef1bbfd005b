//! Core data models for Pocketbook
//!
//! Transactions, budgets, savings goals, categories and insights, plus the
//! value types they share (ids, money, calendar windows).

pub mod budget;
pub mod category;
pub mod goal;
pub mod ids;
pub mod insight;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{Budget, BudgetAlert, BudgetState, BudgetStatus, BudgetSuggestion};
pub use category::{
    same_category, Category, CategoryType, CATEGORY_KEYWORDS, FALLBACK_EXPENSE_CATEGORY,
};
pub use goal::{EntryDirection, GoalEntry, GoalPriority, GoalProgress, SavingsGoal};
pub use ids::{BudgetId, CategoryId, GoalId, InsightId, TransactionId};
pub use insight::{Insight, InsightType};
pub use money::Money;
pub use period::{BudgetPeriod, DateRange, Granularity};
pub use transaction::{Frequency, Recurrence, Transaction, TransactionType};
