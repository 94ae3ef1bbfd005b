//! Budget model
//!
//! A budget caps spending in one category per period. `spent` is carried on
//! the record for display only; the budget engine always recomputes it from
//! the ledger.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BudgetId;
use super::money::Money;
use super::period::{BudgetPeriod, DateRange};

/// Default share of the limit at which a budget starts warning
pub const DEFAULT_ALERT_THRESHOLD: f64 = 0.8;

/// A spending budget for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    pub category: String,
    pub limit: Money,
    pub period: BudgetPeriod,

    /// Fraction of the limit (0-1) that triggers a warning
    pub alert_threshold: f64,

    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Transport/display copy of the last computed spend; never authoritative
    #[serde(default)]
    pub spent: Money,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Budget {
    /// Create a new active budget
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        limit: Money,
        period: BudgetPeriod,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            name: name.into(),
            category: category.into(),
            limit,
            period,
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            start_date,
            end_date: None,
            is_active: true,
            spent: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_threshold(mut self, alert_threshold: f64) -> Self {
        self.alert_threshold = alert_threshold;
        self
    }

    /// Collect every violated rule
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("budget name is required".to_string());
        }
        if self.category.trim().is_empty() {
            issues.push("budget category is required".to_string());
        }
        if !self.limit.is_positive() {
            issues.push("budget limit must be greater than zero".to_string());
        }
        if !self.limit.is_within_limit() {
            issues.push(format!("budget limit must not exceed {}", Money::MAX));
        }
        if !(0.0..=1.0).contains(&self.alert_threshold) {
            issues.push("alert threshold must be between 0 and 1".to_string());
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                issues.push("budget end date is before its start date".to_string());
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {} {})", self.name, self.category, self.limit, self.period)
    }
}

/// Classification of a budget's spend against its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetState {
    Under,
    Warning,
    Exceeded,
}

impl BudgetState {
    /// Classify a percentage of the limit used
    pub fn classify(percentage_used: f64, alert_threshold: f64) -> Self {
        if percentage_used >= 100.0 {
            Self::Exceeded
        } else if percentage_used >= alert_threshold * 100.0 {
            Self::Warning
        } else {
            Self::Under
        }
    }

    pub fn needs_alert(&self) -> bool {
        !matches!(self, Self::Under)
    }
}

impl fmt::Display for BudgetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Under => write!(f, "under"),
            Self::Warning => write!(f, "warning"),
            Self::Exceeded => write!(f, "exceeded"),
        }
    }
}

/// A budget evaluated against the ledger for the current window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub budget: Budget,
    pub window: DateRange,
    pub spent: Money,
    pub remaining: Money,
    pub percentage_used: f64,
    pub status: BudgetState,
}

/// An alert raised for a budget in the warning or exceeded state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub budget: Budget,
    pub status: BudgetStatus,
    pub message: String,
}

/// Suggested limit for a category based on its spending history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSuggestion {
    pub category: String,
    pub average: Money,
    pub max: Money,
    pub transaction_count: usize,
    pub suggested_limit: Money,
}
