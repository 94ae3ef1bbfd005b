//! Savings goal model
//!
//! A goal keeps a ledger of deposits and withdrawals. Entries are tagged with
//! their direction and always carry a positive amount; the balance is the
//! net of the ledger and is updated together with every append.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::GoalId;
use super::money::Money;

/// Goal priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

impl FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

/// Whether a ledger entry adds to or takes from the goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryDirection {
    Deposit,
    Withdrawal,
}

/// One movement in a goal's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalEntry {
    pub direction: EntryDirection,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,

    #[serde(default)]
    pub note: String,
}

impl GoalEntry {
    /// Signed effect on the balance
    pub fn signed_amount(&self) -> Money {
        match self.direction {
            EntryDirection::Deposit => self.amount,
            EntryDirection::Withdrawal => -self.amount,
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub priority: GoalPriority,

    #[serde(default)]
    pub contributions: Vec<GoalEntry>,

    #[serde(default)]
    pub is_completed: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            deadline: None,
            priority: GoalPriority::Medium,
            contributions: Vec::new(),
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Net of every ledger entry
    pub fn ledger_total(&self) -> Money {
        self.contributions.iter().map(GoalEntry::signed_amount).sum()
    }

    /// Append a deposit and refresh the balance
    pub fn deposit(&mut self, amount: Money, date: NaiveDate, note: impl Into<String>) {
        self.push_entry(GoalEntry {
            direction: EntryDirection::Deposit,
            amount,
            date,
            note: note.into(),
        });
    }

    /// Append a withdrawal and refresh the balance.
    ///
    /// Returns the available balance as the error when `amount` exceeds it;
    /// the goal is left untouched in that case.
    pub fn withdraw(
        &mut self,
        amount: Money,
        date: NaiveDate,
        note: impl Into<String>,
    ) -> Result<(), Money> {
        if amount > self.current_amount {
            return Err(self.current_amount);
        }
        self.push_entry(GoalEntry {
            direction: EntryDirection::Withdrawal,
            amount,
            date,
            note: note.into(),
        });
        Ok(())
    }

    fn push_entry(&mut self, entry: GoalEntry) {
        self.contributions.push(entry);
        self.recalculate();
    }

    /// Recompute balance and completion from the ledger
    pub fn recalculate(&mut self) {
        self.current_amount = self.ledger_total();
        self.is_completed = self.current_amount >= self.target_amount;
        self.updated_at = Utc::now();
    }

    pub fn remaining_amount(&self) -> Money {
        self.target_amount.saturating_remaining(self.current_amount)
    }

    /// Collect every violated rule
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("goal name is required".to_string());
        }
        if !self.target_amount.is_positive() {
            issues.push("target amount must be greater than zero".to_string());
        }
        if !self.target_amount.is_within_limit() {
            issues.push(format!("target amount must not exceed {}", Money::MAX));
        }
        if self.current_amount.is_negative() {
            issues.push("current amount cannot be negative".to_string());
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.current_amount, self.target_amount)
    }
}

/// Point-in-time progress of a goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: GoalId,
    pub name: String,
    pub current_amount: Money,
    pub target_amount: Money,
    pub percentage: f64,

    /// Days until the deadline, zero once it has passed
    pub days_remaining: Option<i64>,

    pub on_track: bool,

    /// Amount to save each remaining month to hit the deadline
    pub monthly_required: Option<Money>,

    pub is_completed: bool,
}
