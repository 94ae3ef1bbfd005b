//! Transaction model
//!
//! A transaction is either an expense or an income. The amount is always
//! positive; direction is carried by `kind`.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::same_category;
use super::ids::TransactionId;
use super::money::Money;
use super::period::days_in_month;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" | "expenses" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(format!("unknown transaction type '{}'", other)),
        }
    }
}

/// How often a recurring transaction repeats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// The occurrence after `date`
    pub fn advance(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Daily => date.checked_add_days(chrono::Days::new(1)),
            Self::Weekly => date.checked_add_days(chrono::Days::new(7)),
            Self::Biweekly => date.checked_add_days(chrono::Days::new(14)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        }
    }

    /// Like [`Frequency::advance`], but monthly and yearly steps land on
    /// `anchor_day` whenever the target month is long enough
    pub fn advance_anchored(
        &self,
        date: NaiveDate,
        anchor_day: Option<u32>,
    ) -> Option<NaiveDate> {
        let next = self.advance(date)?;
        match (self, anchor_day) {
            (Self::Monthly | Self::Yearly, Some(anchor)) => {
                let last = days_in_month(next.year(), next.month()) as u32;
                next.with_day(anchor.clamp(1, last))
            }
            _ => Some(next),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Biweekly => write!(f, "biweekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "biweekly" | "bi-weekly" => Ok(Self::Biweekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" | "annual" => Ok(Self::Yearly),
            other => Err(format!("unknown frequency '{}'", other)),
        }
    }
}

/// Recurrence descriptor attached to a template transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: Frequency,

    /// Date of the next occurrence still to be materialized
    pub next_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,

    /// Occurrences left; `None` repeats until `end_date` (or forever)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,

    /// Day of month monthly and yearly schedules return to after a short month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor_day: Option<u32>,
}

impl Recurrence {
    pub fn new(frequency: Frequency, next_date: NaiveDate) -> Self {
        Self {
            frequency,
            next_date,
            end_date: None,
            remaining: None,
            anchor_day: Some(next_date.day()),
        }
    }

    pub fn with_anchor_day(mut self, day: u32) -> Self {
        self.anchor_day = Some(day);
        self
    }

    /// Move `next_date` one step along the schedule; `false` once the
    /// calendar runs out
    pub fn advance(&mut self) -> bool {
        match self
            .frequency
            .advance_anchored(self.next_date, self.anchor_day)
        {
            Some(next) => {
                self.next_date = next;
                true
            }
            None => false,
        }
    }

    /// Whether an occurrence is due on or before `today`
    pub fn is_due(&self, today: NaiveDate) -> bool {
        if self.remaining == Some(0) {
            return false;
        }
        if let Some(end) = self.end_date {
            if self.next_date > end {
                return false;
            }
        }
        self.next_date <= today
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Always positive
    pub amount: Money,

    pub category: String,

    #[serde(default)]
    pub description: String,

    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            kind,
            amount,
            category: category.into(),
            description: String::new(),
            date,
            tags: Vec::new(),
            merchant: None,
            recurring: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn expense(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Expense, amount, category, date)
    }

    pub fn income(amount: Money, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(TransactionType::Income, amount, category, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring.is_some()
    }

    /// Case-insensitive category comparison
    pub fn in_category(&self, category: &str) -> bool {
        same_category(&self.category, category)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// A single occurrence generated from this recurring template
    pub fn occurrence_on(&self, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            date,
            recurring: None,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Collect every violated rule
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        if !self.amount.is_positive() {
            issues.push("amount must be greater than zero".to_string());
        }
        if !self.amount.is_within_limit() {
            issues.push(format!("amount must not exceed {}", Money::MAX));
        }
        if self.category.trim().is_empty() {
            issues.push("category is required".to_string());
        }
        if let Some(recurrence) = &self.recurring {
            if let Some(end) = recurrence.end_date {
                if end < recurrence.next_date {
                    issues.push("recurrence end date is before its next date".to_string());
                }
            }
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date, self.kind, self.amount, self.category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_expense() {
        let txn = Transaction::expense(Money::from_units(50), "Food & Dining", date(2025, 1, 15));
        assert!(txn.is_expense());
        assert!(!txn.is_recurring());
        assert!(txn.in_category("food & dining"));
    }

    #[test]
    fn test_in_category_folds_non_ascii_case() {
        let txn = Transaction::expense(Money::from_units(9), "CAFÉ", date(2025, 1, 15));
        assert!(txn.in_category("Café"));
        assert!(txn.in_category(" café "));
        assert!(!txn.in_category("Cafe"));
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let txn = Transaction::expense(Money::zero(), "  ", date(2025, 1, 15));
        let issues = txn.validate().unwrap_err();
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_validate_rejects_amount_over_ceiling() {
        let txn = Transaction::expense(
            Money::from_cents(6_000_000_000_000_000_000),
            "Food & Dining",
            date(2025, 1, 15),
        );
        let issues = txn.validate().unwrap_err();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("must not exceed"));

        let at_limit = Transaction::expense(Money::MAX, "Food & Dining", date(2025, 1, 15));
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn test_serialized_shape_uses_type_key() {
        let txn = Transaction::income(Money::from_units(10), "Salary", date(2025, 1, 15));
        let value = serde_json::to_value(&txn).unwrap();
        assert_eq!(value["type"], "income");
        assert_eq!(value["date"], "2025-01-15");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("recurring").is_none());
    }

    #[test]
    fn test_frequency_advance() {
        assert_eq!(Frequency::Biweekly.advance(date(2025, 1, 1)), Some(date(2025, 1, 15)));
        assert_eq!(Frequency::Monthly.advance(date(2025, 1, 31)), Some(date(2025, 2, 28)));
        assert_eq!(Frequency::Yearly.advance(date(2024, 2, 29)), Some(date(2025, 2, 28)));
    }

    #[test]
    fn test_month_end_schedule_keeps_anchor_day() {
        let mut recurrence =
            Recurrence::new(Frequency::Monthly, date(2025, 2, 28)).with_anchor_day(31);

        assert!(recurrence.advance());
        assert_eq!(recurrence.next_date, date(2025, 3, 31));
        assert!(recurrence.advance());
        assert_eq!(recurrence.next_date, date(2025, 4, 30));
        assert!(recurrence.advance());
        assert_eq!(recurrence.next_date, date(2025, 5, 31));

        let mut leap = Recurrence::new(Frequency::Yearly, date(2025, 2, 28)).with_anchor_day(29);
        leap.advance();
        leap.advance();
        leap.advance();
        assert_eq!(leap.next_date, date(2028, 2, 29));
    }

    #[test]
    fn test_recurrence_due() {
        let mut recurrence = Recurrence::new(Frequency::Monthly, date(2025, 2, 1));
        assert!(recurrence.is_due(date(2025, 2, 1)));
        assert!(!recurrence.is_due(date(2025, 1, 31)));

        recurrence.remaining = Some(0);
        assert!(!recurrence.is_due(date(2025, 3, 1)));

        recurrence.remaining = None;
        recurrence.end_date = Some(date(2025, 1, 15));
        assert!(!recurrence.is_due(date(2025, 3, 1)));
    }

    #[test]
    fn test_occurrence_drops_recurrence() {
        let mut template = Transaction::expense(Money::from_units(15), "Subscriptions", date(2025, 1, 1));
        template.recurring = Some(Recurrence::new(Frequency::Monthly, date(2025, 2, 1)));
        let occurrence = template.occurrence_on(date(2025, 2, 1));
        assert_ne!(occurrence.id, template.id);
        assert_eq!(occurrence.date, date(2025, 2, 1));
        assert!(occurrence.recurring.is_none());
        assert_eq!(occurrence.amount, template.amount);
    }
}
