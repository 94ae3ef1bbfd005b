//! Insights service
//!
//! Each `generate` call runs every detector over the whole ledger and appends
//! whatever they produce. Earlier insights are never deduplicated or
//! suppressed; reading them is the only state change afterwards.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{DateRange, Insight, InsightType, Money, Transaction};
use crate::storage::Storage;

use super::local_today;

/// An expense is unusual above this multiple of its category average
const ANOMALY_MULTIPLIER: i64 = 2;

/// Month-over-month change (percent) worth reporting
const TREND_THRESHOLD: f64 = 15.0;

/// Month-over-month change (percent) that raises the priority
const TREND_HIGH_THRESHOLD: f64 = 30.0;

/// Subscription-like transactions needed before a tip is offered
const SUBSCRIPTION_TIP_MIN: usize = 3;

const MILESTONE_COUNT: usize = 10;

const STREAK_DAYS: usize = 7;

/// The trailing seven days ending on `today`
fn recent_window(today: NaiveDate) -> DateRange {
    DateRange::new(today - Duration::days(6), today)
}

/// Expenses in the recent window far above their category's all-time average
pub fn detect_anomalies(transactions: &[Transaction], today: NaiveDate) -> Vec<Insight> {
    let window = recent_window(today);

    transactions
        .iter()
        .filter(|t| t.is_expense() && window.contains(t.date))
        .filter_map(|txn| {
            let (total, count) = transactions
                .iter()
                .filter(|t| t.is_expense() && t.in_category(&txn.category))
                .fold((0i128, 0i128), |(sum, n), t| {
                    (sum + i128::from(t.amount.cents()), n + 1)
                });

            // amount > multiplier * total / count, kept in integers
            if i128::from(txn.amount.cents()) * count <= i128::from(ANOMALY_MULTIPLIER) * total {
                return None;
            }

            let average = Money::from_cents((total / count) as i64);
            Some(
                Insight::new(
                    InsightType::Anomaly,
                    format!("Unusual {} expense", txn.category),
                    format!(
                        "{} on {} is more than {}x your average {} expense of {}",
                        txn.amount, txn.date, ANOMALY_MULTIPLIER, txn.category, average
                    ),
                    7,
                )
                .with_action("Check that this transaction is correct"),
            )
        })
        .collect()
}

/// Current against previous calendar month total expenses
pub fn detect_spending_trend(transactions: &[Transaction], today: NaiveDate) -> Option<Insight> {
    let current_range = DateRange::month_containing(today);
    let previous_range = current_range.previous_month();

    let total_in = |range: DateRange| -> Money {
        transactions
            .iter()
            .filter(|t| t.is_expense() && range.contains(t.date))
            .map(|t| t.amount)
            .sum()
    };

    let current = total_in(current_range);
    let previous = total_in(previous_range);
    if !previous.is_positive() {
        return None;
    }

    let change = (current - previous).percentage_of(previous);
    if change.abs() <= TREND_THRESHOLD {
        return None;
    }

    let priority = if change.abs() > TREND_HIGH_THRESHOLD { 8 } else { 5 };

    let insight = if change > 0.0 {
        Insight::new(
            InsightType::Warning,
            "Spending is up",
            format!(
                "You've spent {:.1}% more this month ({}) than last month ({})",
                change, current, previous
            ),
            priority,
        )
        .with_action("Review your largest categories for this month")
    } else {
        Insight::new(
            InsightType::Achievement,
            "Spending is down",
            format!(
                "You've spent {:.1}% less this month ({}) than last month ({})",
                change.abs(),
                current,
                previous
            ),
            priority,
        )
    };

    Some(insight)
}

/// A saving tip once enough subscription-like transactions pile up
pub fn detect_subscription_tip(transactions: &[Transaction]) -> Option<Insight> {
    let subscriptions: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| {
            t.is_recurring() || t.has_tag("subscriptions") || t.in_category("Subscriptions")
        })
        .collect();

    if subscriptions.len() <= SUBSCRIPTION_TIP_MIN {
        return None;
    }

    let total: Money = subscriptions.iter().map(|t| t.amount).sum();
    Some(
        Insight::new(
            InsightType::Tip,
            "Review your subscriptions",
            format!(
                "You have {} recurring or subscription transactions totalling {}",
                subscriptions.len(),
                total
            ),
            6,
        )
        .with_action(format!("Cancelling unused ones could save up to {}", total)),
    )
}

/// Milestone and logging-streak achievements
pub fn detect_achievements(transactions: &[Transaction], today: NaiveDate) -> Vec<Insight> {
    let mut insights = Vec::new();

    if transactions.len() == MILESTONE_COUNT {
        insights.push(Insight::new(
            InsightType::Achievement,
            "10 transactions logged",
            "You've recorded your first 10 transactions",
            3,
        ));
    }

    let window = recent_window(today);
    let days: HashSet<NaiveDate> = transactions
        .iter()
        .map(|t| t.date)
        .filter(|d| window.contains(*d))
        .collect();
    if days.len() >= STREAK_DAYS {
        insights.push(Insight::new(
            InsightType::Achievement,
            "7-day streak",
            "You've logged transactions every day this week",
            4,
        ));
    }

    insights
}

/// Run every detector, in a fixed order
pub fn detect_all(transactions: &[Transaction], today: NaiveDate) -> Vec<Insight> {
    let mut insights = detect_anomalies(transactions, today);
    insights.extend(detect_spending_trend(transactions, today));
    insights.extend(detect_subscription_tip(transactions));
    insights.extend(detect_achievements(transactions, today));
    insights
}

/// Service for generating and reading insights
pub struct InsightsService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> InsightsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            today: local_today(),
        }
    }

    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the detectors and append their output to the insight log
    pub fn generate(&self) -> PocketbookResult<Vec<Insight>> {
        let transactions = self.storage.transactions.get_all()?;
        let insights = detect_all(&transactions, self.today);
        if insights.is_empty() {
            return Ok(insights);
        }

        self.storage.insights.extend(insights.clone())?;
        self.storage.save()?;

        for insight in &insights {
            self.storage.log_create(
                EntityType::Insight,
                insight.id.to_string(),
                Some(insight.title.clone()),
                insight,
            );
        }

        log::debug!("generated {} insights", insights.len());
        Ok(insights)
    }

    /// Newest first, by priority within the same moment
    pub fn list(&self, unread_only: bool) -> PocketbookResult<Vec<Insight>> {
        let mut insights = if unread_only {
            self.storage.insights.get_unread()?
        } else {
            self.storage.insights.get_all()?
        };
        insights.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.priority.cmp(&a.priority))
        });
        Ok(insights)
    }

    pub fn mark_read(&self, identifier: &str) -> PocketbookResult<Insight> {
        let mut insight = self
            .storage
            .insights
            .find(identifier)?
            .ok_or_else(|| PocketbookError::insight_not_found(identifier))?;

        if insight.is_read {
            return Ok(insight);
        }

        let before = insight.clone();
        insight.is_read = true;

        self.storage.insights.upsert(insight.clone())?;
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Insight,
            insight.id.to_string(),
            Some(insight.title.clone()),
            &before,
            &insight,
            Some("marked read".to_string()),
        );

        Ok(insight)
    }

    /// Mark every unread insight read; returns how many changed
    pub fn mark_all_read(&self) -> PocketbookResult<usize> {
        let unread = self.storage.insights.get_unread()?;
        for mut insight in unread.iter().cloned() {
            insight.is_read = true;
            self.storage.insights.upsert(insight)?;
        }
        if !unread.is_empty() {
            self.storage.save()?;
        }
        Ok(unread.len())
    }
}
