//! Analytics service
//!
//! Read-side entry point over the ledger. Nothing here writes to storage.

use chrono::{Datelike, NaiveDate};

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{DateRange, Granularity};
use crate::reports::monthly::TREND_DAYS;
use crate::reports::{MonthComparison, MonthlyReport, SpendingSummary, TrendReport};
use crate::storage::Storage;

use super::budget::evaluate;
use super::goal::goal_progress;
use super::local_today;

/// Service for summaries, trends and reports
pub struct AnalyticsService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            today: local_today(),
        }
    }

    /// Evaluate relative to a fixed day
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Summary over `range`, or the current calendar month
    pub fn spending_summary(&self, range: Option<DateRange>) -> PocketbookResult<SpendingSummary> {
        let range = range.unwrap_or_else(|| DateRange::month_containing(self.today));
        let transactions = self.storage.transactions.get_all()?;
        Ok(SpendingSummary::generate(&transactions, range))
    }

    /// The trailing `span` buckets ending with the one containing today
    pub fn trends(&self, granularity: Granularity, span: u32) -> PocketbookResult<TrendReport> {
        let transactions = self.storage.transactions.get_all()?;
        let week_start = self.storage.settings()?.week_start();
        Ok(TrendReport::generate(
            &transactions,
            granularity,
            span,
            self.today,
            week_start,
        ))
    }

    /// Report for an explicit month, defaulting to the current one
    ///
    /// Budgets are evaluated on the last day of the month, or today if the
    /// month is still running.
    pub fn monthly_report(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> PocketbookResult<MonthlyReport> {
        let range = match (year, month) {
            (None, None) => DateRange::month_containing(self.today),
            (year, month) => {
                let year = year.unwrap_or_else(|| self.today.year());
                let month = month.unwrap_or_else(|| self.today.month());
                DateRange::month(year, month).ok_or_else(|| {
                    PocketbookError::validation(format!("month must be 1-12, got {}", month))
                })?
            }
        };

        let transactions = self.storage.transactions.get_all()?;
        let week_start = self.storage.settings()?.week_start();
        let as_of = self.today.min(range.end);

        let budgets = self
            .storage
            .budgets
            .get_all()?
            .iter()
            .map(|b| evaluate(b, &transactions, as_of, week_start))
            .collect();

        let goals = self
            .storage
            .goals
            .get_all()?
            .iter()
            .map(|g| goal_progress(g, self.today))
            .collect();

        let daily_trend = TrendReport::generate(
            &transactions,
            Granularity::Daily,
            TREND_DAYS,
            self.today,
            week_start,
        )
        .points;

        Ok(MonthlyReport {
            summary: SpendingSummary::generate(&transactions, range),
            month: range,
            budgets,
            goals,
            insights: self.storage.insights.get_unread()?,
            daily_trend,
        })
    }

    /// This month's expenses against last month's, by category
    pub fn compare_to_last_month(&self) -> PocketbookResult<MonthComparison> {
        let transactions = self.storage.transactions.get_all()?;
        Ok(MonthComparison::generate(&transactions, self.today))
    }
}
