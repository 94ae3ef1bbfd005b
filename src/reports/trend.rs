//! Trend series
//!
//! A fixed number of consecutive buckets ending at the evaluation day. Empty
//! buckets are kept as zero points so a series always has `span` entries.

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

use crate::models::{DateRange, Granularity, Money, Transaction};

/// Totals for one bucket of a trend series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    /// First day of the bucket
    pub date: NaiveDate,
    pub period: DateRange,
    pub expenses: Money,
    pub income: Money,
    pub net_savings: Money,
}

/// A trend series, oldest bucket first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub granularity: Granularity,
    pub points: Vec<TrendPoint>,
}

impl TrendReport {
    /// Build `span` buckets of `granularity`, the last one containing `today`
    pub fn generate(
        transactions: &[Transaction],
        granularity: Granularity,
        span: u32,
        today: NaiveDate,
        week_start: Weekday,
    ) -> Self {
        let points = (0..span)
            .rev()
            .map(|steps_back| {
                let period = granularity.bucket(today, steps_back, week_start);
                point_for(transactions, period)
            })
            .collect();

        Self {
            granularity,
            points,
        }
    }

    pub fn total_expenses(&self) -> Money {
        self.points.iter().map(|p| p.expenses).sum()
    }

    pub fn total_income(&self) -> Money {
        self.points.iter().map(|p| p.income).sum()
    }

    /// Format the series for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Trend ({}, {} periods)\n", self.granularity, self.points.len()));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>14}\n",
            "Period", "Income", "Expenses", "Net"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for point in &self.points {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14} {:>14}\n",
                point.date.format("%Y-%m-%d").to_string(),
                point.income.to_string(),
                point.expenses.to_string(),
                point.net_savings.to_string()
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>14} {:>14} {:>14}\n",
            "TOTAL",
            self.total_income().to_string(),
            self.total_expenses().to_string(),
            (self.total_income() - self.total_expenses()).to_string()
        ));

        output
    }
}

fn point_for(transactions: &[Transaction], period: DateRange) -> TrendPoint {
    let mut expenses = Money::zero();
    let mut income = Money::zero();

    for txn in transactions.iter().filter(|t| period.contains(t.date)) {
        if txn.is_expense() {
            expenses += txn.amount;
        } else {
            income += txn.amount;
        }
    }

    TrendPoint {
        date: period.start,
        period,
        expenses,
        income,
        net_savings: income - expenses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sparse_series_is_zero_filled() {
        let today = date(2025, 3, 15);
        let txns = vec![
            Transaction::expense(Money::from_units(10), "Shopping", date(2025, 3, 13)),
            Transaction::income(Money::from_units(25), "Salary", date(2025, 3, 15)),
        ];

        let report = TrendReport::generate(&txns, Granularity::Daily, 7, today, Weekday::Sun);

        assert_eq!(report.points.len(), 7);
        assert_eq!(report.points[0].date, date(2025, 3, 9));
        assert_eq!(report.points[6].date, today);
        assert_eq!(report.points[4].expenses, Money::from_units(10));
        assert_eq!(report.points[6].net_savings, Money::from_units(25));
        assert_eq!(report.points[0].expenses, Money::zero());
    }

    #[test]
    fn test_empty_ledger_still_has_span_points() {
        for granularity in [Granularity::Daily, Granularity::Weekly, Granularity::Monthly] {
            let report =
                TrendReport::generate(&[], granularity, 12, date(2025, 3, 15), Weekday::Mon);
            assert_eq!(report.points.len(), 12);
            assert!(report.points.iter().all(|p| p.expenses.is_zero()));
        }
    }

    #[test]
    fn test_zero_span() {
        let report = TrendReport::generate(&[], Granularity::Weekly, 0, date(2025, 3, 15), Weekday::Sun);
        assert!(report.points.is_empty());
    }

    #[test]
    fn test_monthly_buckets_cover_whole_months() {
        let txns = vec![
            Transaction::expense(Money::from_units(40), "Shopping", date(2025, 1, 1)),
            Transaction::expense(Money::from_units(60), "Shopping", date(2025, 1, 31)),
        ];

        let report =
            TrendReport::generate(&txns, Granularity::Monthly, 3, date(2025, 3, 10), Weekday::Sun);

        assert_eq!(report.points[0].period, DateRange::month(2025, 1).unwrap());
        assert_eq!(report.points[0].expenses, Money::from_units(100));
        assert_eq!(report.total_expenses(), Money::from_units(100));
    }

    #[test]
    fn test_weekly_buckets_follow_week_start() {
        // 2025-03-15 is a Saturday
        let report =
            TrendReport::generate(&[], Granularity::Weekly, 2, date(2025, 3, 15), Weekday::Mon);
        assert_eq!(report.points[1].date, date(2025, 3, 10));
        assert_eq!(report.points[0].date, date(2025, 3, 3));
    }
}
