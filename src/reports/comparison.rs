//! Month-over-month comparison of expenses by category

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{same_category, DateRange, Money, Transaction};

use super::spending::SpendingSummary;

/// How many increases and decreases are reported
pub const TOP_CHANGES: usize = 3;

/// Change in one expense category between two months
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChange {
    pub category: String,
    pub current: Money,
    pub previous: Money,
    /// `current - previous`
    pub change: Money,
    /// Relative change; `None` when there was no spending last month
    pub percentage_change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    pub current: SpendingSummary,
    pub previous: SpendingSummary,
    /// Every category seen in either month
    pub changes: Vec<CategoryChange>,
    pub top_increases: Vec<CategoryChange>,
    pub top_decreases: Vec<CategoryChange>,
}

impl MonthComparison {
    /// Compare the month containing `today` with the month before it
    pub fn generate(transactions: &[Transaction], today: NaiveDate) -> Self {
        let current_range = DateRange::month_containing(today);
        let current = SpendingSummary::generate(transactions, current_range);
        let previous = SpendingSummary::generate(transactions, current_range.previous_month());

        // This month's categories first, then those only seen last month
        let mut categories: Vec<String> = current
            .expenses_by_category
            .iter()
            .map(|c| c.category.clone())
            .collect();
        for entry in &previous.expenses_by_category {
            if !categories.iter().any(|c| same_category(c, &entry.category)) {
                categories.push(entry.category.clone());
            }
        }

        let changes: Vec<CategoryChange> = categories
            .into_iter()
            .map(|category| {
                let now = current.expenses_for(&category);
                let before = previous.expenses_for(&category);
                CategoryChange {
                    change: now - before,
                    percentage_change: before
                        .is_positive()
                        .then(|| (now - before).percentage_of(before)),
                    current: now,
                    previous: before,
                    category,
                }
            })
            .collect();

        let mut top_increases: Vec<CategoryChange> = changes
            .iter()
            .filter(|c| c.change.is_positive())
            .cloned()
            .collect();
        top_increases.sort_by(|a, b| b.change.cmp(&a.change));
        top_increases.truncate(TOP_CHANGES);

        let mut top_decreases: Vec<CategoryChange> = changes
            .iter()
            .filter(|c| c.change.is_negative())
            .cloned()
            .collect();
        top_decreases.sort_by(|a, b| a.change.cmp(&b.change));
        top_decreases.truncate(TOP_CHANGES);

        Self {
            current,
            previous,
            changes,
            top_increases,
            top_decreases,
        }
    }

    /// Change in total expenses
    pub fn total_change(&self) -> Money {
        self.current.total_expenses - self.previous.total_expenses
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Month Comparison: {} vs {}\n",
            self.current.range.start.format("%B %Y"),
            self.previous.range.start.format("%B %Y")
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "Expenses: {} (was {}, change {})\n",
            self.current.total_expenses,
            self.previous.total_expenses,
            self.total_change()
        ));

        for (title, rows) in [
            ("Top increases", &self.top_increases),
            ("Top decreases", &self.top_decreases),
        ] {
            output.push('\n');
            output.push_str(title);
            output.push('\n');
            output.push_str(&"-".repeat(60));
            output.push('\n');
            if rows.is_empty() {
                output.push_str("  (none)\n");
            }
            for row in rows {
                output.push_str(&format!(
                    "  {:<28} {:>12} -> {:>12} ({})\n",
                    row.category,
                    row.previous.to_string(),
                    row.current.to_string(),
                    row.change
                ));
            }
        }

        output
    }
}
