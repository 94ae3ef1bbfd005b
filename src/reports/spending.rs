//! Spending summary
//!
//! Totals income and expenses over a date range and breaks each side down by
//! category.

use serde::Serialize;
use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{same_category, DateRange, Money, Transaction, TransactionType};

/// Total for one category within a summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: Money,
    pub count: usize,
    /// Share of the summary's total for the same transaction type
    pub percentage: f64,
}

/// Income and expenses over a date range
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub range: DateRange,
    pub total_expenses: Money,
    pub total_income: Money,
    /// Income minus expenses; negative when overspent
    pub net_savings: Money,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub income_by_category: Vec<CategoryTotal>,
    pub transaction_count: usize,
}

impl SpendingSummary {
    /// Summarize the transactions dated inside `range` (both ends inclusive)
    pub fn generate(transactions: &[Transaction], range: DateRange) -> Self {
        let in_range: Vec<&Transaction> = transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .collect();

        let (expenses_by_category, total_expenses) =
            totals_by_category(&in_range, TransactionType::Expense);
        let (income_by_category, total_income) =
            totals_by_category(&in_range, TransactionType::Income);

        Self {
            range,
            total_expenses,
            total_income,
            net_savings: total_income - total_expenses,
            expenses_by_category,
            income_by_category,
            transaction_count: in_range.len(),
        }
    }

    /// Expense total for `category`, zero if it had no spending
    pub fn expenses_for(&self, category: &str) -> Money {
        self.expenses_by_category
            .iter()
            .find(|c| same_category(&c.category, category))
            .map(|c| c.total)
            .unwrap_or_default()
    }

    /// The largest expense categories
    pub fn top_categories(&self, limit: usize) -> &[CategoryTotal] {
        let end = limit.min(self.expenses_by_category.len());
        &self.expenses_by_category[..end]
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Spending Summary: {} to {}\n",
            self.range.start, self.range.end
        ));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Income:   {:>14}\n", self.total_income.to_string()));
        output.push_str(&format!("Total Expenses: {:>14}\n", self.total_expenses.to_string()));
        output.push_str(&format!("Net Savings:    {:>14}\n", self.net_savings.to_string()));
        output.push_str(&format!("Transactions:   {:>14}\n", self.transaction_count));

        for (title, rows) in [
            ("EXPENSES", &self.expenses_by_category),
            ("INCOME", &self.income_by_category),
        ] {
            if rows.is_empty() {
                continue;
            }
            output.push('\n');
            output.push_str(&format!(
                "{:<30} {:>12} {:>6} {:>7}\n",
                title, "Amount", "Count", "%"
            ));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in rows {
                output.push_str(&format!(
                    "{:<30} {:>12} {:>6} {:>6.1}%\n",
                    row.category,
                    row.total.to_string(),
                    row.count,
                    row.percentage
                ));
            }
        }

        output
    }

    /// Write one CSV row per category total
    pub fn export_csv<W: Write>(&self, writer: W) -> PocketbookResult<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer
            .write_record(["Start Date", "End Date", "Type", "Category", "Amount", "Count", "Percentage"])
            .map_err(|e| PocketbookError::Export(e.to_string()))?;

        let rows = self
            .expenses_by_category
            .iter()
            .map(|row| (TransactionType::Expense, row))
            .chain(
                self.income_by_category
                    .iter()
                    .map(|row| (TransactionType::Income, row)),
            );

        for (kind, row) in rows {
            csv_writer
                .write_record([
                    self.range.start.to_string(),
                    self.range.end.to_string(),
                    kind.to_string(),
                    row.category.clone(),
                    format!("{:.2}", row.total.as_f64()),
                    row.count.to_string(),
                    format!("{:.2}", row.percentage),
                ])
                .map_err(|e| PocketbookError::Export(e.to_string()))?;
        }

        csv_writer
            .flush()
            .map_err(|e| PocketbookError::Export(e.to_string()))?;
        Ok(())
    }
}

/// Category totals for one transaction type, largest first, and their sum
///
/// Category names are grouped ignoring case; the first spelling seen is kept.
fn totals_by_category(
    transactions: &[&Transaction],
    kind: TransactionType,
) -> (Vec<CategoryTotal>, Money) {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for txn in transactions.iter().filter(|t| t.kind == kind) {
        match totals.iter_mut().find(|c| txn.in_category(&c.category)) {
            Some(entry) => {
                entry.total += txn.amount;
                entry.count += 1;
            }
            None => totals.push(CategoryTotal {
                category: txn.category.clone(),
                total: txn.amount,
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let grand_total: Money = totals.iter().map(|c| c.total).sum();
    for entry in &mut totals {
        entry.percentage = entry.total.percentage_of(grand_total);
    }

    // Stable, so equal totals keep first-seen order
    totals.sort_by(|a, b| b.total.cmp(&a.total));

    (totals, grand_total)
}
