//! Monthly report
//!
//! One calendar month at a glance: the spending summary, every budget's
//! status, goal progress, unread insights and the trailing 30-day trend.

use serde::Serialize;

use crate::models::{BudgetState, BudgetStatus, DateRange, GoalProgress, Insight};

use super::spending::SpendingSummary;
use super::trend::TrendPoint;

/// Days covered by the report's daily trend
pub const TREND_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub month: DateRange,
    pub summary: SpendingSummary,
    pub budgets: Vec<BudgetStatus>,
    pub goals: Vec<GoalProgress>,
    pub insights: Vec<Insight>,
    pub daily_trend: Vec<TrendPoint>,
}

impl MonthlyReport {
    /// Budgets at or past their alert threshold
    pub fn budgets_needing_attention(&self) -> impl Iterator<Item = &BudgetStatus> {
        self.budgets.iter().filter(|s| s.status.needs_alert())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Monthly Report: {}\n", self.month.start.format("%B %Y")));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("Income:       {:>14}\n", self.summary.total_income.to_string()));
        output.push_str(&format!("Expenses:     {:>14}\n", self.summary.total_expenses.to_string()));
        output.push_str(&format!("Net Savings:  {:>14}\n", self.summary.net_savings.to_string()));

        if !self.summary.expenses_by_category.is_empty() {
            output.push_str("\nTop categories\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for row in self.summary.top_categories(5) {
                output.push_str(&format!(
                    "  {:<30} {:>12} {:>6.1}%\n",
                    row.category,
                    row.total.to_string(),
                    row.percentage
                ));
            }
        }

        if !self.budgets.is_empty() {
            output.push_str("\nBudgets\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for status in &self.budgets {
                let marker = match status.status {
                    BudgetState::Exceeded => "!!",
                    BudgetState::Warning => "! ",
                    BudgetState::Under => "  ",
                };
                output.push_str(&format!(
                    "{}{:<24} {:>12} / {:>12} {:>6.1}%\n",
                    marker,
                    status.budget.name,
                    status.spent.to_string(),
                    status.budget.limit.to_string(),
                    status.percentage_used
                ));
            }
        }

        if !self.goals.is_empty() {
            output.push_str("\nGoals\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for goal in &self.goals {
                let pace = if goal.is_completed {
                    "completed"
                } else if goal.on_track {
                    "on track"
                } else {
                    "behind"
                };
                output.push_str(&format!(
                    "  {:<24} {:>6.1}%  {}\n",
                    goal.name, goal.percentage, pace
                ));
            }
        }

        if !self.insights.is_empty() {
            output.push_str(&format!("\nUnread insights ({})\n", self.insights.len()));
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for insight in &self.insights {
                output.push_str(&format!("  {}\n", insight));
            }
        }

        output
    }
}
