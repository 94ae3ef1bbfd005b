//! Budget display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{BudgetAlert, BudgetState, BudgetStatus, BudgetSuggestion};

use super::report::{format_bar, format_percentage};

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Limit")]
    limit: String,
    #[tabled(rename = "Left")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn status_label(status: &BudgetStatus) -> String {
    let label = match status.status {
        BudgetState::Under => "ok",
        BudgetState::Warning => "warning",
        BudgetState::Exceeded => "EXCEEDED",
    };
    if status.budget.is_active {
        label.to_string()
    } else {
        format!("{} (inactive)", label)
    }
}

/// Table of evaluated budgets
pub fn format_budget_statuses(statuses: &[BudgetStatus]) -> String {
    if statuses.is_empty() {
        return "No budgets defined.\n".to_string();
    }

    let rows: Vec<BudgetRow> = statuses
        .iter()
        .map(|s| BudgetRow {
            id: s.budget.id.to_string(),
            name: s.budget.name.clone(),
            category: s.budget.category.clone(),
            period: s.budget.period.to_string(),
            spent: s.spent.to_string(),
            limit: s.budget.limit.to_string(),
            remaining: s.remaining.to_string(),
            used: format!(
                "{} {}",
                format_bar(s.percentage_used.min(100.0), 100.0, 10),
                format_percentage(s.percentage_used)
            ),
            status: status_label(s),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Detail view of one evaluated budget
pub fn format_budget_details(status: &BudgetStatus) -> String {
    let budget = &status.budget;
    let mut output = String::new();

    output.push_str(&format!("Budget:     {} ({})\n", budget.name, budget.id));
    output.push_str(&format!("Category:   {}\n", budget.category));
    output.push_str(&format!("Period:     {} ({})\n", budget.period, status.window));
    output.push_str(&format!("Limit:      {}\n", budget.limit));
    output.push_str(&format!("Spent:      {}\n", status.spent));
    output.push_str(&format!("Remaining:  {}\n", status.remaining));
    output.push_str(&format!(
        "Used:       {:.1}% (alert at {:.0}%)\n",
        status.percentage_used,
        budget.alert_threshold * 100.0
    ));
    output.push_str(&format!("Status:     {}\n", status_label(status)));

    output
}

/// One line per alert
pub fn format_alerts(alerts: &[BudgetAlert]) -> String {
    if alerts.is_empty() {
        return "All budgets are within their limits.\n".to_string();
    }

    alerts
        .iter()
        .map(|a| {
            let icon = match a.status.status {
                BudgetState::Exceeded => "✗",
                _ => "⚠",
            };
            format!("{} {}\n", icon, a.message)
        })
        .collect()
}

#[derive(Tabled)]
struct SuggestionRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Transactions")]
    count: usize,
    #[tabled(rename = "Average")]
    average: String,
    #[tabled(rename = "Largest")]
    max: String,
    #[tabled(rename = "Suggested Limit")]
    suggested: String,
}

pub fn format_suggestions(suggestions: &[BudgetSuggestion]) -> String {
    if suggestions.is_empty() {
        return "Not enough expense history to suggest limits.\n".to_string();
    }

    let rows: Vec<SuggestionRow> = suggestions
        .iter()
        .map(|s| SuggestionRow {
            category: s.category.clone(),
            count: s.transaction_count,
            average: s.average.to_string(),
            max: s.max.to_string(),
            suggested: s.suggested_limit.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
