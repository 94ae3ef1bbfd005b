//! Savings goal display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{EntryDirection, GoalProgress, SavingsGoal};

use super::report::format_bar;

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Saved")]
    saved: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Days Left")]
    days_left: String,
    #[tabled(rename = "Per Month")]
    per_month: String,
    #[tabled(rename = "Pace")]
    pace: String,
}

fn pace(progress: &GoalProgress) -> &'static str {
    if progress.is_completed {
        "completed"
    } else if progress.on_track {
        "on track"
    } else {
        "behind"
    }
}

/// Table of goal progress snapshots
pub fn format_goal_list(goals: &[GoalProgress]) -> String {
    if goals.is_empty() {
        return "No savings goals yet.\n".to_string();
    }

    let rows: Vec<GoalRow> = goals
        .iter()
        .map(|g| GoalRow {
            id: g.goal_id.to_string(),
            name: g.name.clone(),
            saved: g.current_amount.to_string(),
            target: g.target_amount.to_string(),
            progress: format!("{} {:.0}%", format_bar(g.percentage, 100.0, 10), g.percentage),
            days_left: g.days_remaining.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            per_month: g
                .monthly_required
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
            pace: pace(g).to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Goal detail view with its deposit/withdrawal history
pub fn format_goal_details(goal: &SavingsGoal, progress: &GoalProgress) -> String {
    let mut output = String::new();

    output.push_str(&format!("Goal:      {} ({})\n", goal.name, goal.id));
    output.push_str(&format!("Priority:  {}\n", goal.priority));
    output.push_str(&format!(
        "Saved:     {} of {} ({:.1}%)\n",
        goal.current_amount, goal.target_amount, progress.percentage
    ));
    if let Some(deadline) = goal.deadline {
        output.push_str(&format!(
            "Deadline:  {} ({} days left)\n",
            deadline,
            progress.days_remaining.unwrap_or(0)
        ));
    }
    if let Some(monthly) = progress.monthly_required {
        output.push_str(&format!("Needed:    {} per month\n", monthly));
    }
    output.push_str(&format!("Status:    {}\n", pace(progress)));

    if !goal.contributions.is_empty() {
        output.push_str("\nHistory:\n");
        for entry in &goal.contributions {
            let sign = match entry.direction {
                EntryDirection::Deposit => "+",
                EntryDirection::Withdrawal => "-",
            };
            let note = if entry.note.is_empty() {
                String::new()
            } else {
                format!("  {}", entry.note)
            };
            output.push_str(&format!("  {} {}{}{}\n", entry.date, sign, entry.amount, note));
        }
    }

    output
}
