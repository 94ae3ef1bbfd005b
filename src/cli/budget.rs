//! Budget CLI commands

use clap::Subcommand;

use crate::display::{format_alerts, format_budget_details, format_budget_statuses, format_suggestions};
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::BudgetPeriod;
use crate::services::{BudgetService, BudgetUpdate, CreateBudgetInput};
use crate::storage::Storage;

use super::{parse_amount, parse_keyword, parse_optional_date};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Create a spending limit for a category
    Create {
        /// Budget name
        name: String,
        /// Category the limit applies to
        category: String,
        /// Spending limit (e.g. "500")
        limit: String,
        /// daily, weekly, monthly or yearly
        #[arg(short, long, default_value = "monthly")]
        period: String,
        /// Alert when this fraction of the limit is used (0-1)
        #[arg(short, long)]
        alert: Option<f64>,
        /// First day the budget applies (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Last day the budget applies (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
    },

    /// Show every budget with its current spending
    List,

    /// Show one budget in detail
    Show {
        /// Budget name or ID
        budget: String,
    },

    /// Change a budget
    Update {
        /// Budget name or ID
        budget: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New limit
        #[arg(short, long)]
        limit: Option<String>,
        /// New period
        #[arg(short, long)]
        period: Option<String>,
        /// New alert threshold (0-1)
        #[arg(short, long)]
        alert: Option<f64>,
        /// Stop evaluating this budget
        #[arg(long, conflicts_with = "activate")]
        deactivate: bool,
        /// Resume evaluating this budget
        #[arg(long)]
        activate: bool,
    },

    /// Delete a budget
    Delete {
        /// Budget name or ID
        budget: String,
    },

    /// Show budgets past their alert threshold
    Alerts,

    /// Suggest limits from past spending
    Suggest,
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> PocketbookResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Create {
            name,
            category,
            limit,
            period,
            alert,
            start,
            end,
        } => {
            let period: BudgetPeriod = parse_keyword(&period)?;
            let input = CreateBudgetInput {
                name,
                category,
                limit: parse_amount(&limit)?,
                period,
                alert_threshold: alert,
                start_date: parse_optional_date(start)?,
                end_date: parse_optional_date(end)?,
            };

            let budget = service.create(input)?;
            println!(
                "Created {} budget '{}': {} for {}",
                budget.period, budget.name, budget.limit, budget.category
            );
            println!("  ID: {}", budget.id);
        }

        BudgetCommands::List => {
            let statuses = service.statuses()?;
            print!("{}", format_budget_statuses(&statuses));
        }

        BudgetCommands::Show { budget } => {
            let budget = service
                .find(&budget)?
                .ok_or_else(|| PocketbookError::budget_not_found(&budget))?;
            let status = service.status(&budget)?;
            print!("{}", format_budget_details(&status));
        }

        BudgetCommands::Update {
            budget,
            name,
            category,
            limit,
            period,
            alert,
            deactivate,
            activate,
        } => {
            let existing = service
                .find(&budget)?
                .ok_or_else(|| PocketbookError::budget_not_found(&budget))?;

            let is_active = match (activate, deactivate) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };

            let changes = BudgetUpdate {
                name,
                category,
                limit: limit.as_deref().map(parse_amount).transpose()?,
                period: period.as_deref().map(parse_keyword).transpose()?,
                alert_threshold: alert,
                is_active,
                ..Default::default()
            };

            let updated = service.update(existing.id, changes)?;
            println!("Updated budget '{}'", updated.name);
            print!("{}", format_budget_details(&service.status(&updated)?));
        }

        BudgetCommands::Delete { budget } => {
            let existing = service
                .find(&budget)?
                .ok_or_else(|| PocketbookError::budget_not_found(&budget))?;
            let deleted = service.delete(existing.id)?;
            println!("Deleted budget '{}'", deleted.name);
        }

        BudgetCommands::Alerts => {
            let alerts = service.check_alerts()?;
            print!("{}", format_alerts(&alerts));
        }

        BudgetCommands::Suggest => {
            let suggestions = service.suggest_limits()?;
            print!("{}", format_suggestions(&suggestions));
        }
    }

    Ok(())
}
