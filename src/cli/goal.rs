//! Savings goal CLI commands

use clap::Subcommand;

use crate::display::{format_goal_details, format_goal_list};
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{GoalPriority, SavingsGoal};
use crate::services::{CreateGoalInput, GoalService, GoalUpdate};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_keyword, parse_optional_date};

/// Goal subcommands
#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a savings goal
    Create {
        /// Goal name
        name: String,
        /// Target amount
        target: String,
        /// Deadline (YYYY-MM-DD)
        #[arg(short, long)]
        deadline: Option<String>,
        /// low, medium or high
        #[arg(short, long, default_value = "medium")]
        priority: String,
        /// Amount already saved
        #[arg(short, long)]
        initial: Option<String>,
    },

    /// List goals with their progress
    List,

    /// Show a goal with its history
    Show {
        /// Goal name or ID
        goal: String,
    },

    /// Add money to a goal
    Contribute {
        /// Goal name or ID
        goal: String,
        /// Amount to add
        amount: String,
        /// Note for the history
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Take money out of a goal
    Withdraw {
        /// Goal name or ID
        goal: String,
        /// Amount to take out
        amount: String,
        /// Note for the history
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Change a goal
    Update {
        /// Goal name or ID
        goal: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New target amount
        #[arg(short, long)]
        target: Option<String>,
        /// New deadline (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "no_deadline")]
        deadline: Option<String>,
        /// Remove the deadline
        #[arg(long)]
        no_deadline: bool,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
    },

    /// Delete a goal
    Delete {
        /// Goal name or ID
        goal: String,
    },
}

/// Handle a goal command
pub fn handle_goal_command(storage: &Storage, cmd: GoalCommands) -> PocketbookResult<()> {
    let service = GoalService::new(storage);

    match cmd {
        GoalCommands::Create {
            name,
            target,
            deadline,
            priority,
            initial,
        } => {
            let priority: GoalPriority = parse_keyword(&priority)?;
            let input = CreateGoalInput {
                name,
                target_amount: parse_amount(&target)?,
                deadline: parse_optional_date(deadline)?,
                priority,
                initial_amount: initial.as_deref().map(parse_amount).transpose()?,
            };

            let goal = service.create(input)?;
            println!("Created goal '{}' for {}", goal.name, goal.target_amount);
            println!("  ID: {}", goal.id);
        }

        GoalCommands::List => {
            let goals = service.progress_all()?;
            print!("{}", format_goal_list(&goals));
        }

        GoalCommands::Show { goal } => {
            let goal = find_goal(&service, &goal)?;
            let progress = service.progress(&goal);
            print!("{}", format_goal_details(&goal, &progress));
        }

        GoalCommands::Contribute { goal, amount, note } => {
            let goal = find_goal(&service, &goal)?;
            let updated = service.contribute(goal.id, parse_amount(&amount)?, note)?;
            report_balance(&service, &updated);
        }

        GoalCommands::Withdraw { goal, amount, note } => {
            let goal = find_goal(&service, &goal)?;
            let updated = service.withdraw(goal.id, parse_amount(&amount)?, note)?;
            report_balance(&service, &updated);
        }

        GoalCommands::Update {
            goal,
            name,
            target,
            deadline,
            no_deadline,
            priority,
        } => {
            let goal = find_goal(&service, &goal)?;
            let deadline = if no_deadline {
                Some(None)
            } else {
                deadline.as_deref().map(parse_date).transpose()?.map(Some)
            };

            let changes = GoalUpdate {
                name,
                target_amount: target.as_deref().map(parse_amount).transpose()?,
                deadline,
                priority: priority.as_deref().map(parse_keyword).transpose()?,
            };

            let updated = service.update(goal.id, changes)?;
            println!("Updated goal '{}'", updated.name);
        }

        GoalCommands::Delete { goal } => {
            let goal = find_goal(&service, &goal)?;
            let deleted = service.delete(goal.id)?;
            println!("Deleted goal '{}'", deleted.name);
        }
    }

    Ok(())
}

fn find_goal(service: &GoalService, identifier: &str) -> PocketbookResult<SavingsGoal> {
    service
        .find(identifier)?
        .ok_or_else(|| PocketbookError::goal_not_found(identifier))
}

fn report_balance(service: &GoalService, goal: &SavingsGoal) {
    let progress = service.progress(goal);
    println!(
        "'{}' now holds {} of {} ({:.1}%)",
        goal.name, goal.current_amount, goal.target_amount, progress.percentage
    );
    if progress.is_completed {
        println!("Goal reached!");
    }
}
