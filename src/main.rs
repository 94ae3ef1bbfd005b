use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pocketbook::audit::{AuditQuery, EntityType};
use pocketbook::cli::{
    handle_backup_command, handle_budget_command, handle_category_command, handle_export_command,
    handle_goal_command, handle_insight_command, handle_report_command,
    handle_transaction_command,
};
use pocketbook::config::PocketbookPaths;
use pocketbook::storage::Storage;
use pocketbook::PocketbookError;

#[derive(Parser)]
#[command(
    name = "pocketbook",
    version,
    about = "Personal finance tracking from the command line",
    long_about = "Pocketbook records income and expenses (including from plain-English \
                  sentences), tracks budgets and savings goals, and reports on where \
                  the money goes."
)]
struct Cli {
    /// Directory holding pocketbook.json, backups and the audit log
    #[arg(long, global = true, env = "POCKETBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(pocketbook::cli::TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(pocketbook::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(pocketbook::cli::GoalCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(pocketbook::cli::CategoryCommands),

    /// Reports and analytics
    #[command(subcommand)]
    Report(pocketbook::cli::ReportCommands),

    /// Automatically generated observations about spending
    #[command(subcommand, alias = "insight")]
    Insights(pocketbook::cli::InsightCommands),

    /// Backup management commands
    #[command(subcommand)]
    Backup(pocketbook::cli::BackupCommands),

    /// Export and import data
    #[command(subcommand)]
    Export(pocketbook::cli::ExportCommands),

    /// Show recent changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only transaction, budget, goal, category or insight changes
        #[arg(short, long)]
        entity: Option<String>,
        /// Only changes to this ID (a prefix is enough)
        #[arg(long)]
        id: Option<String>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = PocketbookPaths::resolve(cli.data_dir)?;
    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, cmd)?,
        Some(Commands::Insights(cmd)) => handle_insight_command(&storage, cmd)?,
        Some(Commands::Backup(cmd)) => handle_backup_command(&storage, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::History { limit, entity, id }) => {
            let mut query = AuditQuery::new().limit(limit);
            if let Some(entity) = entity {
                let entity_type: EntityType =
                    entity.parse().map_err(|e: String| PocketbookError::validation(e))?;
                query = query.entity_type(entity_type);
            }
            if let Some(id) = id {
                query = query.entity_id(id);
            }
            let entries = storage.audit().query(&query)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config) => {
            let settings = storage.settings()?;
            println!("Pocketbook Configuration");
            println!("========================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Data file:        {}", paths.data_file().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!(
                "  Currency:          {} ({})",
                settings.currency,
                settings.currency_symbol()
            );
            println!("  Week starts on:    {}", settings.week_start());
            println!("  Backups kept:      {}", settings.max_backups);
            if let Some(last) = settings.last_backup {
                println!("  Last backup:       {}", last.format("%Y-%m-%d %H:%M:%S UTC"));
            }
        }
        None => {
            println!("Pocketbook - personal finance tracking");
            println!();
            println!("Run 'pocketbook --help' for usage information.");
            println!("Try: pocketbook txn quick \"spent $12 on lunch today\"");
        }
    }

    Ok(())
}
