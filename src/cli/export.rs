//! CLI commands for data export and import

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};

use crate::backup::BackupManager;
use crate::error::{PocketbookError, PocketbookResult};
use crate::export::{csv, json, yaml};
use crate::services::{BudgetService, GoalService, TransactionFilter, TransactionService};
use crate::storage::Storage;

/// Full-document export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format (human-readable)
    Yaml,
}

/// Tabular CSV exports
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CsvTable {
    Transactions,
    Budgets,
    Goals,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export all data to a file
    All {
        /// Output file path
        output: PathBuf,

        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: DocumentFormat,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Export one table to CSV
    Csv {
        /// Which records to export
        #[arg(value_enum)]
        table: CsvTable,

        /// Output file path
        output: PathBuf,
    },

    /// Replace all data with the contents of an export file
    Import {
        /// JSON or YAML export file
        input: PathBuf,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Show export information without writing files
    Info,
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> PocketbookResult<()> {
    match cmd {
        ExportCommands::All {
            output,
            format,
            pretty,
        } => {
            let mut writer = create_output(&output)?;
            match format {
                DocumentFormat::Json => json::export_full_json(storage, &mut writer, pretty)?,
                DocumentFormat::Yaml => yaml::export_full_yaml(storage, &mut writer)?,
            }
            writer.flush()?;
            println!("Full database exported to: {}", output.display());
        }

        ExportCommands::Csv { table, output } => {
            let writer = create_output(&output)?;
            let count = match table {
                CsvTable::Transactions => {
                    let transactions = TransactionService::new(storage).list(TransactionFilter::new())?;
                    csv::export_transactions_csv(&transactions, writer)?;
                    transactions.len()
                }
                CsvTable::Budgets => {
                    let statuses = BudgetService::new(storage).statuses()?;
                    csv::export_budgets_csv(&statuses, writer)?;
                    statuses.len()
                }
                CsvTable::Goals => {
                    let goals = GoalService::new(storage).progress_all()?;
                    csv::export_goals_csv(&goals, writer)?;
                    goals.len()
                }
            };
            println!("Exported {} record(s) to: {}", count, output.display());
        }

        ExportCommands::Import { input, force } => {
            let contents = std::fs::read_to_string(&input).map_err(|e| {
                PocketbookError::Import(format!("Failed to read {}: {}", input.display(), e))
            })?;

            let export = if is_yaml(&input) {
                yaml::import_from_yaml(&contents)?
            } else {
                json::import_from_json(&contents)?
            };

            let m = &export.metadata;
            println!(
                "{}: {} transactions, {} budgets, {} goals, {} categories, {} insights",
                input.display(),
                m.transaction_count,
                m.budget_count,
                m.goal_count,
                m.category_count,
                m.insight_count
            );

            if !force {
                println!("WARNING: This will overwrite ALL current data!");
                println!("To proceed, run again with --force flag:");
                println!("  pocketbook export import {} --force", input.display());
                return Ok(());
            }

            let pre_import = BackupManager::new(storage).create_backup()?;
            println!("Pre-import backup saved: {}", pre_import.display());

            export.apply_to(storage)?;
            println!("Import complete!");
        }

        ExportCommands::Info => {
            let export = json::FullExport::from_storage(storage)?;

            println!("Export Information");
            println!("==================\n");

            println!("Schema Version: {}", export.schema_version);
            println!("App Version:    {}", export.app_version);
            println!();

            println!("Data Summary:");
            println!("  Transactions:  {}", export.metadata.transaction_count);
            println!("  Budgets:       {}", export.metadata.budget_count);
            println!("  Goals:         {}", export.metadata.goal_count);
            println!("  Categories:    {}", export.metadata.category_count);
            println!("  Insights:      {}", export.metadata.insight_count);

            if let (Some(earliest), Some(latest)) = (
                &export.metadata.earliest_transaction,
                &export.metadata.latest_transaction,
            ) {
                println!();
                println!("Transaction Date Range: {} to {}", earliest, latest);
            }
        }
    }

    Ok(())
}

fn create_output(path: &Path) -> PocketbookResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        PocketbookError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
