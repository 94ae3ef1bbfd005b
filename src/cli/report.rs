//! CLI commands for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::display::format_trend_chart;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{DateRange, Granularity};
use crate::services::AnalyticsService;
use crate::storage::Storage;

use super::{parse_keyword, parse_optional_date};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income and spending by category
    Summary {
        /// Start date (YYYY-MM-DD, defaults to start of this month)
        #[arg(short, long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to end of this month)
        #[arg(short, long)]
        to: Option<String>,

        /// Show top N spending categories only
        #[arg(long)]
        top: Option<usize>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending and income over consecutive periods
    Trends {
        /// daily, weekly or monthly
        #[arg(short, long, default_value = "monthly")]
        granularity: String,

        /// Number of periods, ending with the current one
        #[arg(short, long, default_value = "6")]
        span: u32,

        /// Draw a bar chart instead of a table
        #[arg(long)]
        chart: bool,
    },

    /// Everything about one calendar month
    Monthly {
        /// Year (defaults to this year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to this month)
        #[arg(short, long)]
        month: Option<u32>,
    },

    /// This month's spending against last month's
    Compare,
}

/// Handle report commands
pub fn handle_report_command(storage: &Storage, cmd: ReportCommands) -> PocketbookResult<()> {
    let service = AnalyticsService::new(storage);

    match cmd {
        ReportCommands::Summary {
            from,
            to,
            top,
            output,
        } => {
            let range = match (parse_optional_date(from)?, parse_optional_date(to)?) {
                (None, None) => None,
                (start, end) => {
                    let month = DateRange::month_containing(crate::services::local_today());
                    let range = DateRange::new(start.unwrap_or(month.start), end.unwrap_or(month.end));
                    if range.start > range.end {
                        return Err(PocketbookError::validation(format!(
                            "start date {} is after end date {}",
                            range.start, range.end
                        )));
                    }
                    Some(range)
                }
            };

            let summary = service.spending_summary(range)?;

            if let Some(path) = output {
                let file = File::create(&path).map_err(|e| {
                    PocketbookError::Export(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                summary.export_csv(BufWriter::new(file))?;
                println!("Spending summary exported to: {}", path.display());
            } else if let Some(n) = top {
                println!("Top {} Spending Categories: {}\n", n, summary.range);
                println!("{:<35} {:>12} {:>8}", "Category", "Amount", "%");
                println!("{}", "-".repeat(60));
                for cat in summary.top_categories(n) {
                    println!(
                        "{:<35} {:>12} {:>7.1}%",
                        cat.category,
                        cat.total.to_string(),
                        cat.percentage
                    );
                }
                println!("\nTotal Spending: {}", summary.total_expenses);
            } else {
                print!("{}", summary.format_terminal());
            }
        }

        ReportCommands::Trends {
            granularity,
            span,
            chart,
        } => {
            if span == 0 {
                return Err(PocketbookError::validation("span must be at least 1"));
            }
            let granularity: Granularity = parse_keyword(&granularity)?;
            let report = service.trends(granularity, span)?;
            if chart {
                print!("{}", format_trend_chart(&report, 40));
            } else {
                print!("{}", report.format_terminal());
            }
        }

        ReportCommands::Monthly { year, month } => {
            let report = service.monthly_report(year, month)?;
            print!("{}", report.format_terminal());
        }

        ReportCommands::Compare => {
            let comparison = service.compare_to_last_month()?;
            print!("{}", comparison.format_terminal());
        }
    }

    Ok(())
}
