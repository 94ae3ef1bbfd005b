//! Insight CLI commands

use clap::Subcommand;

use crate::display::format_insight_list;
use crate::error::PocketbookResult;
use crate::services::InsightsService;
use crate::storage::Storage;

/// Insight subcommands
#[derive(Subcommand)]
pub enum InsightCommands {
    /// Analyze transactions and store new insights
    Generate,

    /// List stored insights, newest first
    List {
        /// Only unread insights
        #[arg(short, long)]
        unread: bool,
    },

    /// Mark insights as read
    Read {
        /// Insight ID
        #[arg(required_unless_present = "all")]
        id: Option<String>,
        /// Mark every insight as read
        #[arg(long, conflicts_with = "id")]
        all: bool,
    },
}

/// Handle an insight command
pub fn handle_insight_command(storage: &Storage, cmd: InsightCommands) -> PocketbookResult<()> {
    let service = InsightsService::new(storage);

    match cmd {
        InsightCommands::Generate => {
            let generated = service.generate()?;
            if generated.is_empty() {
                println!("Nothing new to report.");
            } else {
                println!("Generated {} insight(s):", generated.len());
                print!("{}", format_insight_list(&generated));
            }
        }

        InsightCommands::List { unread } => {
            let insights = service.list(unread)?;
            print!("{}", format_insight_list(&insights));
        }

        InsightCommands::Read { id, all } => {
            if all {
                let count = service.mark_all_read()?;
                println!("Marked {} insight(s) as read.", count);
            } else if let Some(id) = id {
                let insight = service.mark_read(&id)?;
                println!("Marked '{}' as read.", insight.title);
            }
        }
    }

    Ok(())
}
