//! Transaction CLI commands

use clap::Subcommand;

use crate::display::{format_parsed_preview, format_transaction_details, format_transaction_register};
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{Frequency, TransactionType};
use crate::services::{
    CreateTransactionInput, TransactionFilter, TransactionService, TransactionUpdate,
};
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_keyword, parse_optional_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction from explicit fields
    Add {
        /// Amount (e.g. "50.00")
        amount: String,
        /// Category name
        category: String,
        /// expense or income
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Transaction date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Description
        #[arg(short = 'm', long)]
        description: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Merchant name
        #[arg(long)]
        merchant: Option<String>,
        /// Repeat daily, weekly, biweekly, monthly or yearly
        #[arg(short, long)]
        recurring: Option<String>,
    },

    /// Record a transaction from a plain-English sentence
    Quick {
        /// e.g. "spent $50 on groceries yesterday"
        text: String,
        /// Show what would be recorded without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// List transactions, newest first
    List {
        /// expense or income
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Only transactions carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Text to look for in description or merchant
        #[arg(short, long)]
        search: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },

    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },

    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },

    /// Record any recurring transactions that have come due
    Recurring,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    cmd: TransactionCommands,
) -> PocketbookResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            kind,
            date,
            description,
            tags,
            merchant,
            recurring,
        } => {
            let kind: TransactionType = parse_keyword(&kind)?;
            let amount = parse_amount(&amount)?;
            let date = match date {
                Some(date) => parse_date(&date)?,
                None => crate::services::local_today(),
            };

            let mut input = CreateTransactionInput::new(kind, amount, category, date);
            input.description = description.unwrap_or_default();
            input.tags = tags;
            input.merchant = merchant;
            input.recurring = recurring
                .as_deref()
                .map(parse_keyword::<Frequency>)
                .transpose()?;

            let txn = service.create(input)?;
            println!("Recorded {} {} in {}", txn.kind, txn.amount, txn.category);
            println!("  ID: {}", txn.id);
            if let Some(recurrence) = &txn.recurring {
                println!("  Repeats {}, next on {}", recurrence.frequency, recurrence.next_date);
            }
        }

        TransactionCommands::Quick { text, dry_run } => {
            let parsed = service.preview_text(&text)?;
            print!("{}", format_parsed_preview(&parsed));

            if dry_run {
                println!("(dry run, nothing saved)");
                return Ok(());
            }

            let (txn, _) = service.create_from_text(&text)?;
            println!("Saved as {}", txn.id);
        }

        TransactionCommands::List {
            kind,
            category,
            from,
            to,
            tag,
            search,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(kind) = kind {
                filter = filter.kind(parse_keyword(&kind)?);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            let from = parse_optional_date(from)?;
            let to = parse_optional_date(to)?;
            if from.is_some() || to.is_some() {
                filter = filter.date_range(
                    from.unwrap_or(chrono::NaiveDate::MIN),
                    to.unwrap_or(chrono::NaiveDate::MAX),
                );
            }
            if let Some(tag) = tag {
                filter = filter.tag(tag);
            }
            if let Some(search) = search {
                filter = filter.search(search);
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_register(&transactions));
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| PocketbookError::transaction_not_found(&id))?;
            print!("{}", format_transaction_details(&txn));
        }

        TransactionCommands::Edit {
            id,
            amount,
            category,
            kind,
            date,
            description,
        } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| PocketbookError::transaction_not_found(&id))?;

            let changes = TransactionUpdate {
                kind: kind.as_deref().map(parse_keyword).transpose()?,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                category,
                description,
                date: parse_optional_date(date)?,
                ..Default::default()
            };

            let updated = service.update(txn.id, changes)?;
            println!("Updated transaction {}", updated.id);
            print!("{}", format_transaction_details(&updated));
        }

        TransactionCommands::Delete { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| PocketbookError::transaction_not_found(&id))?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted {} {} on {} ({})",
                deleted.kind, deleted.amount, deleted.date, deleted.category
            );
        }

        TransactionCommands::Recurring => {
            let created = service.process_recurring()?;
            if created.is_empty() {
                println!("No recurring transactions are due.");
            } else {
                println!("Recorded {} recurring transaction(s):", created.len());
                print!("{}", format_transaction_register(&created));
            }
        }
    }

    Ok(())
}
