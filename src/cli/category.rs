//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_list;
use crate::error::PocketbookResult;
use crate::models::CategoryType;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::parse_keyword;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories
    List {
        /// Only categories usable for expense or income
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
    },

    /// Add a custom category
    Add {
        /// Category name
        name: String,
        /// expense, income or both
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
    },

    /// Delete a custom category
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> PocketbookResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => service.list_by_type(parse_keyword::<CategoryType>(&kind)?)?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
        }

        CategoryCommands::Add { name, kind } => {
            let category = service.create(&name, parse_keyword(&kind)?)?;
            println!("Created {} category '{}'", category.kind, category.name);
        }

        CategoryCommands::Delete { category } => {
            let deleted = service.delete(&category)?;
            println!("Deleted category '{}'", deleted.name);
        }
    }

    Ok(())
}
