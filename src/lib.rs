//! Pocketbook - personal finance tracking
//!
//! This library provides the core of the Pocketbook finance tracker: recording
//! income and expenses (including from short plain-English sentences),
//! evaluating budgets, tracking savings goals, and turning the transaction
//! history into reports and insights.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, budgets, goals, categories, insights)
//! - `parser`: Natural-language transaction extraction
//! - `storage`: JSON document storage layer
//! - `services`: Business logic layer
//! - `reports`: Spending summaries, trends and monthly reports
//! - `audit`: Audit logging system
//! - `backup`: Snapshot backups and restore
//! - `export`: JSON, YAML and CSV export
//! - `display` / `cli`: Terminal presentation and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use pocketbook::config::PocketbookPaths;
//! use pocketbook::services::TransactionService;
//! use pocketbook::storage::Storage;
//!
//! let storage = Storage::open(PocketbookPaths::new()?)?;
//! let (txn, confidence) =
//!     TransactionService::new(&storage).create_from_text("spent $50 on groceries yesterday")?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod parser;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{PocketbookError, PocketbookResult};
