//! Restoring a snapshot over the live document

use std::path::Path;

use crate::error::{PocketbookError, PocketbookResult};
use crate::storage::{file_io::read_json_required, Document, Storage};

/// Validates and restores snapshots into one storage
pub struct RestoreManager<'a> {
    storage: &'a Storage,
}

impl<'a> RestoreManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse a snapshot without applying it
    pub fn validate_backup(&self, backup_path: &Path) -> PocketbookResult<RestoreSummary> {
        let document = read_snapshot(backup_path)?;
        Ok(RestoreSummary::of(&document))
    }

    /// Replace the live document with the snapshot and persist it
    ///
    /// The snapshot is fully parsed first; a bad file leaves current data
    /// untouched.
    pub fn restore_from_file(&self, backup_path: &Path) -> PocketbookResult<RestoreSummary> {
        let document = read_snapshot(backup_path)?;
        let summary = RestoreSummary::of(&document);
        self.storage.replace_document(document)?;
        log::debug!("Restored document from {}", backup_path.display());
        Ok(summary)
    }
}

fn read_snapshot(path: &Path) -> PocketbookResult<Document> {
    read_json_required(path).map_err(|e| {
        PocketbookError::Import(format!("Invalid backup {}: {}", path.display(), e))
    })
}

/// Record counts carried by a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSummary {
    pub version: String,
    pub transactions: usize,
    pub budgets: usize,
    pub categories: usize,
    pub goals: usize,
    pub insights: usize,
}

impl RestoreSummary {
    fn of(document: &Document) -> Self {
        Self {
            version: document.config.version.clone(),
            transactions: document.transactions.len(),
            budgets: document.budgets.len(),
            categories: document.categories.len(),
            goals: document.goals.len(),
            insights: document.insights.len(),
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "v{}: {} transactions, {} budgets, {} categories, {} goals, {} insights",
            self.version,
            self.transactions,
            self.budgets,
            self.categories,
            self.goals,
            self.insights
        )
    }
}
