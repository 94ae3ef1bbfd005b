//! JSON Export functionality
//!
//! Exports the complete document to JSON with schema versioning, and reads
//! such an export back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::storage::{Document, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Full document export structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub metadata: ExportMetadata,

    /// Every entity, under the same keys as the data file
    #[serde(flatten)]
    pub document: Document,
}

/// Export metadata for reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub transaction_count: usize,
    pub budget_count: usize,
    pub goal_count: usize,
    pub category_count: usize,
    pub insight_count: usize,

    /// Date range of transactions (earliest)
    pub earliest_transaction: Option<String>,

    /// Date range of transactions (latest)
    pub latest_transaction: Option<String>,
}

impl FullExport {
    /// Wrap a document with export metadata
    pub fn from_document(document: Document) -> Self {
        let metadata = ExportMetadata {
            transaction_count: document.transactions.len(),
            budget_count: document.budgets.len(),
            goal_count: document.goals.len(),
            category_count: document.categories.len(),
            insight_count: document.insights.len(),
            earliest_transaction: document
                .transactions
                .iter()
                .map(|t| t.date)
                .min()
                .map(|d| d.to_string()),
            latest_transaction: document
                .transactions
                .iter()
                .map(|t| t.date)
                .max()
                .map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            metadata,
            document,
        }
    }

    /// Create a new full export from storage
    pub fn from_storage(storage: &Storage) -> PocketbookResult<Self> {
        Ok(Self::from_document(storage.snapshot()?))
    }

    /// Check the schema version and every entity's own rules
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.schema_version != EXPORT_SCHEMA_VERSION {
            issues.push(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let doc = &self.document;
        for txn in &doc.transactions {
            if let Err(errors) = txn.validate() {
                issues.extend(errors.into_iter().map(|e| format!("transaction {}: {}", txn.id, e)));
            }
        }
        for budget in &doc.budgets {
            if let Err(errors) = budget.validate() {
                issues.extend(errors.into_iter().map(|e| format!("budget {}: {}", budget.id, e)));
            }
        }
        for goal in &doc.goals {
            if let Err(errors) = goal.validate() {
                issues.extend(errors.into_iter().map(|e| format!("goal {}: {}", goal.id, e)));
            }
        }
        for category in &doc.categories {
            if let Err(errors) = category.validate() {
                issues.extend(
                    errors
                        .into_iter()
                        .map(|e| format!("category {}: {}", category.id, e)),
                );
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }

    /// Replace the stored document with this export's contents
    pub fn apply_to(self, storage: &Storage) -> PocketbookResult<()> {
        self.validate()
            .map_err(|issues| PocketbookError::Import(issues.join("; ")))?;
        storage.replace_document(self.document)
    }
}

/// Export the full document to JSON
pub fn export_full_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    pretty: bool,
) -> PocketbookResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| PocketbookError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> PocketbookResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| PocketbookError::Import(e.to_string()))?;

    export
        .validate()
        .map_err(|issues| PocketbookError::Import(issues.join("; ")))?;

    Ok(export)
}
