//! Storage layer for Pocketbook
//!
//! The whole dataset is one JSON document held in memory behind a lock and
//! written back atomically after every mutation. Repositories share the
//! in-memory document; nothing touches disk until [`Storage::save`].

pub mod budgets;
pub mod categories;
pub mod document;
pub mod file_io;
pub mod goals;
pub mod insights;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use document::{Document, DocumentHandle};
pub use file_io::{quarantine, read_json, write_json_atomic};
pub use goals::GoalRepository;
pub use insights::InsightRepository;
pub use transactions::TransactionRepository;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::{PocketbookPaths, Settings};
use crate::error::PocketbookResult;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PocketbookPaths,
    document: DocumentHandle,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub categories: CategoryRepository,
    pub goals: GoalRepository,
    pub insights: InsightRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create storage over a fresh document without reading disk
    pub fn new(paths: PocketbookPaths) -> PocketbookResult<Self> {
        paths.ensure_directories()?;
        Ok(Self::with_document(paths, Document::fresh()))
    }

    /// Create storage and load the document from disk
    ///
    /// A missing file yields a fresh document. An unreadable one is moved
    /// aside as `pocketbook.json.corrupt-<timestamp>` and also yields a fresh
    /// document.
    pub fn open(paths: PocketbookPaths) -> PocketbookResult<Self> {
        let storage = Self::new(paths)?;
        storage.load()?;
        Ok(storage)
    }

    fn with_document(paths: PocketbookPaths, document: Document) -> Self {
        let handle = DocumentHandle::new(document);
        Self {
            transactions: TransactionRepository::new(handle.clone()),
            budgets: BudgetRepository::new(handle.clone()),
            categories: CategoryRepository::new(handle.clone()),
            goals: GoalRepository::new(handle.clone()),
            insights: InsightRepository::new(handle.clone()),
            audit: AuditLogger::new(paths.audit_log()),
            document: handle,
            paths,
        }
    }

    pub fn paths(&self) -> &PocketbookPaths {
        &self.paths
    }

    /// Re-read the data file into memory
    pub fn load(&self) -> PocketbookResult<()> {
        let path = self.paths.data_file();
        let mut loaded = match read_json::<Document, _>(&path) {
            Ok(Some(doc)) => doc,
            Ok(None) => Document::fresh(),
            Err(e) => {
                match quarantine(&path) {
                    Ok(moved) => log::warn!(
                        "{}; moved it to {} and started from an empty document",
                        e,
                        moved.display()
                    ),
                    Err(move_err) => log::warn!(
                        "{}; starting from an empty document ({})",
                        e,
                        move_err
                    ),
                }
                Document::fresh()
            }
        };
        loaded.seed_default_categories();
        *self.document.write()? = loaded;
        Ok(())
    }

    /// Write the in-memory document to disk
    pub fn save(&self) -> PocketbookResult<()> {
        let doc = self.document.read()?;
        write_json_atomic(self.paths.data_file(), &*doc)
    }

    /// A copy of the whole document
    pub fn snapshot(&self) -> PocketbookResult<Document> {
        Ok(self.document.read()?.clone())
    }

    /// Swap in a whole document (restore, import) and persist it
    pub fn replace_document(&self, mut document: Document) -> PocketbookResult<()> {
        document.seed_default_categories();
        *self.document.write()? = document;
        self.save()
    }

    pub fn settings(&self) -> PocketbookResult<Settings> {
        Ok(self.document.read()?.config.clone())
    }

    /// Apply a change to the settings and persist
    pub fn update_settings<F>(&self, f: F) -> PocketbookResult<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let settings = {
            let mut doc = self.document.write()?;
            f(&mut doc.config);
            doc.config.clone()
        };
        self.save()?;
        Ok(settings)
    }

    /// Whether a data file has been written yet
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Audit a creation. The change is already saved, so a failed audit
    /// write is logged rather than returned.
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(AuditEntry::create(entity_type, entity_id, entity_name, entity));
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) {
        self.record(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            summary,
        ));
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) {
        self.record(AuditEntry::delete(entity_type, entity_id, entity_name, entity));
    }

    fn record(&self, entry: AuditEntry) {
        if let Err(e) = self.audit.log(&entry) {
            log::warn!(
                "{} {} {} was saved but not audited: {}",
                entry.operation,
                entry.entity_type,
                entry.entity_id,
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_storage();

        assert!(temp_dir.path().join("backups").exists());
        assert!(!storage.is_initialized());
        assert_eq!(storage.categories.count().unwrap(), 14);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, storage) = create_storage();
        let txn = Transaction::expense(
            Money::from_cents(4599),
            "Food & Dining",
            NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
        );
        storage.transactions.upsert(txn.clone()).unwrap();
        storage.save().unwrap();

        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.transactions.get(txn.id).unwrap(), Some(txn));
    }

    #[test]
    fn test_corrupt_file_starts_fresh() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("pocketbook.json"), "{{{ nope").unwrap();

        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert_eq!(storage.transactions.count().unwrap(), 0);
        assert_eq!(storage.categories.count().unwrap(), 14);

        let kept_aside = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("pocketbook.json.corrupt-"));
        assert!(kept_aside);
    }

    #[test]
    fn test_update_settings_persists() {
        let (temp_dir, storage) = create_storage();
        storage
            .update_settings(|s| s.currency = "EUR".to_string())
            .unwrap();

        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.settings().unwrap().currency, "EUR");
    }

    #[test]
    fn test_audit_helpers_write_log() {
        let (_temp_dir, storage) = create_storage();
        storage.log_create(EntityType::Transaction, "txn-1", None, &serde_json::json!({}));
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_unwritable_audit_log_is_not_fatal() {
        let (temp_dir, storage) = create_storage();
        // A directory where the log file should be makes every append fail
        std::fs::create_dir_all(temp_dir.path().join("audit.log")).unwrap();

        storage.log_delete(EntityType::Goal, "goal-1", None, &serde_json::json!({}));
    }
}
