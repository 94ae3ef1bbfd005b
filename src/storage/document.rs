//! The persisted JSON document
//!
//! All state lives in a single file with top-level keys `transactions`,
//! `budgets`, `categories`, `goals`, `insights` and `config`.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::category::default_categories;
use crate::models::{Budget, Category, Insight, SavingsGoal, Transaction};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    #[serde(default)]
    pub budgets: Vec<Budget>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default)]
    pub goals: Vec<SavingsGoal>,

    #[serde(default)]
    pub insights: Vec<Insight>,

    #[serde(default)]
    pub config: Settings,
}

impl Document {
    /// A new document seeded with the default categories
    pub fn fresh() -> Self {
        let mut doc = Self::default();
        doc.seed_default_categories();
        doc
    }

    /// Add the built-in categories once; later calls are no-ops
    pub fn seed_default_categories(&mut self) {
        if self.config.default_categories {
            return;
        }
        for category in default_categories() {
            if !self.categories.iter().any(|c| c.name_matches(&category.name)) {
                self.categories.push(category);
            }
        }
        self.config.default_categories = true;
    }
}

/// Shared, lock-protected handle to the in-memory document
#[derive(Debug, Clone, Default)]
pub struct DocumentHandle(Arc<RwLock<Document>>);

impl DocumentHandle {
    pub fn new(document: Document) -> Self {
        Self(Arc::new(RwLock::new(document)))
    }

    pub fn read(&self) -> PocketbookResult<RwLockReadGuard<'_, Document>> {
        self.0
            .read()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    pub fn write(&self) -> PocketbookResult<RwLockWriteGuard<'_, Document>> {
        self.0
            .write()
            .map_err(|e| PocketbookError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}
