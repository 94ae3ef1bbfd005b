//! Category repository
//!
//! Categories are identified by name in every other record, so lookups here
//! are by name first.

use crate::error::PocketbookResult;
use crate::models::{Category, CategoryId};

use super::document::DocumentHandle;

pub struct CategoryRepository {
    document: DocumentHandle,
}

impl CategoryRepository {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    pub fn get(&self, id: CategoryId) -> PocketbookResult<Option<Category>> {
        let doc = self.document.read()?;
        Ok(doc.categories.iter().find(|c| c.id == id).cloned())
    }

    /// Case-insensitive name lookup
    pub fn get_by_name(&self, name: &str) -> PocketbookResult<Option<Category>> {
        let doc = self.document.read()?;
        Ok(doc.categories.iter().find(|c| c.name_matches(name)).cloned())
    }

    pub fn get_all(&self) -> PocketbookResult<Vec<Category>> {
        Ok(self.document.read()?.categories.clone())
    }

    pub fn name_exists(&self, name: &str) -> PocketbookResult<bool> {
        Ok(self.get_by_name(name)?.is_some())
    }

    pub fn upsert(&self, category: Category) -> PocketbookResult<()> {
        let mut doc = self.document.write()?;
        match doc.categories.iter_mut().find(|c| c.id == category.id) {
            Some(existing) => *existing = category,
            None => doc.categories.push(category),
        }
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> PocketbookResult<bool> {
        let mut doc = self.document.write()?;
        let before = doc.categories.len();
        doc.categories.retain(|c| c.id != id);
        Ok(doc.categories.len() != before)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        Ok(self.document.read()?.categories.len())
    }
}
