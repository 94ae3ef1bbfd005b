//! Category service
//!
//! Names are unique ignoring case. The built-in categories can't be removed.

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{Category, CategoryType};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All categories, defaults first in their fixed order
    pub fn list(&self) -> PocketbookResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Categories usable for `kind` (those typed `both` match either)
    pub fn list_by_type(&self, kind: CategoryType) -> PocketbookResult<Vec<Category>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|c| c.kind == kind || c.kind == CategoryType::Both)
            .collect())
    }

    /// Find by name, falling back to id
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }
        Ok(self
            .list()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    pub fn create(&self, name: &str, kind: CategoryType) -> PocketbookResult<Category> {
        let category = Category::new(name.trim(), kind);
        category.validate().map_err(PocketbookError::Validation)?;

        if self.storage.categories.name_exists(&category.name)? {
            return Err(PocketbookError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        self.storage.categories.upsert(category.clone())?;
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        Ok(category)
    }

    /// Remove a user-defined category
    ///
    /// Transactions keep their category text; only the taxonomy entry goes.
    pub fn delete(&self, identifier: &str) -> PocketbookResult<Category> {
        let category = self
            .find(identifier)?
            .ok_or_else(|| PocketbookError::category_not_found(identifier))?;

        if category.is_default {
            return Err(PocketbookError::Protected(format!(
                "Default category '{}'",
                category.name
            )));
        }

        self.storage.categories.delete(category.id)?;
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        );

        Ok(category)
    }
}
