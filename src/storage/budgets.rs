//! Budget repository

use crate::error::PocketbookResult;
use crate::models::{Budget, BudgetId};

use super::document::DocumentHandle;

pub struct BudgetRepository {
    document: DocumentHandle,
}

impl BudgetRepository {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    pub fn get(&self, id: BudgetId) -> PocketbookResult<Option<Budget>> {
        let doc = self.document.read()?;
        Ok(doc.budgets.iter().find(|b| b.id == id).cloned())
    }

    /// Find by id (full or short) or by name, case-insensitively
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Budget>> {
        let doc = self.document.read()?;
        let identifier = identifier.trim();
        Ok(doc
            .budgets
            .iter()
            .find(|b| b.id.matches(identifier))
            .or_else(|| {
                doc.budgets
                    .iter()
                    .find(|b| b.name.to_lowercase() == identifier.to_lowercase())
            })
            .cloned())
    }

    pub fn get_all(&self) -> PocketbookResult<Vec<Budget>> {
        Ok(self.document.read()?.budgets.clone())
    }

    pub fn get_active(&self) -> PocketbookResult<Vec<Budget>> {
        let doc = self.document.read()?;
        Ok(doc.budgets.iter().filter(|b| b.is_active).cloned().collect())
    }

    pub fn upsert(&self, budget: Budget) -> PocketbookResult<()> {
        let mut doc = self.document.write()?;
        match doc.budgets.iter_mut().find(|b| b.id == budget.id) {
            Some(existing) => *existing = budget,
            None => doc.budgets.push(budget),
        }
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> PocketbookResult<bool> {
        let mut doc = self.document.write()?;
        let before = doc.budgets.len();
        doc.budgets.retain(|b| b.id != id);
        Ok(doc.budgets.len() != before)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        Ok(self.document.read()?.budgets.len())
    }
}
