//! Savings goal repository

use crate::error::PocketbookResult;
use crate::models::{GoalId, SavingsGoal};

use super::document::DocumentHandle;

pub struct GoalRepository {
    document: DocumentHandle,
}

impl GoalRepository {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    pub fn get(&self, id: GoalId) -> PocketbookResult<Option<SavingsGoal>> {
        let doc = self.document.read()?;
        Ok(doc.goals.iter().find(|g| g.id == id).cloned())
    }

    /// Find by id (full or short) or by name, case-insensitively
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<SavingsGoal>> {
        let doc = self.document.read()?;
        let identifier = identifier.trim();
        Ok(doc
            .goals
            .iter()
            .find(|g| g.id.matches(identifier))
            .or_else(|| {
                doc.goals
                    .iter()
                    .find(|g| g.name.to_lowercase() == identifier.to_lowercase())
            })
            .cloned())
    }

    pub fn get_all(&self) -> PocketbookResult<Vec<SavingsGoal>> {
        Ok(self.document.read()?.goals.clone())
    }

    pub fn upsert(&self, goal: SavingsGoal) -> PocketbookResult<()> {
        let mut doc = self.document.write()?;
        match doc.goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal,
            None => doc.goals.push(goal),
        }
        Ok(())
    }

    pub fn delete(&self, id: GoalId) -> PocketbookResult<bool> {
        let mut doc = self.document.write()?;
        let before = doc.goals.len();
        doc.goals.retain(|g| g.id != id);
        Ok(doc.goals.len() != before)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        Ok(self.document.read()?.goals.len())
    }
}
