//! Insight repository

use crate::error::PocketbookResult;
use crate::models::{Insight, InsightId};

use super::document::DocumentHandle;

pub struct InsightRepository {
    document: DocumentHandle,
}

impl InsightRepository {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    pub fn get(&self, id: InsightId) -> PocketbookResult<Option<Insight>> {
        let doc = self.document.read()?;
        Ok(doc.insights.iter().find(|i| i.id == id).cloned())
    }

    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Insight>> {
        let doc = self.document.read()?;
        Ok(doc
            .insights
            .iter()
            .find(|i| i.id.matches(identifier))
            .cloned())
    }

    pub fn get_all(&self) -> PocketbookResult<Vec<Insight>> {
        Ok(self.document.read()?.insights.clone())
    }

    pub fn get_unread(&self) -> PocketbookResult<Vec<Insight>> {
        let doc = self.document.read()?;
        Ok(doc.insights.iter().filter(|i| !i.is_read).cloned().collect())
    }

    /// Append a batch, keeping the order given
    pub fn extend(&self, insights: Vec<Insight>) -> PocketbookResult<()> {
        self.document.write()?.insights.extend(insights);
        Ok(())
    }

    pub fn upsert(&self, insight: Insight) -> PocketbookResult<()> {
        let mut doc = self.document.write()?;
        match doc.insights.iter_mut().find(|i| i.id == insight.id) {
            Some(existing) => *existing = insight,
            None => doc.insights.push(insight),
        }
        Ok(())
    }

    pub fn delete(&self, id: InsightId) -> PocketbookResult<bool> {
        let mut doc = self.document.write()?;
        let before = doc.insights.len();
        doc.insights.retain(|i| i.id != id);
        Ok(doc.insights.len() != before)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        Ok(self.document.read()?.insights.len())
    }
}
