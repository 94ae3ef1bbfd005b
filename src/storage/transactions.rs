//! Transaction repository
//!
//! Transactions are kept in insertion order; `get_all` returns them that way
//! and callers sort for display.

use chrono::NaiveDate;

use crate::error::PocketbookResult;
use crate::models::{DateRange, Transaction, TransactionId};

use super::document::DocumentHandle;

pub struct TransactionRepository {
    document: DocumentHandle,
}

impl TransactionRepository {
    pub(crate) fn new(document: DocumentHandle) -> Self {
        Self { document }
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> PocketbookResult<Option<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc.transactions.iter().find(|t| t.id == id).cloned())
    }

    /// Find by full UUID or short display id
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc
            .transactions
            .iter()
            .find(|t| t.id.matches(identifier))
            .cloned())
    }

    pub fn get_all(&self) -> PocketbookResult<Vec<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc.transactions.clone())
    }

    /// Transactions dated inside `range` (inclusive)
    pub fn get_by_date_range(&self, range: DateRange) -> PocketbookResult<Vec<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc
            .transactions
            .iter()
            .filter(|t| range.contains(t.date))
            .cloned()
            .collect())
    }

    /// Transactions in a category, compared case-insensitively
    pub fn get_by_category(&self, category: &str) -> PocketbookResult<Vec<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc
            .transactions
            .iter()
            .filter(|t| t.in_category(category))
            .cloned()
            .collect())
    }

    /// Recurring templates whose next occurrence is on or before `today`
    pub fn get_due_recurring(&self, today: NaiveDate) -> PocketbookResult<Vec<Transaction>> {
        let doc = self.document.read()?;
        Ok(doc
            .transactions
            .iter()
            .filter(|t| t.recurring.as_ref().is_some_and(|r| r.is_due(today)))
            .cloned()
            .collect())
    }

    /// Insert or replace in place
    pub fn upsert(&self, transaction: Transaction) -> PocketbookResult<()> {
        let mut doc = self.document.write()?;
        match doc.transactions.iter_mut().find(|t| t.id == transaction.id) {
            Some(existing) => *existing = transaction,
            None => doc.transactions.push(transaction),
        }
        Ok(())
    }

    /// Remove a transaction, returning whether it existed
    pub fn delete(&self, id: TransactionId) -> PocketbookResult<bool> {
        let mut doc = self.document.write()?;
        let before = doc.transactions.len();
        doc.transactions.retain(|t| t.id != id);
        Ok(doc.transactions.len() != before)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        Ok(self.document.read()?.transactions.len())
    }
}
