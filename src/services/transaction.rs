//! Transaction service
//!
//! CRUD over the ledger, natural-language entry, filtered listing and
//! materialization of recurring transactions.

use chrono::{Datelike, NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{
    Frequency, Money, Recurrence, Transaction, TransactionId, TransactionType,
};
use crate::parser::{parse_transaction, ParsedTransaction};
use crate::storage::Storage;

use super::local_today;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// Case-insensitive category name
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub tag: Option<String>,
    /// Substring of description or merchant
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Inclusive on both ends
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        if self.kind.is_some_and(|k| txn.kind != k) {
            return false;
        }
        if let Some(category) = &self.category {
            if !txn.in_category(category) {
                return false;
            }
        }
        if self.start_date.is_some_and(|start| txn.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date > end) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !txn.has_tag(tag) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let in_description = txn.description.to_lowercase().contains(&needle);
            let in_merchant = txn
                .merchant
                .as_ref()
                .is_some_and(|m| m.to_lowercase().contains(&needle));
            if !in_description && !in_merchant {
                return false;
            }
        }
        true
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    pub merchant: Option<String>,
    pub recurring: Option<Frequency>,
}

impl CreateTransactionInput {
    pub fn new(
        kind: TransactionType,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: String::new(),
            date,
            tags: Vec::new(),
            merchant: None,
            recurring: None,
        }
    }
}

/// Field-by-field changes; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct TransactionUpdate {
    pub kind: Option<TransactionType>,
    pub amount: Option<Money>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
    /// `Some(None)` clears the merchant
    pub merchant: Option<Option<String>>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            today: local_today(),
        }
    }

    /// Evaluate relative dates and recurrences against a fixed day
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> PocketbookResult<Transaction> {
        let mut txn = Transaction::new(
            input.kind,
            input.amount,
            self.canonical_category(&input.category)?,
            input.date,
        );
        txn.description = input.description.trim().to_string();
        txn.tags = normalize_tags(input.tags);
        txn.merchant = input
            .merchant
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        if let Some(frequency) = input.recurring {
            let next = frequency.advance(txn.date).ok_or_else(|| {
                PocketbookError::validation("recurrence runs past the supported date range")
            })?;
            let recurrence = Recurrence::new(frequency, next).with_anchor_day(txn.date.day());
            txn.recurring = Some(recurrence);
        }

        txn.validate().map_err(PocketbookError::Validation)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        );

        Ok(txn)
    }

    /// Parse free text without saving anything
    pub fn preview_text(&self, text: &str) -> PocketbookResult<ParsedTransaction> {
        parse_transaction(text, self.today)
            .ok_or_else(|| PocketbookError::Unparseable(text.trim().to_string()))
    }

    /// Parse free text and record the resulting transaction
    pub fn create_from_text(&self, text: &str) -> PocketbookResult<(Transaction, f64)> {
        let parsed = self.preview_text(text)?;
        let confidence = parsed.confidence;

        let mut input =
            CreateTransactionInput::new(parsed.kind, parsed.amount, parsed.category, parsed.date);
        input.description = parsed.description;

        Ok((self.create(input)?, confidence))
    }

    pub fn get(&self, id: TransactionId) -> PocketbookResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find by full UUID or short `txn-` id
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Transaction>> {
        self.storage.transactions.find(identifier)
    }

    /// Matching transactions, newest first
    pub fn list(&self, filter: TransactionFilter) -> PocketbookResult<Vec<Transaction>> {
        let mut transactions: Vec<_> = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();

        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Apply a patch to an existing transaction
    pub fn update(
        &self,
        id: TransactionId,
        changes: TransactionUpdate,
    ) -> PocketbookResult<Transaction> {
        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| PocketbookError::transaction_not_found(id.to_string()))?;

        let before = txn.clone();

        if let Some(kind) = changes.kind {
            txn.kind = kind;
        }
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(category) = changes.category {
            txn.category = self.canonical_category(&category)?;
        }
        if let Some(description) = changes.description {
            txn.description = description.trim().to_string();
        }
        if let Some(date) = changes.date {
            txn.date = date;
        }
        if let Some(tags) = changes.tags {
            txn.tags = normalize_tags(tags);
        }
        if let Some(merchant) = changes.merchant {
            txn.merchant = merchant.map(|m| m.trim().to_string()).filter(|m| !m.is_empty());
        }

        txn.updated_at = Utc::now();
        txn.validate().map_err(PocketbookError::Validation)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.save()?;

        let mut diff = Vec::new();
        if before.kind != txn.kind {
            diff.push(format!("type: {} -> {}", before.kind, txn.kind));
        }
        if before.amount != txn.amount {
            diff.push(format!("amount: {} -> {}", before.amount, txn.amount));
        }
        if before.category != txn.category {
            diff.push(format!("category: '{}' -> '{}'", before.category, txn.category));
        }
        if before.date != txn.date {
            diff.push(format!("date: {} -> {}", before.date, txn.date));
        }
        if before.description != txn.description {
            diff.push("description changed".to_string());
        }

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(audit_label(&txn)),
            &before,
            &txn,
            (!diff.is_empty()).then(|| diff.join(", ")),
        );

        Ok(txn)
    }

    /// Delete a transaction, returning what was removed
    pub fn delete(&self, id: TransactionId) -> PocketbookResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| PocketbookError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(audit_label(&txn)),
            &txn,
        );

        Ok(txn)
    }

    /// Generate every recurring occurrence due on or before today
    ///
    /// Each template's `nextDate` advances past today and its remaining
    /// counter drops by one per generated occurrence. Returns the new
    /// transactions in generation order.
    pub fn process_recurring(&self) -> PocketbookResult<Vec<Transaction>> {
        let mut generated = Vec::new();

        for mut template in self.storage.transactions.get_due_recurring(self.today)? {
            let Some(mut recurrence) = template.recurring.take() else {
                continue;
            };

            while recurrence.is_due(self.today) {
                generated.push(template.occurrence_on(recurrence.next_date));

                if let Some(remaining) = recurrence.remaining.as_mut() {
                    *remaining = remaining.saturating_sub(1);
                }
                if !recurrence.advance() {
                    recurrence.remaining = Some(0);
                    break;
                }
            }

            log::debug!(
                "Recurring {} advanced to {}",
                template.id,
                recurrence.next_date
            );
            template.recurring = Some(recurrence);
            template.updated_at = Utc::now();
            self.storage.transactions.upsert(template)?;
        }

        if generated.is_empty() {
            return Ok(generated);
        }

        for txn in &generated {
            self.storage.transactions.upsert(txn.clone())?;
        }
        self.storage.save()?;

        for txn in &generated {
            self.storage.log_create(
                EntityType::Transaction,
                txn.id.to_string(),
                Some(audit_label(txn)),
                txn,
            );
        }

        Ok(generated)
    }

    pub fn count(&self) -> PocketbookResult<usize> {
        self.storage.transactions.count()
    }

    /// Use the stored spelling of a known category, otherwise the trimmed input
    fn canonical_category(&self, category: &str) -> PocketbookResult<String> {
        let category = category.trim();
        Ok(match self.storage.categories.get_by_name(category)? {
            Some(existing) => existing.name,
            None => category.to_string(),
        })
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(tag.to_string());
        }
    }
    out
}

fn audit_label(txn: &Transaction) -> String {
    format!("{} {} {}", txn.date, txn.kind, txn.category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PocketbookPaths;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn expense(amount: i64, category: &str, on: NaiveDate) -> CreateTransactionInput {
        CreateTransactionInput::new(TransactionType::Expense, Money::from_units(amount), category, on)
    }

    #[test]
    fn test_create_normalizes_category() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let txn = service.create(expense(25, "food & dining", date(2025, 1, 5))).unwrap();

        assert_eq!(txn.category, "Food & Dining");
        assert_eq!(service.count().unwrap(), 1);
        assert!(storage.paths().data_file().exists());
    }

    #[test]
    fn test_create_rejects_invalid_input_with_every_issue() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service.create(expense(0, "  ", date(2025, 1, 5))).unwrap_err();

        match err {
            PocketbookError::Validation(issues) => assert_eq!(issues.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_create_from_text() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage).as_of(date(2025, 6, 15));

        let (txn, confidence) = service
            .create_from_text("spent $50 on groceries yesterday")
            .unwrap();

        assert_eq!(txn.amount, Money::from_units(50));
        assert_eq!(txn.category, "Food & Dining");
        assert_eq!(txn.date, date(2025, 6, 14));
        assert_eq!(confidence, 1.0);
    }

    #[test]
    fn test_unparseable_text_creates_nothing() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service.create_from_text("hello there").unwrap_err();
        assert!(matches!(err, PocketbookError::Unparseable(_)));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_update_and_delete() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);
        let txn = service.create(expense(25, "Shopping", date(2025, 1, 5))).unwrap();

        let updated = service
            .update(
                txn.id,
                TransactionUpdate {
                    amount: Some(Money::from_units(30)),
                    description: Some("Shoes".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.amount, Money::from_units(30));
        assert_eq!(updated.description, "Shoes");

        service.delete(txn.id).unwrap();
        assert!(service.get(txn.id).unwrap().is_none());
        assert!(service.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        let err = service
            .update(TransactionId::new(), TransactionUpdate::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_list_filters_and_orders() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage);

        service.create(expense(10, "Shopping", date(2025, 1, 1))).unwrap();
        service.create(expense(20, "Shopping", date(2025, 1, 20))).unwrap();
        service.create(expense(30, "Education", date(2025, 2, 1))).unwrap();
        service
            .create(CreateTransactionInput::new(
                TransactionType::Income,
                Money::from_units(500),
                "Salary",
                date(2025, 1, 15),
            ))
            .unwrap();

        let shopping = service
            .list(TransactionFilter::new().category("shopping"))
            .unwrap();
        assert_eq!(shopping.len(), 2);
        assert_eq!(shopping[0].date, date(2025, 1, 20));

        let january_expenses = service
            .list(
                TransactionFilter::new()
                    .kind(TransactionType::Expense)
                    .date_range(date(2025, 1, 1), date(2025, 1, 31)),
            )
            .unwrap();
        assert_eq!(january_expenses.len(), 2);

        assert_eq!(service.list(TransactionFilter::new().limit(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_process_recurring_catches_up() {
        let (_temp, storage) = create_test_storage();
        let mut input = expense(15, "Subscriptions", date(2025, 1, 10));
        input.recurring = Some(Frequency::Monthly);
        let template = TransactionService::new(&storage).create(input).unwrap();

        let service = TransactionService::new(&storage).as_of(date(2025, 4, 1));
        let generated = service.process_recurring().unwrap();

        let dates: Vec<_> = generated.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 2, 10), date(2025, 3, 10)]);
        assert!(generated.iter().all(|t| t.recurring.is_none()));

        let template = service.get(template.id).unwrap().unwrap();
        assert_eq!(template.recurring.unwrap().next_date, date(2025, 4, 10));

        // Nothing more is due the same day
        assert!(service.process_recurring().unwrap().is_empty());
        assert_eq!(service.count().unwrap(), 3);
    }

    #[test]
    fn test_process_recurring_respects_remaining() {
        let (_temp, storage) = create_test_storage();
        let mut rent = Transaction::expense(Money::from_units(900), "Bills & Utilities", date(2025, 1, 1));
        let mut recurrence = Recurrence::new(Frequency::Weekly, date(2025, 1, 8));
        recurrence.remaining = Some(2);
        rent.recurring = Some(recurrence);
        storage.transactions.upsert(rent).unwrap();

        let service = TransactionService::new(&storage).as_of(date(2025, 3, 1));
        let generated = service.process_recurring().unwrap();

        assert_eq!(generated.len(), 2);
    }

    #[test]
    fn test_monthly_recurrence_from_month_end_does_not_drift() {
        let (_temp, storage) = create_test_storage();
        let service = TransactionService::new(&storage).as_of(date(2025, 1, 31));
        let rent = service
            .create(CreateTransactionInput {
                recurring: Some(Frequency::Monthly),
                ..CreateTransactionInput::new(
                    TransactionType::Expense,
                    Money::from_units(900),
                    "Bills & Utilities",
                    date(2025, 1, 31),
                )
            })
            .unwrap();
        assert_eq!(rent.recurring.as_ref().unwrap().next_date, date(2025, 2, 28));

        let generated = TransactionService::new(&storage)
            .as_of(date(2025, 4, 30))
            .process_recurring()
            .unwrap();

        let dates: Vec<NaiveDate> = generated.iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![date(2025, 2, 28), date(2025, 3, 31), date(2025, 4, 30)]);
        let template = service.get(rent.id).unwrap().unwrap();
        assert_eq!(template.recurring.unwrap().next_date, date(2025, 5, 31));
    }
}
