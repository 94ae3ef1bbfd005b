//! Budget service
//!
//! Budgets carry no authoritative spend. Every status is recomputed from the
//! ledger for the period window containing the evaluation day.

use chrono::{NaiveDate, Utc, Weekday};

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{
    Budget, BudgetAlert, BudgetId, BudgetPeriod, BudgetState, BudgetStatus, BudgetSuggestion,
    DateRange, Money, Transaction,
};
use crate::storage::Storage;

use super::local_today;

/// Sum of expenses in `budget`'s category dated inside `window`
pub fn spent_in_window(budget: &Budget, transactions: &[Transaction], window: DateRange) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_expense() && t.in_category(&budget.category) && window.contains(t.date))
        .map(|t| t.amount)
        .sum()
}

/// Evaluate a budget for the period containing `today`
pub fn evaluate(
    budget: &Budget,
    transactions: &[Transaction],
    today: NaiveDate,
    week_start: Weekday,
) -> BudgetStatus {
    let window = budget.period.window(today, week_start);
    let spent = spent_in_window(budget, transactions, window);
    let percentage_used = spent.percentage_of(budget.limit);

    let mut budget = budget.clone();
    budget.spent = spent;

    BudgetStatus {
        remaining: budget.limit.saturating_remaining(spent),
        status: BudgetState::classify(percentage_used, budget.alert_threshold),
        budget,
        window,
        spent,
        percentage_used,
    }
}

/// Alert text for a status in the warning or exceeded state
pub fn alert_message(status: &BudgetStatus) -> String {
    let budget = &status.budget;
    match status.status {
        BudgetState::Exceeded => format!(
            "Budget '{}' exceeded by {} ({:.1}% of {} used)",
            budget.name,
            status.spent - budget.limit,
            status.percentage_used,
            budget.limit
        ),
        _ => format!(
            "Budget '{}' has used {:.1}% of {}, past its {:.0}% alert threshold ({} left)",
            budget.name,
            status.percentage_used,
            budget.limit,
            budget.alert_threshold * 100.0,
            status.remaining
        ),
    }
}

/// Suggested limits from all-time expenses, one per category in first-seen order
///
/// The suggestion is the per-transaction average plus 20%, rounded up to a
/// whole unit.
pub fn suggest_limits(transactions: &[Transaction]) -> Vec<BudgetSuggestion> {
    struct Group {
        category: String,
        total: i128,
        max: Money,
        count: usize,
    }

    let mut groups: Vec<Group> = Vec::new();
    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match groups.iter_mut().find(|g| txn.in_category(&g.category)) {
            Some(group) => {
                group.total += i128::from(txn.amount.cents());
                group.max = group.max.max(txn.amount);
                group.count += 1;
            }
            None => groups.push(Group {
                category: txn.category.clone(),
                total: i128::from(txn.amount.cents()),
                max: txn.amount,
                count: 1,
            }),
        }
    }

    groups
        .into_iter()
        .map(|g| {
            let count = g.count as i128;
            // ceil(total * 1.2 / count) in whole units, kept in integers
            let suggested_units = ceil_div(g.total * 12, count * 1000);
            let suggested_units = i64::try_from(suggested_units).unwrap_or(i64::MAX / 100);
            BudgetSuggestion {
                average: Money::from_f64(g.total as f64 / g.count as f64 / 100.0),
                max: g.max,
                transaction_count: g.count,
                suggested_limit: Money::from_units(suggested_units),
                category: g.category,
            }
        })
        .collect()
}

fn ceil_div(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    if numerator % denominator > 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// Input for creating a budget
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    pub name: String,
    pub category: String,
    pub limit: Money,
    pub period: BudgetPeriod,
    /// Defaults to 0.8
    pub alert_threshold: Option<f64>,
    /// Defaults to today
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Field-by-field changes; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub limit: Option<Money>,
    pub period: Option<BudgetPeriod>,
    pub alert_threshold: Option<f64>,
    pub end_date: Option<Option<NaiveDate>>,
    pub is_active: Option<bool>,
}

/// Service for budget management and evaluation
pub struct BudgetService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            today: local_today(),
        }
    }

    /// Evaluate windows relative to a fixed day
    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn create(&self, input: CreateBudgetInput) -> PocketbookResult<Budget> {
        let category = match self.storage.categories.get_by_name(&input.category)? {
            Some(existing) => existing.name,
            None => input.category.trim().to_string(),
        };

        let mut budget = Budget::new(
            input.name.trim(),
            category,
            input.limit,
            input.period,
            input.start_date.unwrap_or(self.today),
        );
        if let Some(threshold) = input.alert_threshold {
            budget.alert_threshold = threshold;
        }
        budget.end_date = input.end_date;

        budget.validate().map_err(PocketbookError::Validation)?;

        if self.storage.budgets.find(&budget.name)?.is_some() {
            return Err(PocketbookError::Duplicate {
                entity_type: "Budget",
                identifier: budget.name,
            });
        }

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        );

        Ok(budget)
    }

    pub fn get(&self, id: BudgetId) -> PocketbookResult<Option<Budget>> {
        self.storage.budgets.get(id)
    }

    /// Find by id or name
    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<Budget>> {
        self.storage.budgets.find(identifier)
    }

    pub fn list(&self) -> PocketbookResult<Vec<Budget>> {
        self.storage.budgets.get_all()
    }

    pub fn update(&self, id: BudgetId, changes: BudgetUpdate) -> PocketbookResult<Budget> {
        let mut budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| PocketbookError::budget_not_found(id.to_string()))?;
        let before = budget.clone();

        if let Some(name) = changes.name {
            budget.name = name.trim().to_string();
        }
        if let Some(category) = changes.category {
            budget.category = category.trim().to_string();
        }
        if let Some(limit) = changes.limit {
            budget.limit = limit;
        }
        if let Some(period) = changes.period {
            budget.period = period;
        }
        if let Some(threshold) = changes.alert_threshold {
            budget.alert_threshold = threshold;
        }
        if let Some(end_date) = changes.end_date {
            budget.end_date = end_date;
        }
        if let Some(active) = changes.is_active {
            budget.is_active = active;
        }

        budget.updated_at = Utc::now();
        budget.validate().map_err(PocketbookError::Validation)?;

        self.storage.budgets.upsert(budget.clone())?;
        self.storage.save()?;

        let mut diff = Vec::new();
        if before.limit != budget.limit {
            diff.push(format!("limit: {} -> {}", before.limit, budget.limit));
        }
        if before.period != budget.period {
            diff.push(format!("period: {} -> {}", before.period, budget.period));
        }
        if before.is_active != budget.is_active {
            diff.push(format!("active: {} -> {}", before.is_active, budget.is_active));
        }

        self.storage.log_update(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &before,
            &budget,
            (!diff.is_empty()).then(|| diff.join(", ")),
        );

        Ok(budget)
    }

    pub fn delete(&self, id: BudgetId) -> PocketbookResult<Budget> {
        let budget = self
            .storage
            .budgets
            .get(id)?
            .ok_or_else(|| PocketbookError::budget_not_found(id.to_string()))?;

        self.storage.budgets.delete(id)?;
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(budget.name.clone()),
            &budget,
        );

        Ok(budget)
    }

    /// Current-window status of one budget
    pub fn status(&self, budget: &Budget) -> PocketbookResult<BudgetStatus> {
        let transactions = self.storage.transactions.get_all()?;
        let week_start = self.storage.settings()?.week_start();
        Ok(evaluate(budget, &transactions, self.today, week_start))
    }

    /// Status of every budget, in storage order
    pub fn statuses(&self) -> PocketbookResult<Vec<BudgetStatus>> {
        let transactions = self.storage.transactions.get_all()?;
        let week_start = self.storage.settings()?.week_start();
        Ok(self
            .storage
            .budgets
            .get_all()?
            .iter()
            .map(|b| evaluate(b, &transactions, self.today, week_start))
            .collect())
    }

    /// One alert per active budget in the warning or exceeded state
    ///
    /// Recomputed on every call; nothing is remembered between calls.
    pub fn check_alerts(&self) -> PocketbookResult<Vec<BudgetAlert>> {
        let transactions = self.storage.transactions.get_all()?;
        let week_start = self.storage.settings()?.week_start();

        Ok(self
            .storage
            .budgets
            .get_active()?
            .iter()
            .map(|b| evaluate(b, &transactions, self.today, week_start))
            .filter(|s| s.status.needs_alert())
            .map(|status| BudgetAlert {
                budget: status.budget.clone(),
                message: alert_message(&status),
                status,
            })
            .collect())
    }

    pub fn suggest_limits(&self) -> PocketbookResult<Vec<BudgetSuggestion>> {
        Ok(suggest_limits(&self.storage.transactions.get_all()?))
    }
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
        (temp_dir, Storage::open(paths).unwrap())
    }

    fn food_budget() -> Budget {
        Budget::new(
            "Groceries",
            "Food & Dining",
            Money::from_units(500),
            BudgetPeriod::Monthly,
            date(2025, 1, 1),
        )
    }

    fn food(amount: i64, on: NaiveDate) -> Transaction {
        Transaction::expense(Money::from_units(amount), "Food & Dining", on)
    }

    #[test]
    fn test_warning_at_ninety_percent() {
        let txns = vec![food(200, date(2025, 3, 3)), food(250, date(2025, 3, 20))];

        let status = evaluate(&food_budget(), &txns, date(2025, 3, 25), Weekday::Sun);

        assert_eq!(status.spent, Money::from_units(450));
        assert_eq!(status.percentage_used, 90.0);
        assert_eq!(status.status, BudgetState::Warning);
        assert_eq!(status.remaining, Money::from_units(50));
    }

    #[test]
    fn test_spent_matches_non_ascii_category_case() {
        let budget = Budget::new(
            "Coffee",
            "Café",
            Money::from_units(100),
            BudgetPeriod::Monthly,
            date(2025, 1, 1),
        );
        let txns = vec![Transaction::expense(Money::from_units(90), "CAFÉ", date(2025, 3, 4))];

        let spent = spent_in_window(&budget, &txns, DateRange::month(2025, 3).unwrap());

        assert_eq!(spent, Money::from_units(90));
    }

    #[test]
    fn test_spent_only_counts_matching_expenses_in_window() {
        let txns = vec![
            food(100, date(2025, 3, 1)),
            food(100, date(2025, 3, 31)),
            food(100, date(2025, 2, 28)),
            Transaction::expense(Money::from_units(100), "food & dining", date(2025, 3, 5)),
            Transaction::expense(Money::from_units(100), "Shopping", date(2025, 3, 5)),
            Transaction::income(Money::from_units(100), "Food & Dining", date(2025, 3, 5)),
        ];

        let status = evaluate(&food_budget(), &txns, date(2025, 3, 15), Weekday::Sun);
        assert_eq!(status.spent, Money::from_units(300));
    }

    #[test]
    fn test_exceeded_never_negative_remaining() {
        let txns = vec![food(650, date(2025, 3, 3))];

        let status = evaluate(&food_budget(), &txns, date(2025, 3, 25), Weekday::Sun);

        assert_eq!(status.status, BudgetState::Exceeded);
        assert_eq!(status.remaining, Money::zero());
        assert_eq!(
            alert_message(&status),
            "Budget 'Groceries' exceeded by $150.00 (130.0% of $500.00 used)"
        );
    }

    #[test]
    fn test_exactly_at_limit_is_exceeded() {
        let txns = vec![food(500, date(2025, 3, 3))];
        let status = evaluate(&food_budget(), &txns, date(2025, 3, 25), Weekday::Sun);
        assert_eq!(status.status, BudgetState::Exceeded);
    }

    #[test]
    fn test_weekly_window_uses_week_start() {
        let mut budget = food_budget();
        budget.period = BudgetPeriod::Weekly;
        // 2025-03-09 is a Sunday
        let txns = vec![food(50, date(2025, 3, 9))];

        let sunday_start = evaluate(&budget, &txns, date(2025, 3, 12), Weekday::Sun);
        let monday_start = evaluate(&budget, &txns, date(2025, 3, 12), Weekday::Mon);

        assert_eq!(sunday_start.spent, Money::from_units(50));
        assert_eq!(monday_start.spent, Money::zero());
    }

    #[test]
    fn test_suggest_limits() {
        let txns = vec![
            food(40, date(2025, 1, 1)),
            Transaction::expense(Money::from_units(15), "Transportation", date(2025, 1, 2)),
            food(60, date(2025, 1, 3)),
            Transaction::income(Money::from_units(999), "Salary", date(2025, 1, 3)),
        ];

        let suggestions = suggest_limits(&txns);

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, "Food & Dining");
        assert_eq!(suggestions[0].average, Money::from_units(50));
        assert_eq!(suggestions[0].max, Money::from_units(60));
        assert_eq!(suggestions[0].suggested_limit, Money::from_units(60));
        assert_eq!(suggestions[1].suggested_limit, Money::from_units(18));
    }

    #[test]
    fn test_suggestion_rounds_up() {
        let txns = vec![Transaction::expense(Money::from_cents(1001), "Shopping", date(2025, 1, 1))];
        // 10.01 * 1.2 = 12.012
        assert_eq!(suggest_limits(&txns)[0].suggested_limit, Money::from_units(13));
    }

    #[test]
    fn test_create_validates_every_field() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .create(CreateBudgetInput {
                name: "Bad".into(),
                category: "Shopping".into(),
                limit: Money::zero(),
                period: BudgetPeriod::Monthly,
                alert_threshold: Some(1.5),
                start_date: None,
                end_date: None,
            })
            .unwrap_err();

        match err {
            PocketbookError::Validation(issues) => assert_eq!(issues.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_succeeds_when_audit_log_is_unwritable() {
        let (temp, storage) = create_test_storage();
        std::fs::create_dir_all(temp.path().join("audit.log")).unwrap();
        let service = BudgetService::new(&storage);

        let budget = service
            .create(CreateBudgetInput {
                name: "Fuel".into(),
                category: "Transportation".into(),
                limit: Money::from_units(120),
                period: BudgetPeriod::Monthly,
                alert_threshold: None,
                start_date: None,
                end_date: None,
            })
            .unwrap();

        let paths = PocketbookPaths::with_base_dir(temp.path().to_path_buf());
        let reopened = Storage::open(paths).unwrap();
        assert!(reopened.budgets.get(budget.id).unwrap().is_some());
    }

    #[test]
    fn test_check_alerts_skips_inactive_and_under() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage).as_of(date(2025, 3, 25));

        let groceries = service
            .create(CreateBudgetInput {
                name: "Groceries".into(),
                category: "food & dining".into(),
                limit: Money::from_units(500),
                period: BudgetPeriod::Monthly,
                alert_threshold: Some(0.8),
                start_date: None,
                end_date: None,
            })
            .unwrap();
        let fun = service
            .create(CreateBudgetInput {
                name: "Fun".into(),
                category: "Entertainment".into(),
                limit: Money::from_units(100),
                period: BudgetPeriod::Monthly,
                alert_threshold: None,
                start_date: None,
                end_date: None,
            })
            .unwrap();
        assert_eq!(groceries.category, "Food & Dining");

        storage.transactions.upsert(food(450, date(2025, 3, 3))).unwrap();
        storage
            .transactions
            .upsert(Transaction::expense(Money::from_units(200), "Entertainment", date(2025, 3, 3)))
            .unwrap();

        service
            .update(
                fun.id,
                BudgetUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let alerts = service.check_alerts().unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].budget.id, groceries.id);
        assert_eq!(alerts[0].status.status, BudgetState::Warning);
        assert!(alerts[0].message.contains("90.0%"));

        // Statuses still cover the inactive budget
        assert_eq!(service.statuses().unwrap().len(), 2);
    }

    #[test]
    fn test_duplicate_name_and_delete() {
        let (_temp, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let input = CreateBudgetInput {
            name: "Groceries".into(),
            category: "Food & Dining".into(),
            limit: Money::from_units(500),
            period: BudgetPeriod::Monthly,
            alert_threshold: None,
            start_date: None,
            end_date: None,
        };

        let budget = service.create(input.clone()).unwrap();
        assert!(matches!(
            service.create(input),
            Err(PocketbookError::Duplicate { .. })
        ));

        service.delete(budget.id).unwrap();
        assert!(service.list().unwrap().is_empty());
        assert!(service.delete(budget.id).unwrap_err().is_not_found());
    }
}
