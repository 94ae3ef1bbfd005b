//! Savings goal service
//!
//! Deposits and withdrawals go through the goal's ledger so the balance and
//! completion flag are always recomputed together in one record update.

use chrono::{NaiveDate, Utc};

use crate::audit::EntityType;
use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{GoalId, GoalPriority, GoalProgress, Money, SavingsGoal};
use crate::storage::Storage;

use super::local_today;

/// Share of the time-proportional target a goal must reach to be on track
const ON_TRACK_RATIO: f64 = 0.8;

/// Progress snapshot of `goal` as of `today`
pub fn goal_progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
    let percentage = goal.current_amount.percentage_of(goal.target_amount).min(100.0);
    let days_remaining = goal
        .deadline
        .map(|deadline| (deadline - today).num_days().max(0));

    let on_track = match goal.deadline {
        _ if goal.is_completed => true,
        None => true,
        Some(deadline) => {
            let start = goal.created_at.date_naive();
            let total = (deadline - start).num_days();
            if total <= 0 || today >= deadline {
                false
            } else {
                let elapsed = (today - start).num_days().clamp(0, total);
                let expected = elapsed as f64 / total as f64 * 100.0;
                percentage >= expected * ON_TRACK_RATIO
            }
        }
    };

    let monthly_required = match days_remaining {
        Some(days) if !goal.is_completed => {
            let months = ((days + 29) / 30).max(1);
            let remaining = goal.remaining_amount().cents();
            Some(Money::from_cents(remaining.saturating_add(months - 1) / months))
        }
        _ => None,
    };

    GoalProgress {
        goal_id: goal.id,
        name: goal.name.clone(),
        current_amount: goal.current_amount,
        target_amount: goal.target_amount,
        percentage,
        days_remaining,
        on_track,
        monthly_required,
        is_completed: goal.is_completed,
    }
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub name: String,
    pub target_amount: Money,
    pub deadline: Option<NaiveDate>,
    pub priority: GoalPriority,
    /// Recorded as the first deposit
    pub initial_amount: Option<Money>,
}

/// Field-by-field changes; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct GoalUpdate {
    pub name: Option<String>,
    pub target_amount: Option<Money>,
    pub deadline: Option<Option<NaiveDate>>,
    pub priority: Option<GoalPriority>,
}

/// Service for savings goal management
pub struct GoalService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            today: local_today(),
        }
    }

    pub fn as_of(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn create(&self, input: CreateGoalInput) -> PocketbookResult<SavingsGoal> {
        let mut goal = SavingsGoal::new(input.name.trim(), input.target_amount);
        goal.deadline = input.deadline;
        goal.priority = input.priority;

        match input.initial_amount {
            Some(amount) if amount.is_negative() => {
                return Err(PocketbookError::validation("initial amount cannot be negative"));
            }
            Some(amount) if amount.is_positive() => {
                goal.deposit(amount, self.today, "Initial amount");
            }
            _ => {}
        }

        goal.validate().map_err(PocketbookError::Validation)?;

        if self.storage.goals.find(&goal.name)?.is_some() {
            return Err(PocketbookError::Duplicate {
                entity_type: "Goal",
                identifier: goal.name,
            });
        }

        self.storage.goals.upsert(goal.clone())?;
        self.storage.save()?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        );

        Ok(goal)
    }

    pub fn get(&self, id: GoalId) -> PocketbookResult<Option<SavingsGoal>> {
        self.storage.goals.get(id)
    }

    pub fn find(&self, identifier: &str) -> PocketbookResult<Option<SavingsGoal>> {
        self.storage.goals.find(identifier)
    }

    pub fn list(&self) -> PocketbookResult<Vec<SavingsGoal>> {
        self.storage.goals.get_all()
    }

    pub fn update(&self, id: GoalId, changes: GoalUpdate) -> PocketbookResult<SavingsGoal> {
        let mut goal = self.require(id)?;
        let before = goal.clone();

        if let Some(name) = changes.name {
            goal.name = name.trim().to_string();
        }
        if let Some(target) = changes.target_amount {
            goal.target_amount = target;
        }
        if let Some(deadline) = changes.deadline {
            goal.deadline = deadline;
        }
        if let Some(priority) = changes.priority {
            goal.priority = priority;
        }

        goal.recalculate();
        goal.validate().map_err(PocketbookError::Validation)?;

        self.persist_update(&before, &goal, None)?;
        Ok(goal)
    }

    pub fn delete(&self, id: GoalId) -> PocketbookResult<SavingsGoal> {
        let goal = self.require(id)?;

        self.storage.goals.delete(id)?;
        self.storage.save()?;

        self.storage.log_delete(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        );

        Ok(goal)
    }

    /// Add money to a goal
    pub fn contribute(
        &self,
        id: GoalId,
        amount: Money,
        note: impl Into<String>,
    ) -> PocketbookResult<SavingsGoal> {
        if !amount.is_positive() {
            return Err(PocketbookError::validation(
                "contribution must be greater than zero",
            ));
        }

        let mut goal = self.require(id)?;
        let before = goal.clone();
        goal.deposit(amount, self.today, note);

        self.persist_update(&before, &goal, Some(format!("deposit {}", amount)))?;
        Ok(goal)
    }

    /// Take money out of a goal; never below zero
    pub fn withdraw(
        &self,
        id: GoalId,
        amount: Money,
        note: impl Into<String>,
    ) -> PocketbookResult<SavingsGoal> {
        if !amount.is_positive() {
            return Err(PocketbookError::validation(
                "withdrawal must be greater than zero",
            ));
        }

        let mut goal = self.require(id)?;
        let before = goal.clone();
        goal.withdraw(amount, self.today, note)
            .map_err(|available| PocketbookError::InsufficientFunds {
                goal: goal.name.clone(),
                requested: amount,
                available,
            })?;

        self.persist_update(&before, &goal, Some(format!("withdraw {}", amount)))?;
        Ok(goal)
    }

    pub fn progress(&self, goal: &SavingsGoal) -> GoalProgress {
        goal_progress(goal, self.today)
    }

    /// Progress of every goal, in storage order
    pub fn progress_all(&self) -> PocketbookResult<Vec<GoalProgress>> {
        Ok(self
            .storage
            .goals
            .get_all()?
            .iter()
            .map(|g| goal_progress(g, self.today))
            .collect())
    }

    fn require(&self, id: GoalId) -> PocketbookResult<SavingsGoal> {
        self.storage
            .goals
            .get(id)?
            .ok_or_else(|| PocketbookError::goal_not_found(id.to_string()))
    }

    fn persist_update(
        &self,
        before: &SavingsGoal,
        goal: &SavingsGoal,
        summary: Option<String>,
    ) -> PocketbookResult<()> {
        let mut goal = goal.clone();
        goal.updated_at = Utc::now();
        self.storage.goals.upsert(goal.clone())?;
        self.storage.save()?;

        self.storage.log_update(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            before,
            &goal,
            summary,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PocketbookPaths;
    use chrono::{Days, TimeZone};
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, Storage::open(paths).unwrap())
    }

    fn input(name: &str, target: i64, initial: Option<i64>) -> CreateGoalInput {
        CreateGoalInput {
            name: name.to_string(),
            target_amount: Money::from_units(target),
            deadline: None,
            priority: GoalPriority::Medium,
            initial_amount: initial.map(Money::from_units),
        }
    }

    fn goal_created_on(created: NaiveDate, deadline: NaiveDate, saved: i64) -> SavingsGoal {
        let mut goal = SavingsGoal::new("Trip", Money::from_units(1000));
        goal.created_at = Utc
            .from_utc_datetime(&created.and_hms_opt(12, 0, 0).unwrap());
        goal.deadline = Some(deadline);
        if saved > 0 {
            goal.deposit(Money::from_units(saved), created, "");
        }
        goal
    }

    #[test]
    fn test_contribution_completes_goal() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Laptop", 1000, Some(900))).unwrap();

        let goal = service.contribute(goal.id, Money::from_units(150), "bonus").unwrap();

        assert_eq!(goal.current_amount, Money::from_units(1050));
        assert!(goal.is_completed);
        assert_eq!(goal.current_amount, goal.ledger_total());

        let reloaded = service.get(goal.id).unwrap().unwrap();
        assert_eq!(reloaded.contributions.len(), 2);
    }

    #[test]
    fn test_withdraw_beyond_balance_is_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Car", 5000, Some(300))).unwrap();

        let err = service
            .withdraw(goal.id, Money::from_units(500), "")
            .unwrap_err();
        assert!(matches!(err, PocketbookError::InsufficientFunds { .. }));

        let unchanged = service.get(goal.id).unwrap().unwrap();
        assert_eq!(unchanged.current_amount, Money::from_units(300));
        assert_eq!(unchanged.contributions.len(), 1);
    }

    #[test]
    fn test_withdraw_keeps_ledger_in_sync() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Car", 5000, Some(300))).unwrap();

        let goal = service.withdraw(goal.id, Money::from_units(100), "repair").unwrap();

        assert_eq!(goal.current_amount, Money::from_units(200));
        assert_eq!(goal.current_amount, goal.ledger_total());
    }

    #[test]
    fn test_lowering_target_completes_goal() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Bike", 800, Some(500))).unwrap();

        let goal = service
            .update(
                goal.id,
                GoalUpdate {
                    target_amount: Some(Money::from_units(400)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(goal.is_completed);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let (_temp, storage) = create_test_storage();
        let service = GoalService::new(&storage);
        let goal = service.create(input("Fund", 100, None)).unwrap();

        assert!(service.contribute(goal.id, Money::zero(), "").unwrap_err().is_validation());
        assert!(service.withdraw(goal.id, Money::from_units(-5), "").unwrap_err().is_validation());
        assert!(service.contribute(GoalId::new(), Money::from_units(5), "").unwrap_err().is_not_found());
    }

    #[test]
    fn test_progress_on_track_and_monthly_required() {
        let created = date(2025, 1, 1);
        let deadline = created + Days::new(100);
        // Half way through with 45% saved: 45 >= 0.8 * 50
        let goal = goal_created_on(created, deadline, 450);

        let progress = goal_progress(&goal, created + Days::new(50));

        assert_eq!(progress.percentage, 45.0);
        assert_eq!(progress.days_remaining, Some(50));
        assert!(progress.on_track);
        // 550 left over two months
        assert_eq!(progress.monthly_required, Some(Money::from_units(275)));
    }

    #[test]
    fn test_progress_behind_schedule() {
        let created = date(2025, 1, 1);
        let goal = goal_created_on(created, created + Days::new(100), 100);

        let progress = goal_progress(&goal, created + Days::new(50));
        assert!(!progress.on_track);
    }

    #[test]
    fn test_past_deadline_clamps_days() {
        let created = date(2025, 1, 1);
        let goal = goal_created_on(created, date(2025, 2, 1), 100);

        let progress = goal_progress(&goal, date(2025, 3, 1));
        assert_eq!(progress.days_remaining, Some(0));
        assert!(!progress.on_track);
        assert_eq!(progress.monthly_required, Some(Money::from_units(900)));
    }

    #[test]
    fn test_no_deadline_is_on_track() {
        let goal = SavingsGoal::new("Someday", Money::from_units(100));
        let progress = goal_progress(&goal, date(2025, 1, 1));
        assert!(progress.on_track);
        assert!(progress.days_remaining.is_none());
        assert!(progress.monthly_required.is_none());
    }
}
