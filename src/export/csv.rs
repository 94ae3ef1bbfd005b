//! CSV Export functionality
//!
//! Spreadsheet-friendly exports of transactions, budget status and goals.
//! Amounts are written as plain decimals without a currency symbol.

use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::models::{BudgetStatus, GoalProgress, Transaction};

fn export_err(e: csv::Error) -> PocketbookError {
    PocketbookError::Export(e.to_string())
}

/// One row per transaction, in the order given
pub fn export_transactions_csv<W: Write>(
    transactions: &[Transaction],
    writer: W,
) -> PocketbookResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "ID",
            "Date",
            "Type",
            "Category",
            "Description",
            "Merchant",
            "Tags",
            "Amount",
            "Recurring",
        ])
        .map_err(export_err)?;

    for txn in transactions {
        let recurring = txn
            .recurring
            .as_ref()
            .map(|r| r.frequency.to_string())
            .unwrap_or_default();

        csv_writer
            .write_record([
                txn.id.as_uuid().to_string(),
                txn.date.to_string(),
                txn.kind.to_string(),
                txn.category.clone(),
                txn.description.clone(),
                txn.merchant.clone().unwrap_or_default(),
                txn.tags.join(";"),
                format!("{:.2}", txn.amount.as_f64()),
                recurring,
            ])
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| PocketbookError::Export(e.to_string()))?;
    Ok(())
}

/// One row per evaluated budget
pub fn export_budgets_csv<W: Write>(statuses: &[BudgetStatus], writer: W) -> PocketbookResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "Name",
            "Category",
            "Period",
            "Window Start",
            "Window End",
            "Limit",
            "Spent",
            "Remaining",
            "Percentage Used",
            "Status",
        ])
        .map_err(export_err)?;

    for status in statuses {
        csv_writer
            .write_record([
                status.budget.name.clone(),
                status.budget.category.clone(),
                status.budget.period.to_string(),
                status.window.start.to_string(),
                status.window.end.to_string(),
                format!("{:.2}", status.budget.limit.as_f64()),
                format!("{:.2}", status.spent.as_f64()),
                format!("{:.2}", status.remaining.as_f64()),
                format!("{:.1}", status.percentage_used),
                status.status.to_string(),
            ])
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| PocketbookError::Export(e.to_string()))?;
    Ok(())
}

/// One row per goal progress snapshot
pub fn export_goals_csv<W: Write>(goals: &[GoalProgress], writer: W) -> PocketbookResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "Name",
            "Current",
            "Target",
            "Percentage",
            "Days Remaining",
            "On Track",
            "Monthly Required",
            "Completed",
        ])
        .map_err(export_err)?;

    for goal in goals {
        csv_writer
            .write_record([
                goal.name.clone(),
                format!("{:.2}", goal.current_amount.as_f64()),
                format!("{:.2}", goal.target_amount.as_f64()),
                format!("{:.1}", goal.percentage),
                goal.days_remaining.map(|d| d.to_string()).unwrap_or_default(),
                goal.on_track.to_string(),
                goal.monthly_required
                    .map(|m| format!("{:.2}", m.as_f64()))
                    .unwrap_or_default(),
                goal.is_completed.to_string(),
            ])
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| PocketbookError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Budget, BudgetPeriod, Frequency, Money, Recurrence};
    use crate::services::budget::evaluate;
    use chrono::{NaiveDate, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_transactions_csv() {
        let mut rent = Transaction::expense(Money::from_units(1200), "Bills & Utilities", date(2025, 1, 1))
            .with_description("Rent, January");
        rent.recurring = Some(Recurrence::new(Frequency::Monthly, date(2025, 2, 1)));
        rent.tags = vec!["home".into(), "fixed".into()];

        let mut output = Vec::new();
        export_transactions_csv(&[rent.clone()], &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID,Date,Type,Category"));
        assert!(lines[1].contains("\"Rent, January\""));
        assert!(lines[1].contains("home;fixed"));
        assert!(lines[1].ends_with("1200.00,monthly"));
        assert!(lines[1].starts_with(&rent.id.as_uuid().to_string()));
    }

    #[test]
    fn test_export_budgets_csv() {
        let budget = Budget::new(
            "Groceries",
            "Food & Dining",
            Money::from_units(500),
            BudgetPeriod::Monthly,
            date(2025, 1, 1),
        );
        let txns = vec![Transaction::expense(Money::from_units(450), "Food & Dining", date(2025, 3, 2))];
        let status = evaluate(&budget, &txns, date(2025, 3, 10), Weekday::Sun);

        let mut output = Vec::new();
        export_budgets_csv(&[status], &mut output).unwrap();
        let csv = String::from_utf8(output).unwrap();

        assert!(csv.contains(
            "Groceries,Food & Dining,monthly,2025-03-01,2025-03-31,500.00,450.00,50.00,90.0,warning"
        ));
    }
}
