//! Transaction display formatting
//!
//! Register tables, detail views and the preview shown before a
//! natural-language entry is saved.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Transaction, TransactionType};
use crate::parser::ParsedTransaction;

use super::report::truncate;

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(txn: &Transaction) -> Self {
        let marker = if txn.is_recurring() { " ↻" } else { "" };
        Self {
            id: txn.id.to_string(),
            date: txn.date.format("%Y-%m-%d").to_string(),
            kind: txn.kind.to_string(),
            category: txn.category.clone(),
            description: format!("{}{}", truncate(&txn.description, 30), marker),
            amount: signed_amount(txn),
        }
    }
}

/// Expenses shown negative, income positive
fn signed_amount(txn: &Transaction) -> String {
    match txn.kind {
        TransactionType::Expense => (-txn.amount).to_string(),
        TransactionType::Income => txn.amount.to_string(),
    }
}

/// Format a list of transactions as a register table
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows: Vec<TransactionRow> = transactions.iter().map(TransactionRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if let Some(merchant) = &txn.merchant {
        output.push_str(&format!("Merchant:    {}\n", merchant));
    }
    if !txn.tags.is_empty() {
        output.push_str(&format!("Tags:        {}\n", txn.tags.join(", ")));
    }
    if let Some(recurrence) = &txn.recurring {
        output.push_str(&format!(
            "Repeats:     {} (next {})\n",
            recurrence.frequency, recurrence.next_date
        ));
    }

    output
}

/// Format what the parser understood from free text
pub fn format_parsed_preview(parsed: &ParsedTransaction) -> String {
    format!(
        "Understood \"{}\" as:\n  {} of {} in {} on {}\n  Description: {}\n  Confidence:  {:.0}%\n",
        parsed.raw_text,
        parsed.kind,
        parsed.amount,
        parsed.category,
        parsed.date.format("%Y-%m-%d"),
        parsed.description,
        parsed.confidence * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::parser::parse_transaction;
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_format_register() {
        let txns = vec![
            Transaction::expense(Money::from_cents(5000), "Shopping", day()).with_description("Shoes"),
            Transaction::income(Money::from_units(900), "Freelance", day()),
        ];

        let formatted = format_transaction_register(&txns);
        assert!(formatted.contains("2025-01-15"));
        assert!(formatted.contains("Shoes"));
        assert!(formatted.contains("-$50.00"));
        assert!(formatted.contains("$900.00"));
        assert!(formatted.contains("Category"));
    }

    #[test]
    fn test_format_empty_register() {
        let formatted = format_transaction_register(&[]);
        assert!(formatted.contains("No transactions found"));
    }

    #[test]
    fn test_format_transaction_details() {
        let mut txn = Transaction::expense(Money::from_cents(5000), "Shopping", day())
            .with_description("Test memo");
        txn.merchant = Some("Test Store".into());

        let formatted = format_transaction_details(&txn);
        assert!(formatted.contains("Test Store"));
        assert!(formatted.contains("Shopping"));
        assert!(formatted.contains("Test memo"));
        assert!(!formatted.contains("Repeats"));
    }

    #[test]
    fn test_format_parsed_preview() {
        let parsed = parse_transaction("spent $50 on groceries yesterday", day()).unwrap();
        let formatted = format_parsed_preview(&parsed);
        assert!(formatted.contains("expense of $50.00 in Food & Dining on 2025-01-14"));
        assert!(formatted.contains("Confidence:  100%"));
    }
}
