//! Natural-language transaction parsing
//!
//! A fixed-order keyword pipeline turning text such as
//! `"spent $50 on groceries yesterday"` into a transaction draft:
//!
//! 1. transaction type from keywords
//! 2. amount (see [`amount`])
//! 3. category from the keyword table
//! 4. date (see [`date`])
//! 5. description from what is left
//! 6. a confidence score
//!
//! Parsing yields nothing only when the type or the amount can't be found.

pub mod amount;
pub mod date;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::models::{Money, Transaction, TransactionType, CATEGORY_KEYWORDS, FALLBACK_EXPENSE_CATEGORY};

pub use amount::extract_amount;
pub use date::extract_date;

const EXPENSE_KEYWORDS: &[&str] = &[
    "spent",
    "paid",
    "bought",
    "purchased",
    "cost",
    "charged",
    "expense",
    "bill",
    "payment",
    "subscription",
    "fee",
];

const INCOME_KEYWORDS: &[&str] = &[
    "received",
    "earned",
    "got",
    "income",
    "salary",
    "wage",
    "payment from",
    "refund",
    "bonus",
    "commission",
    "dividend",
];

static FROM_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfrom\b").expect("valid pattern"));

static ON_FOR_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:on|for)\b").expect("valid pattern"));

static FILLER_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:spent|paid|received|got|earned|bought|for|on|at|from)\b")
        .expect("valid pattern")
});

/// A transaction draft produced from free text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Money,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    /// Between 0.5 and 1.0
    pub confidence: f64,
    pub raw_text: String,
}

impl ParsedTransaction {
    pub fn into_transaction(self) -> Transaction {
        Transaction::new(self.kind, self.amount, self.category, self.date)
            .with_description(self.description)
    }
}

/// Parse free text, resolving relative dates against `today`
pub fn parse_transaction(text: &str, today: NaiveDate) -> Option<ParsedTransaction> {
    let normalized = text.trim().to_lowercase();

    let kind = detect_type(&normalized)?;
    let amount = extract_amount(&normalized)?;
    let category = detect_category(&normalized).unwrap_or(FALLBACK_EXPENSE_CATEGORY);
    let date = extract_date(&normalized, today);
    let description = extract_description(&normalized, category);

    // Tenths, so the sum stays exact
    let mut score: u8 = 5 + 2;
    if category != FALLBACK_EXPENSE_CATEGORY {
        score += 2;
    }
    if date != today {
        score += 1;
    }

    Some(ParsedTransaction {
        kind,
        amount,
        category: category.to_string(),
        description,
        date,
        confidence: f64::from(score.min(10)) / 10.0,
        raw_text: text.to_string(),
    })
}

/// Expense wins when both keyword sets match
pub fn detect_type(text: &str) -> Option<TransactionType> {
    let expense = EXPENSE_KEYWORDS.iter().any(|k| text.contains(k));
    let income = INCOME_KEYWORDS.iter().any(|k| text.contains(k));

    if expense {
        return Some(TransactionType::Expense);
    }
    if income {
        return Some(TransactionType::Income);
    }
    if FROM_WORD.is_match(text) {
        return Some(TransactionType::Income);
    }
    if ON_FOR_WORD.is_match(text) {
        return Some(TransactionType::Expense);
    }
    None
}

/// First category in table order with a keyword contained in `text`
pub fn detect_category(text: &str) -> Option<&'static str> {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
}

fn extract_description(text: &str, category: &str) -> String {
    let without_amounts = amount::CURRENCY_AMOUNT.replace_all(text, " ");
    let without_fillers = FILLER_WORDS.replace_all(&without_amounts, " ");
    let collapsed = without_fillers.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut chars = collapsed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => category.to_string(),
    }
}
