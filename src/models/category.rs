//! Category model and the built-in category taxonomy
//!
//! The taxonomy has two parts: the default categories seeded into a fresh
//! document, and the keyword table the text extractor uses to guess a
//! category. Table order is significant: the first category with a matching
//! keyword wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;

/// Fallback category when nothing else matches
pub const FALLBACK_EXPENSE_CATEGORY: &str = "Other Expenses";

/// Which transaction types a category applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Expense,
    Income,
    Both,
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Income => write!(f, "income"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown category type '{}'", other)),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,

    /// Unique, compared case-insensitively
    pub name: String,

    #[serde(rename = "type")]
    pub kind: CategoryType,

    /// Default categories cannot be deleted
    #[serde(default)]
    pub is_default: bool,

    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Create a user category
    pub fn new(name: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
            kind,
            is_default: false,
            created_at: Utc::now(),
        }
    }

    fn default_category(name: &str, kind: CategoryType) -> Self {
        let mut category = Self::new(name, kind);
        category.is_default = true;
        category
    }

    pub fn name_matches(&self, name: &str) -> bool {
        same_category(&self.name, name)
    }

    /// Collect every violated rule
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();
        if self.name.trim().is_empty() {
            issues.push("category name is required".to_string());
        }
        if self.name.len() > 50 {
            issues.push(format!(
                "category name too long ({} chars, max 50)",
                self.name.len()
            ));
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

const DEFAULT_EXPENSE_CATEGORIES: [&str; 9] = [
    "Food & Dining",
    "Transportation",
    "Shopping",
    "Bills & Utilities",
    "Entertainment",
    "Health & Fitness",
    "Education",
    "Subscriptions",
    FALLBACK_EXPENSE_CATEGORY,
];

const DEFAULT_INCOME_CATEGORIES: [&str; 5] =
    ["Salary", "Freelance", "Investments", "Gifts", "Other Income"];

/// The fixed default category set (9 expense, 5 income)
pub fn default_categories() -> Vec<Category> {
    DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|name| Category::default_category(name, CategoryType::Expense))
        .chain(
            DEFAULT_INCOME_CATEGORIES
                .iter()
                .map(|name| Category::default_category(name, CategoryType::Income)),
        )
        .collect()
}

/// Whether `name` is one of the built-in categories
pub fn is_default_category_name(name: &str) -> bool {
    DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .chain(DEFAULT_INCOME_CATEGORIES.iter())
        .any(|default| same_category(default, name))
}

/// Case-insensitive category name comparison, with full Unicode case folding
/// and surrounding whitespace ignored
pub fn same_category(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// Category keyword table used by the text extractor, in match order
pub const CATEGORY_KEYWORDS: [(&str, &[&str]); 11] = [
    (
        "Food & Dining",
        &[
            "food", "groceries", "grocery", "restaurant", "dinner", "lunch", "breakfast",
            "coffee", "meal", "eating", "snack",
        ],
    ),
    (
        "Transportation",
        &[
            "uber", "lyft", "taxi", "gas", "fuel", "bus", "train", "metro", "parking", "car",
            "transport", "ride",
        ],
    ),
    (
        "Shopping",
        &["shopping", "clothes", "clothing", "amazon", "store", "mall", "shoes", "purchase"],
    ),
    (
        "Bills & Utilities",
        &[
            "bill", "electricity", "electric", "water", "internet", "phone", "utility",
            "utilities", "rent", "mortgage",
        ],
    ),
    (
        "Entertainment",
        &[
            "movie", "netflix", "spotify", "gaming", "concert", "entertainment", "show",
            "theater", "music",
        ],
    ),
    (
        "Health & Fitness",
        &[
            "gym", "health", "medicine", "doctor", "pharmacy", "fitness", "workout", "medical",
            "hospital",
        ],
    ),
    (
        "Education",
        &["education", "course", "book", "books", "training", "school", "tuition", "class"],
    ),
    (
        "Subscriptions",
        &["subscription", "monthly", "premium", "membership", "annual"],
    ),
    ("Salary", &["salary", "wage", "paycheck", "pay"]),
    ("Freelance", &["freelance", "gig", "contract", "client", "project"]),
    ("Investments", &["dividend", "interest", "investment", "stock", "crypto"]),
];
