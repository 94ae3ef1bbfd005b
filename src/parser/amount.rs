//! Amount extraction
//!
//! Patterns are tried in a fixed priority order against lowercased text; the
//! first one that yields a positive number no larger than `Money::MAX` wins.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Money;

const NUMBER: &str = r"(\d[\d,]*(?:\.\d+)?)";

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        format!(r"\$\s*{NUMBER}"),
        format!(r"{NUMBER}\s*\$"),
        format!(r"{NUMBER}\s*(?:dollars?|usd|bucks?)\b"),
        format!(r"\b(?:spent|paid|received|got|earned)\s+\$?{NUMBER}"),
        format!(r"{NUMBER}\s+(?:for|on)\b"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("amount pattern is valid"))
    .collect()
});

static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER).expect("number pattern is valid"));

/// Substrings that read as a currency amount, removed from descriptions
pub(super) static CURRENCY_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\$\s*{NUMBER}|{NUMBER}\s*\$|{NUMBER}\s*(?:dollars?|usd|bucks?)\b"
    ))
    .expect("currency pattern is valid")
});

/// Find the transaction amount in `text` (expected lowercase)
pub fn extract_amount(text: &str) -> Option<Money> {
    for pattern in AMOUNT_PATTERNS.iter() {
        if let Some(value) = pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_number(m.as_str()))
        {
            return Some(value);
        }
    }

    BARE_NUMBER
        .find_iter(text)
        .find_map(|m| parse_number(m.as_str()))
}

fn parse_number(raw: &str) -> Option<Money> {
    let value: f64 = raw.replace(',', "").parse().ok()?;
    if value > 0.0 {
        Money::from_f64_bounded(value)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(text: &str) -> Option<i64> {
        extract_amount(text).map(|m| m.cents())
    }

    #[test]
    fn test_dollar_prefix() {
        assert_eq!(cents("spent $50 on groceries"), Some(5000));
        assert_eq!(cents("paid $ 12.99 for lunch"), Some(1299));
    }

    #[test]
    fn test_commas_stripped() {
        assert_eq!(cents("rent was $1,250.00"), Some(125000));
    }

    #[test]
    fn test_dollar_suffix_and_words() {
        assert_eq!(cents("coffee 4$"), Some(400));
        assert_eq!(cents("got 20 bucks from mom"), Some(2000));
        assert_eq!(cents("30 dollars on gas"), Some(3000));
        assert_eq!(cents("salary 3000 usd"), Some(300000));
    }

    #[test]
    fn test_verb_and_preposition_patterns() {
        assert_eq!(cents("earned 450 from freelance work"), Some(45000));
        assert_eq!(cents("15 for parking"), Some(1500));
    }

    #[test]
    fn test_priority_order() {
        // "$8" outranks the earlier bare number
        assert_eq!(cents("2 coffees $8"), Some(800));
    }

    #[test]
    fn test_bare_number_fallback() {
        assert_eq!(cents("uber ride 23.5"), Some(2350));
    }

    #[test]
    fn test_zero_is_not_an_amount() {
        assert_eq!(cents("$0 lunch"), None);
        assert_eq!(cents("no numbers here"), None);
    }

    #[test]
    fn test_oversized_amounts_are_ignored() {
        assert_eq!(cents("spent $60000000000000000 on food"), None);
        assert_eq!(cents("order 99999999999999999999 paid $40"), Some(4000));
    }
}
