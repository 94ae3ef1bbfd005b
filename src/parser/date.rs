//! Date extraction
//!
//! Relative words first, then `<Month> <day>[, year]`, then `MM/DD[/YY[YY]]`.
//! Anything else, including impossible dates, resolves to `today`.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept?|oct|nov|dec)\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s+(\d{4})\b)?",
    )
    .expect("month pattern is valid")
});

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})(?:/(\d{2}|\d{4}))?\b").expect("numeric date pattern is valid")
});

/// Resolve the transaction date in `text` (expected lowercase)
pub fn extract_date(text: &str, today: NaiveDate) -> NaiveDate {
    if text.contains("today") {
        return today;
    }
    if text.contains("yesterday") {
        return today - Days::new(1);
    }
    if text.contains("last week") {
        return today - Days::new(7);
    }

    month_day(text, today)
        .or_else(|| numeric(text, today))
        .unwrap_or(today)
}

fn month_day(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = MONTH_DAY.captures(text)?;
    let month = month_number(caps.get(1)?.as_str().get(..3)?)?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year = match caps.get(3) {
        Some(y) => y.as_str().parse().ok()?,
        None => today.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn numeric(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let caps = NUMERIC.captures(text)?;
    let month: u32 = caps.get(1)?.as_str().parse().ok()?;
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let year = match caps.get(3) {
        Some(y) => {
            let y: i32 = y.as_str().parse().ok()?;
            if y < 100 {
                y + 2000
            } else {
                y
            }
        }
        None => today.year(),
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(prefix: &str) -> Option<u32> {
    let month = match prefix {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 3, 15)
    }

    #[test]
    fn test_relative_words() {
        assert_eq!(extract_date("lunch today", today()), today());
        assert_eq!(extract_date("lunch yesterday", today()), date(2025, 3, 14));
        assert_eq!(extract_date("movie last week", today()), date(2025, 3, 8));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(extract_date("rent on january 3rd", today()), date(2025, 1, 3));
        assert_eq!(extract_date("paid on dec 24, 2024", today()), date(2024, 12, 24));
        assert_eq!(extract_date("gift on february 14", today()), date(2025, 2, 14));
    }

    #[test]
    fn test_numeric() {
        assert_eq!(extract_date("gas 02/10", today()), date(2025, 2, 10));
        assert_eq!(extract_date("gas 02/10/24", today()), date(2024, 2, 10));
        assert_eq!(extract_date("gas 2/10/2023", today()), date(2023, 2, 10));
    }

    #[test]
    fn test_invalid_falls_back_to_today() {
        assert_eq!(extract_date("feb 30", today()), today());
        assert_eq!(extract_date("13/40", today()), today());
        assert_eq!(extract_date("coffee", today()), today());
    }
}
