//! Calendar windows for budgets and trend buckets
//!
//! Budgets never carry spending across periods: every evaluation derives the
//! window that contains the evaluation date. Weeks start on a configurable
//! weekday (see `Settings::first_day_of_week`).

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A single day
    pub fn day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// The week containing `date`, starting on `week_start`
    pub fn week_containing(date: NaiveDate, week_start: Weekday) -> Self {
        let offset = (date.weekday().num_days_from_monday() + 7
            - week_start.num_days_from_monday())
            % 7;
        let start = date - Duration::days(offset as i64);
        Self::new(start, start + Duration::days(6))
    }

    /// The calendar month containing `date`
    pub fn month_containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.day0() as i64);
        let length = days_in_month(date.year(), date.month());
        Self::new(start, start + Duration::days(length - 1))
    }

    /// An explicit calendar month; `None` if `month` is not 1-12
    pub fn month(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self::month_containing)
    }

    /// The calendar year containing `date`
    pub fn year_containing(date: NaiveDate) -> Self {
        let start = date - Duration::days(date.ordinal0() as i64);
        let length = if is_leap_year(date.year()) { 366 } else { 365 };
        Self::new(start, start + Duration::days(length - 1))
    }

    /// The calendar month before the one this range starts in
    pub fn previous_month(&self) -> Self {
        Self::month_containing(self.start - Duration::days(1))
    }

    /// Whether `date` falls in the range, both ends inclusive
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days covered (inclusive)
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// How often a budget resets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    /// The window of this period that contains `today`
    pub fn window(&self, today: NaiveDate, week_start: Weekday) -> DateRange {
        match self {
            Self::Daily => DateRange::day(today),
            Self::Weekly => DateRange::week_containing(today, week_start),
            Self::Monthly => DateRange::month_containing(today),
            Self::Yearly => DateRange::year_containing(today),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" | "annual" => Ok(Self::Yearly),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

/// Bucket size for trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// The bucket containing `today`, stepped back `steps_back` buckets
    pub fn bucket(&self, today: NaiveDate, steps_back: u32, week_start: Weekday) -> DateRange {
        match self {
            Self::Daily => DateRange::day(today - Duration::days(steps_back as i64)),
            Self::Weekly => DateRange::week_containing(
                today - Duration::weeks(steps_back as i64),
                week_start,
            ),
            Self::Monthly => {
                let mut range = DateRange::month_containing(today);
                for _ in 0..steps_back {
                    range = range.previous_month();
                }
                range
            }
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

impl FromStr for Granularity {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            _ => Err(PeriodParseError(s.to_string())),
        }
    }
}

/// Unknown period or granularity name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodParseError(pub String);

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid period: {}", self.0)
    }
}

impl std::error::Error for PeriodParseError {}

/// Map a 0-6 index (0 = Sunday) to a weekday
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub(crate) fn days_in_month(year: i32, month: u32) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_window() {
        let window = BudgetPeriod::Monthly.window(date(2024, 2, 14), Weekday::Sun);
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
    }

    #[test]
    fn test_weekly_window_respects_week_start() {
        // 2025-01-15 is a Wednesday
        let sunday = BudgetPeriod::Weekly.window(date(2025, 1, 15), Weekday::Sun);
        assert_eq!(sunday.start, date(2025, 1, 12));
        assert_eq!(sunday.end, date(2025, 1, 18));

        let monday = BudgetPeriod::Weekly.window(date(2025, 1, 15), Weekday::Mon);
        assert_eq!(monday.start, date(2025, 1, 13));
        assert_eq!(monday.end, date(2025, 1, 19));
    }

    #[test]
    fn test_weekly_window_on_week_start_day() {
        let window = DateRange::week_containing(date(2025, 1, 12), Weekday::Sun);
        assert_eq!(window.start, date(2025, 1, 12));
    }

    #[test]
    fn test_daily_and_yearly_windows() {
        let today = date(2024, 7, 4);
        assert_eq!(BudgetPeriod::Daily.window(today, Weekday::Sun), DateRange::day(today));

        let year = BudgetPeriod::Yearly.window(today, Weekday::Sun);
        assert_eq!(year.start, date(2024, 1, 1));
        assert_eq!(year.end, date(2024, 12, 31));
        assert_eq!(year.num_days(), 366);
    }

    #[test]
    fn test_previous_month_across_year() {
        let jan = DateRange::month_containing(date(2025, 1, 20));
        let dec = jan.previous_month();
        assert_eq!(dec.start, date(2024, 12, 1));
        assert_eq!(dec.end, date(2024, 12, 31));
    }

    #[test]
    fn test_explicit_month() {
        assert!(DateRange::month(2025, 13).is_none());
        let april = DateRange::month(2025, 4).unwrap();
        assert_eq!(april.end, date(2025, 4, 30));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 31));
        assert!(range.contains(date(2025, 1, 1)));
        assert!(range.contains(date(2025, 1, 31)));
        assert!(!range.contains(date(2025, 2, 1)));
    }

    #[test]
    fn test_monthly_bucket_steps_back() {
        let bucket = Granularity::Monthly.bucket(date(2025, 3, 31), 2, Weekday::Sun);
        assert_eq!(bucket.start, date(2025, 1, 1));
        assert_eq!(bucket.end, date(2025, 1, 31));
    }

    #[test]
    fn test_parse_period() {
        assert_eq!("Weekly".parse::<BudgetPeriod>().unwrap(), BudgetPeriod::Weekly);
        assert!("fortnightly".parse::<BudgetPeriod>().is_err());
        assert_eq!("month".parse::<Granularity>().unwrap(), Granularity::Monthly);
    }

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(weekday_from_index(0), Weekday::Sun);
        assert_eq!(weekday_from_index(1), Weekday::Mon);
        assert_eq!(weekday_from_index(6), Weekday::Sat);
    }
}
