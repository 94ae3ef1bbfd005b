//! User settings for Pocketbook
//!
//! Settings live inside the data document under the `config` key rather than
//! in a separate file, so a backup snapshot always carries them.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::period::weekday_from_index;

/// Current document schema version
pub const DOCUMENT_VERSION: &str = "1.0.0";

/// User settings for Pocketbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Display currency code (amounts themselves are currency-agnostic)
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether the default categories have been seeded
    #[serde(default)]
    pub default_categories: bool,

    /// When the most recent backup snapshot was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup: Option<DateTime<Utc>>,

    /// Schema version for migration support
    #[serde(default = "default_version")]
    pub version: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default)]
    pub first_day_of_week: u8,

    /// Number of backup snapshots to keep
    #[serde(default = "default_max_backups")]
    pub max_backups: usize,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

fn default_max_backups() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            date_format: default_date_format(),
            default_categories: false,
            last_backup: None,
            version: default_version(),
            first_day_of_week: 0,
            max_backups: default_max_backups(),
        }
    }
}

impl Settings {
    /// The weekday weekly windows start on
    pub fn week_start(&self) -> Weekday {
        weekday_from_index(self.first_day_of_week)
    }

    /// Currency symbol for display
    pub fn currency_symbol(&self) -> &str {
        match self.currency.as_str() {
            "USD" | "CAD" | "AUD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            "INR" => "₹",
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.week_start(), Weekday::Sun);
        assert_eq!(settings.max_backups, 10);
        assert!(settings.last_backup.is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
        assert_eq!(settings.currency, "EUR");
        assert_eq!(settings.currency_symbol(), "€");
        assert_eq!(settings.version, DOCUMENT_VERSION);
        assert_eq!(settings.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert!(value.get("dateFormat").is_some());
        assert!(value.get("defaultCategories").is_some());
        assert!(value.get("firstDayOfWeek").is_some());
    }
}
