//! Report formatting utilities for terminal output
//!
//! Small helpers shared by the table renderers, plus a bar chart for trend
//! series.

use crate::reports::TrendReport;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct < 0.1 && pct > 0.0 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// One bar per trend bucket, scaled to the largest expense total
pub fn format_trend_chart(report: &TrendReport, width: usize) -> String {
    let max = report
        .points
        .iter()
        .map(|p| p.expenses.as_f64())
        .fold(0.0, f64::max);

    let mut output = String::new();
    for point in &report.points {
        output.push_str(&format!(
            "{} {} {:>12}\n",
            point.date.format("%Y-%m-%d"),
            format_bar(point.expenses.as_f64(), max, width),
            point.expenses.to_string()
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Granularity, Money, Transaction};
    use chrono::{NaiveDate, Weekday};

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(5.5), "5.5%");
        assert_eq!(format_percentage(50.0), "50%");
    }

    #[test]
    fn test_format_bar() {
        let bar = format_bar(50.0, 100.0, 10);
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 5);
        assert_eq!(format_bar(0.0, 0.0, 4), "░░░░");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 5), "He...");
        assert_eq!(truncate("Hi", 5), "Hi");
        assert_eq!(truncate("Café crème", 7), "Café...");
    }

    #[test]
    fn test_trend_chart_scales_to_largest_bucket() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let txns = vec![
            Transaction::expense(Money::from_units(10), "Shopping", today),
            Transaction::expense(Money::from_units(20), "Shopping", today.pred_opt().unwrap()),
        ];
        let report = TrendReport::generate(&txns, Granularity::Daily, 3, today, Weekday::Sun);

        let chart = format_trend_chart(&report, 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(lines[2].chars().filter(|c| *c == '█').count(), 5);
    }
}
