//! Insight display formatting

use crate::models::{Insight, InsightType};

fn icon(kind: InsightType) -> &'static str {
    match kind {
        InsightType::Warning => "⚠",
        InsightType::Tip => "💡",
        InsightType::Achievement => "★",
        InsightType::Anomaly => "?",
    }
}

/// One block per insight, unread ones flagged
pub fn format_insight_list(insights: &[Insight]) -> String {
    if insights.is_empty() {
        return "No insights.\n".to_string();
    }

    let mut output = String::new();
    for insight in insights {
        let unread = if insight.is_read { "" } else { " (new)" };
        output.push_str(&format!(
            "{} [{}] {}{}  p{}  {}\n",
            icon(insight.kind),
            insight.kind,
            insight.title,
            unread,
            insight.priority,
            insight.id
        ));
        output.push_str(&format!("    {}\n", insight.message));
        if let Some(action) = &insight.suggested_action {
            output.push_str(&format!("    → {}\n", action));
        }
    }
    output
}
