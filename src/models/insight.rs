//! Insight model
//!
//! Insights form an append-only log produced by the analytics pass. The only
//! mutation after creation is toggling `is_read`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::InsightId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Warning,
    Tip,
    Achievement,
    Anomaly,
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Tip => write!(f, "tip"),
            Self::Achievement => write!(f, "achievement"),
            Self::Anomaly => write!(f, "anomaly"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: InsightId,

    #[serde(rename = "type")]
    pub kind: InsightType,

    pub title: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,

    /// 1 (lowest) to 10 (highest)
    pub priority: u8,

    #[serde(default)]
    pub is_read: bool,

    pub created_at: DateTime<Utc>,
}

impl Insight {
    pub fn new(
        kind: InsightType,
        title: impl Into<String>,
        message: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            id: InsightId::new(),
            kind,
            title: title.into(),
            message: message.into(),
            suggested_action: None,
            priority: priority.clamp(1, 10),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.title, self.message)
    }
}
