//! Strongly-typed ID wrappers for all entity types
//!
//! Each entity gets its own newtype so a budget id can never be passed where
//! a goal id is expected. Display form is a short prefixed slug
//! (`txn-1a2b3c4d`) that the CLI also accepts for lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether `identifier` names this ID, either as the full UUID or
            /// as the short display slug
            pub fn matches(&self, identifier: &str) -> bool {
                let identifier = identifier.trim();
                self.0.to_string() == identifier || self.to_string() == identifier
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }
    };
}

define_id!(TransactionId, "txn-");
define_id!(BudgetId, "bud-");
define_id!(GoalId, "goal-");
define_id!(CategoryId, "cat-");
define_id!(InsightId, "ins-");
