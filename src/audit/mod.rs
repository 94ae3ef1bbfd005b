//! Audit logging for Pocketbook
//!
//! Every create, update and delete performed through the service layer is
//! appended to `audit.log` as a JSON line with before/after snapshots.
//!
//! ```rust,ignore
//! use pocketbook::audit::{AuditEntry, AuditLogger, EntityType};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Budget, budget.id.to_string(), Some(budget.name.clone()), &budget))?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::{AuditLogger, AuditQuery};
