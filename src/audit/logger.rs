//! Append-only audit log
//!
//! One JSON object per line. Lines that no longer parse are skipped with a
//! warning so a damaged tail never hides the rest of the history.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::{PocketbookError, PocketbookResult};

use super::entry::{AuditEntry, EntityType};

/// Which entries to return from [`AuditLogger::query`]
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    entity_type: Option<EntityType>,
    entity_id: Option<String>,
    since: Option<DateTime<Utc>>,
    limit: Option<usize>,
}

impl AuditQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Full id or a short display prefix such as `txn-1a2b`
    pub fn entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Keep only the newest `limit` matches
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, entry: &AuditEntry) -> bool {
        if self.entity_type.is_some_and(|t| entry.entity_type != t) {
            return false;
        }
        if let Some(id) = &self.entity_id {
            if !entry.entity_id.starts_with(id.as_str()) {
                return false;
            }
        }
        if self.since.is_some_and(|since| entry.timestamp < since) {
            return false;
        }
        true
    }
}

pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush it
    pub fn log(&self, entry: &AuditEntry) -> PocketbookResult<()> {
        let line = serde_json::to_string(entry).map_err(|e| {
            PocketbookError::Json(format!("Failed to serialize audit entry: {}", e))
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| PocketbookError::Io(format!("Failed to open audit log: {}", e)))?;

        writeln!(file, "{}", line)
            .and_then(|_| file.flush())
            .map_err(|e| PocketbookError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Every readable entry, oldest first
    pub fn read_all(&self) -> PocketbookResult<Vec<AuditEntry>> {
        self.query(&AuditQuery::new())
    }

    /// The newest `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> PocketbookResult<Vec<AuditEntry>> {
        self.query(&AuditQuery::new().limit(count))
    }

    /// Matching entries, oldest first
    pub fn query(&self, query: &AuditQuery) -> PocketbookResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| PocketbookError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                PocketbookError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) if query.matches(&entry) => entries.push(entry),
                Ok(_) => {}
                Err(e) => log::warn!("Skipping unreadable audit entry at line {}: {}", index + 1, e),
            }
        }

        if let Some(limit) = query.limit {
            let start = entries.len().saturating_sub(limit);
            entries.drain(..start);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        let entry = AuditEntry::create(EntityType::Transaction, "txn-1", None, &json!({"amount": 5000}));

        logger.log(&entry).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Transaction);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();
        for i in 0..10 {
            let entry = AuditEntry::create(EntityType::Insight, format!("ins-{}", i), None, &json!({}));
            logger.log(&entry).unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].entity_id, "ins-7");
        assert_eq!(recent[2].entity_id, "ins-9");
    }

    #[test]
    fn test_query_by_entity() {
        let (logger, _temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(EntityType::Goal, "goal-aaaa1111", None, &json!({})))
            .unwrap();
        logger
            .log(&AuditEntry::create(EntityType::Budget, "bud-bbbb2222", None, &json!({})))
            .unwrap();
        logger
            .log(&AuditEntry::delete(EntityType::Goal, "goal-cccc3333", None, &json!({})))
            .unwrap();

        let goals = logger.query(&AuditQuery::new().entity_type(EntityType::Goal)).unwrap();
        assert_eq!(goals.len(), 2);

        let one = logger.query(&AuditQuery::new().entity_id("goal-cccc")).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].operation, Operation::Delete);

        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(logger.query(&AuditQuery::new().since(future)).unwrap().is_empty());
    }

    #[test]
    fn test_skips_damaged_lines() {
        let (logger, temp) = create_test_logger();
        logger
            .log(&AuditEntry::create(EntityType::Category, "cat-1", None, &json!({})))
            .unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap();
        writeln!(file, "{{ not json").unwrap();

        logger
            .log(&AuditEntry::create(EntityType::Category, "cat-2", None, &json!({})))
            .unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].entity_id, "cat-2");
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }
}
