//! Snapshot backups of the data document
//!
//! Each snapshot is a full copy of the document written to
//! `backups/backup-<timestamp>.json`, where the timestamp is ISO-8601 with
//! `:` and `.` replaced by `-` (e.g. `backup-2025-01-10T12-30-45-123Z.json`).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PocketbookError, PocketbookResult};
use crate::storage::{write_json_atomic, Storage};

const BACKUP_PREFIX: &str = "backup-";

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
}

/// Creates, lists and prunes snapshots for one storage
pub struct BackupManager<'a> {
    storage: &'a Storage,
    backup_dir: PathBuf,
}

impl<'a> BackupManager<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            backup_dir: storage.paths().backup_dir(),
            storage,
        }
    }

    /// Write a snapshot of the current document and record `lastBackup`
    ///
    /// Returns the path to the created file.
    pub fn create_backup(&self) -> PocketbookResult<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            PocketbookError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        let now = Utc::now();
        let backup_path = self.backup_dir.join(backup_filename(now));

        self.storage.update_settings(|s| s.last_backup = Some(now))?;
        let document = self.storage.snapshot()?;
        write_json_atomic(&backup_path, &document)?;

        log::debug!("Wrote backup {}", backup_path.display());
        Ok(backup_path)
    }

    /// Create a snapshot and then prune to the configured limit
    pub fn create_backup_with_retention(&self) -> PocketbookResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// All snapshots, newest first
    pub fn list_backups(&self) -> PocketbookResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&self.backup_dir).map_err(|e| {
            PocketbookError::Io(format!("Failed to read backup directory: {}", e))
        })? {
            let entry = entry.map_err(|e| {
                PocketbookError::Io(format!("Failed to read directory entry: {}", e))
            })?;

            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        backups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(backups)
    }

    /// Delete snapshots beyond `maxBackups`, oldest first
    pub fn enforce_retention(&self) -> PocketbookResult<Vec<PathBuf>> {
        let keep = self.storage.settings()?.max_backups;
        let mut deleted = Vec::new();

        for backup in self.list_backups()?.into_iter().skip(keep) {
            fs::remove_file(&backup.path).map_err(|e| {
                PocketbookError::Io(format!("Failed to delete old backup: {}", e))
            })?;
            log::debug!("Pruned backup {}", backup.filename);
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    pub fn get_latest_backup(&self) -> PocketbookResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Resolve `latest`, a filename in the backup directory, or a path
    pub fn resolve(&self, reference: &str) -> PocketbookResult<PathBuf> {
        if reference == "latest" {
            return self
                .get_latest_backup()?
                .map(|b| b.path)
                .ok_or_else(|| PocketbookError::NotFound {
                    entity_type: "Backup",
                    identifier: reference.to_string(),
                });
        }

        let in_dir = self.backup_dir.join(reference);
        if in_dir.exists() {
            return Ok(in_dir);
        }

        let as_path = PathBuf::from(reference);
        if as_path.exists() {
            return Ok(as_path);
        }

        Err(PocketbookError::NotFound {
            entity_type: "Backup",
            identifier: reference.to_string(),
        })
    }

    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }
}

fn backup_filename(timestamp: DateTime<Utc>) -> String {
    let iso = timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    format!("{}{}.json", BACKUP_PREFIX, iso.replace([':', '.'], "-"))
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix(BACKUP_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
    })
}

/// Parse `YYYY-MM-DDTHH-MM-SS-mmmZ`
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let (date_part, time_part) = stamp.strip_suffix('Z')?.split_once('T')?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;

    let fields: Vec<u32> = time_part
        .split('-')
        .map(|f| f.parse().ok())
        .collect::<Option<_>>()?;
    let time = match fields.as_slice() {
        [h, m, s] => NaiveTime::from_hms_opt(*h, *m, *s)?,
        [h, m, s, ms] => NaiveTime::from_hms_milli_opt(*h, *m, *s, *ms)?,
        _ => return None,
    };

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}
