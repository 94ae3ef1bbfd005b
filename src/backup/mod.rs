//! Backup system for Pocketbook
//!
//! Snapshots are complete copies of the data document kept in `backups/`
//! next to the data file. The newest `maxBackups` are retained.
//!
//! ```rust,ignore
//! use pocketbook::backup::{BackupManager, RestoreManager};
//!
//! let (path, _pruned) = BackupManager::new(&storage).create_backup_with_retention()?;
//! let summary = RestoreManager::new(&storage).restore_from_file(&path)?;
//! println!("{}", summary.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreSummary};
