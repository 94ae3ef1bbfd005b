//! Path management for Pocketbook
//!
//! ## Path Resolution Order
//!
//! 1. Explicit override (`--data-dir` or `POCKETBOOK_DATA_DIR`)
//! 2. `./.pocketbook/` when it exists in the working directory
//! 3. The platform application-data directory (`directories::ProjectDirs`)
//!
//! Resolution happens once, when the paths are constructed.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::PocketbookError;

/// Environment variable holding an explicit data directory
pub const DATA_DIR_ENV: &str = "POCKETBOOK_DATA_DIR";

/// Name of the project-local data directory
pub const LOCAL_DIR_NAME: &str = ".pocketbook";

/// Manages all paths used by Pocketbook
#[derive(Debug, Clone)]
pub struct PocketbookPaths {
    base_dir: PathBuf,
}

impl PocketbookPaths {
    /// Resolve the data directory, honouring `POCKETBOOK_DATA_DIR`
    pub fn new() -> Result<Self, PocketbookError> {
        let from_env = std::env::var_os(DATA_DIR_ENV).map(PathBuf::from);
        Self::resolve(from_env)
    }

    /// Resolve the data directory with an optional explicit override
    pub fn resolve(override_dir: Option<PathBuf>) -> Result<Self, PocketbookError> {
        if let Some(dir) = override_dir {
            return Ok(Self { base_dir: dir });
        }

        let local = Path::new(LOCAL_DIR_NAME);
        if local.is_dir() {
            return Ok(Self {
                base_dir: local.to_path_buf(),
            });
        }

        let project = ProjectDirs::from("dev", "Pocketbook", "pocketbook").ok_or_else(|| {
            PocketbookError::Config("Could not determine platform data directory".into())
        })?;
        Ok(Self {
            base_dir: project.data_dir().to_path_buf(),
        })
    }

    /// Create paths rooted at a specific directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// The JSON document holding all state
    pub fn data_file(&self) -> PathBuf {
        self.base_dir.join("pocketbook.json")
    }

    /// Snapshot directory, next to the data file
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base and backup directories exist
    pub fn ensure_directories(&self) -> Result<(), PocketbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PocketbookError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir()).map_err(|e| {
            PocketbookError::Io(format!("Failed to create backup directory: {}", e))
        })?;

        Ok(())
    }

    /// Whether a data file has been written yet
    pub fn is_initialized(&self) -> bool {
        self.data_file().exists()
    }
}
