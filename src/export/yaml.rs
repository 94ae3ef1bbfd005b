//! YAML Export functionality
//!
//! Exports the complete document to YAML for a human-readable copy.

use std::io::Write;

use crate::error::{PocketbookError, PocketbookResult};
use crate::export::json::FullExport;
use crate::storage::Storage;

/// Export the full document to YAML
pub fn export_full_yaml<W: Write>(storage: &Storage, writer: &mut W) -> PocketbookResult<()> {
    let export = FullExport::from_storage(storage)?;

    let header = format!(
        "# Pocketbook Full Export\n\
         # Generated: {}\n\
         # App Version: {}\n\
         #\n\
         # Contains every transaction, budget and goal. Keep it somewhere private.\n\n",
        export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| PocketbookError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| PocketbookError::Export(e.to_string()))?;

    Ok(())
}

/// Parse and validate a YAML export
pub fn import_from_yaml(yaml_str: &str) -> PocketbookResult<FullExport> {
    let export: FullExport =
        serde_yaml::from_str(yaml_str).map_err(|e| PocketbookError::Import(e.to_string()))?;

    export
        .validate()
        .map_err(|issues| PocketbookError::Import(issues.join("; ")))?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PocketbookPaths;
    use crate::models::{Money, SavingsGoal, Transaction};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PocketbookPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, Storage::open(paths).unwrap())
    }

    #[test]
    fn test_yaml_export() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .goals
            .upsert(SavingsGoal::new("Emergency fund", Money::from_units(5000)))
            .unwrap();

        let mut yaml_output = Vec::new();
        export_full_yaml(&storage, &mut yaml_output).unwrap();
        let yaml_string = String::from_utf8(yaml_output).unwrap();

        assert!(yaml_string.starts_with("# Pocketbook Full Export"));
        assert!(yaml_string.contains("Emergency fund"));
        assert!(yaml_string.contains("Food & Dining"));
    }

    #[test]
    fn test_yaml_roundtrip() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .transactions
            .upsert(Transaction::expense(
                Money::from_cents(1999),
                "Entertainment",
                NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            ))
            .unwrap();

        let mut yaml_output = Vec::new();
        export_full_yaml(&storage, &mut yaml_output).unwrap();
        let yaml_string = String::from_utf8(yaml_output).unwrap();

        let imported = import_from_yaml(&yaml_string).unwrap();

        assert_eq!(imported.document.transactions.len(), 1);
        assert_eq!(imported.document.transactions[0].amount, Money::from_cents(1999));
        assert_eq!(imported.document.categories.len(), 14);
    }
}
