use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pocketbook(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pocketbook").unwrap();
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn quick_entry_understands_plain_english() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["txn", "quick", "spent $50 on groceries yesterday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("expense of $50.00 in Food & Dining"))
        .stdout(predicate::str::contains("Saved as txn-"));

    pocketbook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"));

    assert!(dir.path().join("pocketbook.json").exists());
    assert!(dir.path().join("audit.log").exists());
}

#[test]
fn quick_dry_run_saves_nothing() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["txn", "quick", "--dry-run", "received salary 3000 dollars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("income of $3000.00 in Salary"))
        .stdout(predicate::str::contains("dry run"));

    pocketbook(&dir)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn quick_entry_rejects_text_without_amount() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["txn", "quick", "hello there"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not understand"));
}

#[test]
fn add_rejects_bad_amount() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["txn", "add", "abc", "Shopping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount format"));
}

#[test]
fn default_categories_are_listed_and_protected() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"))
        .stdout(predicate::str::contains("Salary"));

    pocketbook(&dir)
        .args(["category", "add", "Pets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created expense category 'Pets'"));

    pocketbook(&dir)
        .args(["category", "delete", "Food & Dining"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be deleted"));

    pocketbook(&dir)
        .args(["category", "delete", "Pets"])
        .assert()
        .success();
}

#[test]
fn budget_warns_past_threshold() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["budget", "create", "Groceries", "Food & Dining", "500"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created monthly budget 'Groceries'"));

    pocketbook(&dir)
        .args(["txn", "add", "450", "Food & Dining", "-m", "big shop"])
        .assert()
        .success();

    pocketbook(&dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$450.00"))
        .stdout(predicate::str::contains("warning"));

    pocketbook(&dir)
        .args(["budget", "alerts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Budget 'Groceries'"));
}

#[test]
fn goal_withdrawal_cannot_exceed_balance() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["goal", "create", "Laptop", "1000"])
        .assert()
        .success();

    pocketbook(&dir)
        .args(["goal", "contribute", "Laptop", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$300.00 of $1000.00 (30.0%)"));

    pocketbook(&dir)
        .args(["goal", "withdraw", "Laptop", "500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient funds"));
}

#[test]
fn export_then_import_into_fresh_directory() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let export_file = source.path().join("export.json");

    pocketbook(&source)
        .args(["txn", "add", "25", "Transportation", "-m", "taxi"])
        .assert()
        .success();

    pocketbook(&source)
        .args(["export", "all"])
        .arg(&export_file)
        .assert()
        .success();

    pocketbook(&target)
        .args(["export", "import"])
        .arg(&export_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));

    pocketbook(&target)
        .args(["export", "import", "--force"])
        .arg(&export_file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Import complete!"));

    pocketbook(&target)
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taxi"));
}

#[test]
fn backup_create_and_list() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found."));

    pocketbook(&dir)
        .args(["backup", "create"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup created: backup-"));

    pocketbook(&dir)
        .args(["backup", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 1 backup(s)"));
}

#[test]
fn monthly_report_rejects_invalid_month() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["report", "monthly", "--year", "2025", "--month", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed"));
}

#[test]
fn history_lists_audited_changes() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes recorded yet."));

    pocketbook(&dir)
        .args(["goal", "create", "Trip", "800"])
        .assert()
        .success();

    pocketbook(&dir)
        .args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Goal"))
        .stdout(predicate::str::contains("(Trip)"));
}

#[test]
fn add_rejects_amount_above_ceiling() {
    let dir = TempDir::new().unwrap();

    pocketbook(&dir)
        .args(["txn", "add", "60000000000000000", "Shopping"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Amount too large"));

    pocketbook(&dir)
        .args(["txn", "quick", "spent $60000000000000000 on food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not understand"));
}
