use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn receipts(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("receipts").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("RECEIPTS_LOG")
        .arg("--data-dir")
        .arg(home.path().join("data"));
    cmd
}

#[test]
fn init_writes_header_only_ledger() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized receipts"));
    let ledger = std::fs::read_to_string(home.path().join("data").join("receipts.csv")).unwrap();
    assert_eq!(ledger.trim_end(), "id,created_at,date,vendor,total,tax,image_path,raw_text");
    assert!(home.path().join("data").join("receipts.db").exists());
    assert!(home.path().join("data").join("images").is_dir());
}

#[test]
fn scan_with_text_file_extracts_and_stores() {
    let home = tempfile::tempdir().unwrap();
    let image = home.path().join("receipt.jpg");
    let text = home.path().join("receipt.txt");
    std::fs::write(&image, b"not really a jpeg").unwrap();
    std::fs::write(&text, "Acme Corp\n2024-01-05\nTotal: $12.34\nTax: $1.00\n").unwrap();

    receipts(&home)
        .arg("scan")
        .arg(&image)
        .arg("--text-file")
        .arg(&text)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added receipt"))
        .stdout(predicate::str::contains("total:  12.34"));

    assert!(home.path().join("data").join("images").join("receipt.jpg").exists());

    receipts(&home)
        .args(["list", "--search", "ACME"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Acme Corp"))
        .stdout(predicate::str::contains("2024-01-05"));
}

#[test]
fn add_edit_show() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home)
        .args(["add", "--id", "r-1", "--vendor", "Deli", "--total", "$1,234.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added receipt r-1"));

    receipts(&home)
        .args(["edit", "r-1", "--vendor", "Corner Deli"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Corner Deli"));

    receipts(&home)
        .args(["edit", "r-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to change."));

    receipts(&home)
        .args(["show", "r-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vendor:     Corner Deli"))
        .stdout(predicate::str::contains("Total:      1234.50"));
}

#[test]
fn duplicate_id_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home).args(["add", "--id", "r-1"]).assert().success();
    receipts(&home)
        .args(["add", "--id", "r-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn unknown_receipt_fails() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Receipt not found: missing"));
    receipts(&home)
        .args(["edit", "missing", "--vendor", "X"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Receipt not found: missing"));
    receipts(&home)
        .args(["edit", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Receipt not found: missing"))
        .stdout(predicate::str::contains("Nothing to change").not());
}

#[test]
fn unknown_sort_column_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home)
        .args(["list", "--sort", "amount"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown column"));
}

#[test]
fn extract_prints_json() {
    let home = tempfile::tempdir().unwrap();
    let text = home.path().join("ocr.txt");
    std::fs::write(&text, "Acme Corp\n10.00\n12.34\n").unwrap();
    let output = receipts(&home).arg("extract").arg(&text).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["vendor"], "Acme Corp");
    assert_eq!(json["total"], "12.34");
    assert_eq!(json["date"], "");
}

#[test]
fn status_and_export() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home)
        .args(["add", "--vendor", "Deli", "--total", "10", "--tax", "0.80"])
        .assert()
        .success();
    receipts(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Receipts:   1"))
        .stdout(predicate::str::contains("Total:      $10.00"))
        .stdout(predicate::str::contains("out of date").not());

    let out = home.path().join("copy.csv");
    receipts(&home).arg("export").arg("--output").arg(&out).assert().success();
    let exported = std::fs::read_to_string(&out).unwrap();
    assert!(exported.contains("Deli"));
}

#[test]
fn rebuild_mirror_reports_rows() {
    let home = tempfile::tempdir().unwrap();
    receipts(&home).args(["add", "--vendor", "Deli"]).assert().success();
    receipts(&home)
        .arg("rebuild-mirror")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 receipts)"));
}
