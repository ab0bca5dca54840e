//! End-to-end checks for the `quoteform` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn quoteform() -> Command {
    let mut cmd = Command::cargo_bin("quoteform").unwrap();
    cmd.env_remove("QUOTEFORM_LOG")
        .env_remove("RUST_LOG")
        .env_remove("QUOTEFORM_CUSTOMER")
        .env_remove("QUOTEFORM_RULES");
    cmd
}

#[test]
fn help_lists_subcommands() {
    quoteform()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("products"))
        .stdout(predicate::str::contains("quote"));
}

#[test]
fn products_lists_the_default_catalog() {
    quoteform()
        .arg("products")
        .assert()
        .success()
        .stdout(predicate::str::contains("ind-001"))
        .stdout(predicate::str::contains("res-001"))
        .stdout(predicate::str::contains("corp-001"));
}

#[test]
fn products_filters_by_type() {
    quoteform()
        .args(["products", "--type", "residential"])
        .assert()
        .success()
        .stdout(predicate::str::contains("res-001"))
        .stdout(predicate::str::contains("ind-001").not());
}

#[test]
fn products_rejects_inverted_range() {
    quoteform()
        .args(["products", "--min-price", "5000", "--max-price", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid price range"));
}

#[test]
fn valid_quote_prints_json_and_succeeds() {
    let output = quoteform()
        .args([
            "quote",
            "ind-001",
            "--set",
            "quantity=100",
            "--set",
            "delivery_days=30",
            "--set",
            "voltage=220",
            "--set",
            "protection_grade=IP65",
            "--json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["product_id"], "ind-001");
    assert_eq!(summary["is_valid"], true);
    assert_eq!(summary["adjustments"][0]["kind"], "volume_discount");
}

#[test]
fn invalid_quote_exits_with_status_two() {
    quoteform()
        .args(["quote", "res-001"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("erro: "));
}

#[test]
fn unknown_product_fails() {
    quoteform()
        .args(["quote", "xyz-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("xyz-999"));
}

#[test]
fn rules_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.toml");
    std::fs::write(
        &path,
        "[volume_discount]\nminimum_quantity = 2\ndiscount_percentage = 50\n",
    )
    .unwrap();

    quoteform()
        .args(["quote", "corp-001", "--set", "quantity=2", "--json", "--rules"])
        .arg(&path)
        .assert()
        .stdout(predicate::str::contains("\"base_price\": 10000.0"))
        .stdout(predicate::str::contains("\"final_price\": 5000.0"));
}

#[test]
fn missing_rules_file_is_reported() {
    quoteform()
        .args(["quote", "ind-001", "--rules", "/nonexistent/rules.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load rules"));
}
