mod common;

use assert_cmd::Command;
use common::{TestWorkspace, row_count};
use predicates::prelude::*;

fn binary() -> Command {
    Command::cargo_bin("retail-ingest").expect("binary under test")
}

const DEMAND_CSV: &str = "\
Product ID,Store ID,Date,Sales Quantity\n\
101,5,1/5/2024,20\n";

#[test]
fn init_then_ingest_loads_all_datasets() {
    let ws = TestWorkspace::new();
    let db = ws.path().join("retail_data.db");
    ws.write("demand_forecast.csv", DEMAND_CSV);
    ws.write(
        "inventory_monitoring.csv",
        "Product ID,Store ID,Stock Levels\n101,5,40\n",
    );
    ws.write(
        "pricing_optimization.csv",
        "Product ID,Store ID,Price\n101,5,19.99\n",
    );

    binary().arg("init").arg("--db").arg(&db).assert().success();
    binary()
        .arg("ingest")
        .arg("--db")
        .arg(&db)
        .arg("--data-dir")
        .arg(ws.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall status: Success"));
    assert_eq!(row_count(&db, "demand_forecast"), 1);
}

#[test]
fn ingest_exits_nonzero_on_partial_failure() {
    let ws = TestWorkspace::new();
    let db = ws.path().join("retail_data.db");
    // Only one of the three dataset files exists.
    ws.write("demand_forecast.csv", DEMAND_CSV);

    binary().arg("init").arg("--db").arg(&db).assert().success();
    binary()
        .arg("ingest")
        .arg("--db")
        .arg(&db)
        .arg("--data-dir")
        .arg(ws.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Partial or Failed"));
}

#[test]
fn ingest_emits_json_report_on_request() {
    let ws = TestWorkspace::new();
    let db = ws.path().join("retail_data.db");
    ws.write("demand_forecast.csv", DEMAND_CSV);

    binary().arg("init").arg("--db").arg(&db).assert().success();
    let assert = binary()
        .arg("ingest")
        .arg("--db")
        .arg(&db)
        .arg("--data-dir")
        .arg(ws.path())
        .arg("--json")
        .assert()
        .failure();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON report");
    assert_eq!(report["status"], "Partial or Failed");
    assert_eq!(report["datasets"][0]["success"], true);
}

#[test]
fn price_lookup_rejects_url_without_selector() {
    binary()
        .arg("price")
        .arg("SKU-1")
        .arg("--url")
        .arg("https://competitor.example/p/{product_id}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--selector"));
}

#[test]
fn simulated_price_lookup_prints_a_price() {
    binary()
        .arg("price")
        .arg("SKU-1")
        .arg("--failure-probability")
        .arg("0")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^\d+\.\d{2}\n$").unwrap());
}
