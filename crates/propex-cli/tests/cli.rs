use std::fs;
use std::path::Path;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

const LISTING: &str = "Property Address: 123 Main St\nList Price: $450,000\n3 Bedrooms\n2.5 Baths\n1800 sqft\nYear Built: 2010\n";

/// The binary with its user config directory pointed into `dir`.
fn propex(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("propex").unwrap();
    cmd.env("XDG_CONFIG_HOME", dir).env("HOME", dir);
    cmd
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn extract_listing_from_text_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("listing.txt");
    fs::write(&input, LISTING).unwrap();

    let output = propex(dir.path())
        .args(["extract", "--reference-year", "2025"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["doc_type"], "general");
    assert_eq!(result["fields"]["address"], "123 Main St");
    assert_eq!(result["fields"]["price"], 450000);
    assert_eq!(result["fields"]["beds"], 3);
    assert_eq!(result["fields"]["baths"], 2.5);
    assert_eq!(result["fields"]["sqft"], 1800);
    assert_eq!(result["fields"]["year_built"], 2010);
    assert_eq!(result["fields"]["infrastructure_score"], 80);
    assert_eq!(result["confidence"]["price"], 0.9);
    assert_eq!(result["confidence"]["infrastructure_score"], 0.7);
}

#[test]
fn extract_deed_from_stdin() {
    let dir = TempDir::new().unwrap();

    let output = propex(dir.path())
        .args(["extract", "-", "-d", "deed"])
        .write_stdin("Grantor: Jane Doe\nGrantee: John Smith\nRecorded: 03/15/2023\nNo liens on this property\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result = stdout_json(&output);
    assert_eq!(result["doc_type"], "deed");
    assert_eq!(result["fields"]["grantor"], "Jane Doe");
    assert_eq!(result["fields"]["grantee"], "John Smith");
    assert_eq!(result["fields"]["recording_date"], "2023-03-15");
    assert_eq!(result["fields"]["lien_status"], "Clear");
}

#[test]
fn extract_rejects_empty_text() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "  \n\n").unwrap();

    propex(dir.path())
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid input"));
}

#[test]
fn extract_missing_file() {
    let dir = TempDir::new().unwrap();

    propex(dir.path())
        .args(["extract", "nowhere/listing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_rejects_unknown_doc_type() {
    let dir = TempDir::new().unwrap();

    propex(dir.path())
        .args(["extract", "-", "-d", "appraisal"])
        .write_stdin(LISTING)
        .assert()
        .failure()
        .stderr(predicate::str::contains("appraisal"));
}

#[test]
fn extract_csv_output_to_file() {
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("out.csv");

    propex(dir.path())
        .args(["extract", "-", "-f", "csv", "-o"])
        .arg(&output_path)
        .write_stdin(LISTING)
        .assert()
        .success()
        .stdout(predicate::str::contains("Output written to"));

    let csv = fs::read_to_string(&output_path).unwrap();
    assert!(csv.starts_with("field,value,confidence\n"));
    assert!(csv.contains("beds,3,0.90\n"));
    assert!(csv.contains("baths,2.5,0.90\n"));
}

#[test]
fn extract_text_output_lists_inspection_grades() {
    let dir = TempDir::new().unwrap();

    propex(dir.path())
        .args(["extract", "-", "-d", "inspection", "-f", "text"])
        .write_stdin("Roof:\nShingles 12 years old, good shape\nHVAC:\nCondenser leak found\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Document type: inspection"))
        .stdout(predicate::str::is_match(r"roof_condition\s+good").unwrap())
        .stdout(predicate::str::is_match(r"hvac_condition\s+poor").unwrap())
        .stdout(predicate::str::is_match(r"roof_age\s+12").unwrap());
}

#[test]
fn batch_manifest_keeps_order_and_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("docs.json");
    fs::write(
        &manifest,
        json!({
            "documents": [
                {"id": "listing-1", "text": LISTING},
                {"id": 2, "text": "", "doc_type": "deed"},
                {"id": "mls-3", "text": "Days on Market: 21\nHOA Fee: $300", "doc_type": "mls"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let output = propex(dir.path())
        .args(["batch", "--manifest"])
        .arg(&manifest)
        .args(["-j", "2"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let response = stdout_json(&output);
    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);

    assert_eq!(results[0]["id"], "listing-1");
    assert_eq!(results[0]["fields"]["beds"], 3);
    assert!(results[0].get("error").is_none());

    assert_eq!(results[1]["id"], 2);
    assert_eq!(results[1]["fields"], json!({}));
    assert!(results[1]["error"].as_str().unwrap().contains("invalid input"));

    assert_eq!(results[2]["id"], "mls-3");
    assert_eq!(results[2]["fields"]["days_on_market"], 21);
    assert_eq!(results[2]["fields"]["hoa_fee"], 300);
}

#[test]
fn batch_manifest_reports_unreadable_entry_in_place() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("docs.json");
    fs::write(
        &manifest,
        json!({
            "documents": [
                {"id": "ok-1", "text": "3 Bedrooms"},
                {"id": "bad-2", "text": "Grantor: X", "doc_type": "appraisal"},
                {"id": "ok-3", "text": "Days on Market: 4", "doc_type": "MLS"},
                {"id": "bad-4", "text": null}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let output = propex(dir.path())
        .args(["batch", "--manifest"])
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(output.status.success());

    let response = stdout_json(&output);
    let results = response["results"].as_array().unwrap();
    let ids: Vec<&str> = results.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["ok-1", "bad-2", "ok-3", "bad-4"]);

    assert_eq!(results[0]["fields"]["beds"], 3);
    assert!(results[1]["error"].as_str().unwrap().contains("appraisal"));
    assert_eq!(results[1]["fields"], json!({}));
    assert_eq!(results[2]["fields"]["days_on_market"], 4);
    assert!(results[3]["error"].as_str().unwrap().contains("invalid input"));
}

#[test]
fn batch_timeout_is_reported_per_document() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("docs.json");
    fs::write(
        &manifest,
        json!([{"id": "slow", "text": LISTING.repeat(20_000)}]).to_string(),
    )
    .unwrap();

    let output = propex(dir.path())
        .args(["batch", "--timeout-ms", "0", "--manifest"])
        .arg(&manifest)
        .timeout(Duration::from_secs(60))
        .output()
        .unwrap();
    assert!(output.status.success());

    let response = stdout_json(&output);
    assert_eq!(response["results"][0]["id"], "slow");
    assert_eq!(response["results"][0]["error"], "timed out after 0ms");
}

#[test]
fn batch_glob_writes_output_and_summary() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir(&docs).unwrap();
    fs::write(docs.join("a.txt"), LISTING).unwrap();
    fs::write(docs.join("b.txt"), "Lot Size: 5,000 sq ft\nBuilt in 1960").unwrap();
    fs::write(docs.join("notes.json"), "{}").unwrap();

    let output_path = dir.path().join("results.json");
    let summary_path = dir.path().join("summary.csv");

    propex(dir.path())
        .arg("batch")
        .arg(format!("{}/*", docs.display()))
        .arg("-o")
        .arg(&output_path)
        .arg("--summary")
        .arg(&summary_path)
        .assert()
        .success();

    let response: Value = serde_json::from_str(&fs::read_to_string(&output_path).unwrap()).unwrap();
    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["id"], "a.txt");
    assert_eq!(results[1]["id"], "b.txt");
    assert_eq!(results[1]["fields"]["lot_size"], "5,000");
    assert_eq!(results[1]["fields"]["sqft"], 5000);
    assert_eq!(results[1]["fields"]["year_built"], 1960);

    let summary = fs::read_to_string(&summary_path).unwrap();
    let mut lines = summary.lines();
    assert_eq!(
        lines.next(),
        Some("id,status,field_count,infrastructure_score,processing_time_ms,error")
    );
    assert!(lines.next().unwrap().starts_with("a.txt,success,7,"));
    assert!(lines.next().unwrap().starts_with("b.txt,success,4,"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();

    propex(dir.path())
        .arg("batch")
        .arg(format!("{}/*.pdf", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

#[test]
fn config_init_set_get() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("propex.json");

    propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "extraction.reference_year", "2030"])
        .assert()
        .success();

    propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "get", "extraction.reference_year"])
        .assert()
        .success()
        .stdout("2030\n");

    propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["config", "set", "batch.jobs", "many"])
        .assert()
        .failure();

    // The stored reference year drives the age adjustment: built 2010 is 20 years old in 2030
    let output = propex(dir.path())
        .arg("-c")
        .arg(&config)
        .args(["extract", "-"])
        .write_stdin(LISTING)
        .output()
        .unwrap();
    assert_eq!(stdout_json(&output)["fields"]["infrastructure_score"], 70);
}
