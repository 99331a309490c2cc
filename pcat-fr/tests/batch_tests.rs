//! Batch processing over real files

use std::fs;
use std::path::PathBuf;

use pcat_common::ProcessOptions;
use pcat_fr::{process_file, run_batch, FileStatus, Mode};
use serde_json::{json, Value};
use tempfile::TempDir;

fn overlapping() -> Value {
    json!({
        "priceGroups": [{
            "id": "pg-seats",
            "pricePoints": [
                {"currencyCode": "USD", "pricingRule": "SLAB", "minQuantity": 1, "maxQuantity": 3, "amount": 10},
                {"currencyCode": "USD", "pricingRule": "SLAB", "minQuantity": 3, "maxQuantity": 11, "amount": 9}
            ]
        }]
    })
}

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn read(path: &PathBuf) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_fix_rewrites_file_in_place() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "seats.json", &overlapping().to_string());

    let report = process_file(&path, &ProcessOptions::default(), Mode::Fix).unwrap();
    assert_eq!(report.points_rewritten(), 2);

    let saved = read(&path);
    let points = &saved["priceGroups"][0]["pricePoints"];
    assert_eq!(points[0]["maxQuantity"], json!(2));
    assert!(points[1].get("maxQuantity").is_none());
}

#[test]
fn test_check_mode_does_not_write() {
    let dir = TempDir::new().unwrap();
    let original = overlapping().to_string();
    let path = write(&dir, "seats.json", &original);

    let batch = run_batch(&[path.clone()], &ProcessOptions::default(), Mode::Check);
    assert!(matches!(batch.files[0].status, FileStatus::WouldChange { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_batch_continues_after_failures() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.json");
    let broken = write(&dir, "broken.json", "{ not json");
    let no_collection = write(&dir, "other.json", r#"{"products": []}"#);
    let good = write(&dir, "seats.json", &overlapping().to_string());

    let batch = run_batch(
        &[missing, broken.clone(), no_collection.clone(), good.clone()],
        &ProcessOptions::default(),
        Mode::Fix,
    );

    assert_eq!(batch.failures(), 3);
    assert_eq!(batch.changed(), 1);
    assert!(matches!(batch.files[3].status, FileStatus::Rewritten { .. }));

    // Failed files are left untouched
    assert_eq!(fs::read_to_string(&broken).unwrap(), "{ not json");
    assert_eq!(fs::read_to_string(&no_collection).unwrap(), r#"{"products": []}"#);
    assert_eq!(read(&good)["priceGroups"][0]["pricePoints"][0]["maxQuantity"], json!(2));
}

#[test]
fn test_duplicate_minimum_fails_file_without_writing() {
    let dir = TempDir::new().unwrap();
    let content = json!({"priceGroups": [{"id": "dup", "pricePoints": [
        {"currencyCode": "USD", "minQuantity": 1, "maxQuantity": 5},
        {"currencyCode": "USD", "minQuantity": 1, "maxQuantity": 10}
    ]}]})
    .to_string();
    let path = write(&dir, "dup.json", &content);

    let batch = run_batch(&[path.clone()], &ProcessOptions::default(), Mode::Fix);
    match &batch.files[0].status {
        FileStatus::Failed { error } => assert!(error.contains("duplicate minQuantity 1")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_second_run_reports_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "seats.json", &overlapping().to_string());

    run_batch(&[path.clone()], &ProcessOptions::default(), Mode::Fix);
    let batch = run_batch(&[path], &ProcessOptions::default(), Mode::Fix);
    assert!(matches!(batch.files[0].status, FileStatus::Unchanged { .. }));
}
