//! Loading, processing and saving fixture documents on disk

use std::fs;

use pcat_common::{DocumentError, PriceDocument, ProcessOptions};
use serde_json::{json, Value};
use tempfile::TempDir;

const FIXTURE: &str = r#"{
  "product": "Team Plan",
  "priceGroups": [
    {
      "id": "pg-seats",
      "pricePoints": [
        {
          "currencyCode": "USD",
          "pricingRule": "SLAB",
          "pricingTier": "Standard",
          "validFrom": "2024-01-01",
          "minQuantity": 11,
          "maxQuantity": 50,
          "amount": 8.5
        },
        {
          "currencyCode": "USD",
          "pricingRule": "SLAB",
          "pricingTier": "Standard",
          "validFrom": "2024-01-01",
          "minQuantity": 1,
          "maxQuantity": 11,
          "amount": 10
        },
        {
          "currencyCode": "USD",
          "amount": 99
        }
      ]
    },
    {
      "id": "pg-empty"
    }
  ]
}
"#;

#[test]
fn test_load_process_save_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team.json");
    fs::write(&path, FIXTURE).unwrap();

    let mut doc = PriceDocument::load(&path).unwrap();
    let report = doc.process(&ProcessOptions::default()).unwrap();
    doc.save(&path).unwrap();

    assert_eq!(report.containers_seen(), 2);
    assert_eq!(report.containers_invalid(), 1);
    assert_eq!(report.points_rewritten(), 2);

    let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let points = &saved["priceGroups"][0]["pricePoints"];
    assert_eq!(points[0]["minQuantity"], json!(11));
    assert!(points[0].get("maxQuantity").is_none());
    assert_eq!(points[1]["maxQuantity"], json!(10));
    assert_eq!(points[2], json!({"currencyCode": "USD", "amount": 99}));
    assert_eq!(saved["priceGroups"][1], json!({"id": "pg-empty"}));
}

#[test]
fn test_saved_text_keeps_field_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team.json");
    fs::write(&path, FIXTURE).unwrap();

    let mut doc = PriceDocument::load(&path).unwrap();
    doc.process(&ProcessOptions::default()).unwrap();
    doc.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("{\n  \"product\": \"Team Plan\",\n  \"priceGroups\": ["));
    let min = text.find("\"minQuantity\": 1,").unwrap();
    let max = text.find("\"maxQuantity\": 10,").unwrap();
    let amount = text.find("\"amount\": 10\n").unwrap();
    assert!(min < max && max < amount);
}

#[test]
fn test_already_normalized_document_is_unchanged() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team.json");
    fs::write(&path, FIXTURE).unwrap();

    let mut doc = PriceDocument::load(&path).unwrap();
    doc.process(&ProcessOptions::default()).unwrap();
    doc.save(&path).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let mut doc = PriceDocument::load(&path).unwrap();
    let report = doc.process(&ProcessOptions::default()).unwrap();
    doc.save(&path).unwrap();

    assert!(!report.is_modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), first);
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = PriceDocument::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DocumentError::NotFound(_)));
}

#[test]
fn test_load_invalid_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"priceGroups\": [ ").unwrap();
    let err = PriceDocument::load(&path).unwrap_err();
    assert!(matches!(err, DocumentError::Parse { .. }));
    assert!(err.to_string().contains("broken.json"));
}

#[cfg(unix)]
#[test]
fn test_save_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("team.json");
    fs::write(&path, FIXTURE).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

    let mut doc = PriceDocument::load(&path).unwrap();
    doc.process(&ProcessOptions::default()).unwrap();
    doc.save(&path).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[test]
fn test_inverted_bound_is_repaired_when_rewritten() {
    let mut doc = PriceDocument::from_value(json!({"priceGroups": [{"id": "a", "pricePoints": [
        {"currencyCode": "USD", "minQuantity": 10, "maxQuantity": 5},
        {"currencyCode": "USD", "minQuantity": 20}
    ]}]}));
    let report = doc.process(&ProcessOptions::default()).unwrap();

    assert_eq!(report.points_rewritten(), 1);
    assert_eq!(
        doc.as_value()["priceGroups"][0]["pricePoints"],
        json!([
            {"currencyCode": "USD", "minQuantity": 10, "maxQuantity": 19},
            {"currencyCode": "USD", "minQuantity": 20}
        ])
    );
}

#[test]
fn test_lone_inverted_bound_fails_the_document() {
    let original = json!({"priceGroups": [{"id": "a", "pricePoints": [
        {"currencyCode": "USD", "minQuantity": 10, "maxQuantity": 5}
    ]}]});
    let mut doc = PriceDocument::from_value(original.clone());
    let err = doc.process(&ProcessOptions::default()).unwrap_err();

    assert_eq!(
        err.to_string(),
        "Container a: maxQuantity 5 is below minQuantity 10 in group USD|NONE|default|no-date"
    );
    assert_eq!(doc.into_value(), original);
}
