//! End-to-end over the post-network stages: raw service text → normalized
//! items → candidate ledger entries.

use billfold_core::{map_entries, Error, StaticIdentity};
use billfold_extract::normalize;
use chrono::NaiveDate;

fn mapping_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

#[test]
fn test_fenced_receipt_becomes_ledger_candidates() {
    let raw = "```json\n{\"date\":\"2024-03-01\",\"items\":[\
               {\"item\":\"Milk 2%\",\"quantity\":2,\"price\":3.5},\
               {\"item\":\"Sourdough Bread\",\"price\":4.25}]}\n```";

    let result = normalize(raw).unwrap();
    let entries = map_entries(&result, &StaticIdentity("u1".into()), mapping_day()).unwrap();

    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].description, "Milk 2%");
    assert_eq!(entries[0].category, "Milk");
    assert_eq!(entries[0].amount, 3.5);
    assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(entries[0].owner, "u1");

    assert_eq!(entries[1].description, "Sourdough Bread");
    assert_eq!(entries[1].category, "Sourdough");
    assert_eq!(entries[1].amount, 4.25);
}

#[test]
fn test_dateless_receipt_is_recorded_on_the_mapping_day() {
    let raw = r#"{"date":null,"items":[{"item":"Coffee","price":2.75}]}"#;

    let result = normalize(raw).unwrap();
    let entries = map_entries(&result, &StaticIdentity("u1".into()), mapping_day()).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].date, mapping_day());
}

#[test]
fn test_all_items_rejected_never_reaches_mapping() {
    let raw = r#"{"date":"2024-03-01","items":[{"item":"Bread","price":-1}]}"#;
    assert!(matches!(normalize(raw).unwrap_err(), Error::EmptyExtraction));
}

#[test]
fn test_preview_is_repeatable_without_a_second_service_call() {
    let raw = r#"{"date":"2024-03-01","items":[{"item":"Milk","quantity":2,"price":3.5}]}"#;
    let result = normalize(raw).unwrap();
    let identity = StaticIdentity("u1".into());

    let first = map_entries(&result, &identity, mapping_day()).unwrap();
    let second = map_entries(&result, &identity, mapping_day()).unwrap();
    assert_eq!(first, second);
}
