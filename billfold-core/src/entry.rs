//! Ledger row types persisted to the hosted store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single expense row.
///
/// `owner` serializes as `user_id` to match the store schema. Invariants
/// upheld by the mapper: non-negative amount, exactly one owner, resolved
/// (never null) date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: NaiveDate,
    #[serde(rename = "user_id")]
    pub owner: String,
}

/// An income row. Income uses `source` where expenses use `category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub amount: f64,
    pub description: String,
    pub source: String,
    pub date: NaiveDate,
    #[serde(rename = "user_id")]
    pub owner: String,
}

/// An expense row read back from the store (id is store-assigned).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredEntry {
    pub id: String,
    #[serde(flatten)]
    pub entry: LedgerEntry,
}

/// An income row read back from the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredIncome {
    pub id: String,
    #[serde(flatten)]
    pub entry: IncomeEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_for_store() {
        let entry = LedgerEntry {
            amount: 3.5,
            description: "Milk".to_string(),
            category: "Milk".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            owner: "u1".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["user_id"], "u1");
        assert_eq!(json["date"], "2024-03-01");
        assert!(json.get("owner").is_none());
    }

    #[test]
    fn test_stored_entry_roundtrip() {
        let row = serde_json::json!({
            "id": "e-42",
            "amount": 12.0,
            "description": "Bread",
            "category": "Bread",
            "date": "2024-06-15",
            "user_id": "u1"
        });
        let stored: StoredEntry = serde_json::from_value(row).unwrap();
        assert_eq!(stored.id, "e-42");
        assert_eq!(stored.entry.owner, "u1");
        assert_eq!(
            stored.entry.date,
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
        );
    }
}
