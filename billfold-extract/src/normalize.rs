//! Trust boundary for the extraction service's free-form reply.
//!
//! The model is told to return bare JSON, but replies often arrive wrapped
//! in markdown code fences or with stray prose. Strategy: strip known fence
//! tokens, trim, parse. Anything beyond that is reject-and-report — guessing
//! at malformed financial data is worse than refusing it.

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use billfold_core::receipt::{ExtractedItem, ExtractionResult};
use billfold_core::Error;

#[derive(Deserialize)]
struct RawResult {
    #[serde(default)]
    date: Value,
    #[serde(default)]
    items: Vec<Value>,
}

/// Normalize raw service text into a validated [`ExtractionResult`].
///
/// Items that cannot be coerced are dropped and counted in `skipped`. If
/// nothing survives, the scan reports empty rather than succeeding with an
/// empty list.
pub fn normalize(raw: &str) -> Result<ExtractionResult, Error> {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let parsed: RawResult = serde_json::from_str(cleaned).map_err(|e| {
        debug!(error = %e, "extraction reply failed to parse");
        Error::MalformedResponse {
            raw: raw.to_string(),
        }
    })?;

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for value in &parsed.items {
        match coerce_item(value) {
            Some(item) => items.push(item),
            None => skipped += 1,
        }
    }

    if items.is_empty() {
        return Err(Error::EmptyExtraction);
    }

    if skipped > 0 {
        debug!(skipped, kept = items.len(), "dropped unusable line items");
    }

    Ok(ExtractionResult {
        date: parse_iso_date(&parsed.date),
        items,
        skipped,
    })
}

/// Coerce one untrusted `items` element. Requires a non-empty name and a
/// non-negative price; quantity defaults to 1 rather than failing the item.
fn coerce_item(value: &Value) -> Option<ExtractedItem> {
    let obj = value.as_object()?;
    let name = obj.get("item")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    let price = coerce_price(obj.get("price")?)?;
    let quantity = coerce_quantity(obj.get("quantity"));

    Some(ExtractedItem {
        name: name.to_string(),
        quantity,
        price,
    })
}

fn coerce_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Quantity must be a whole number >= 1; anything else becomes 1. Never 0 or
/// negative in output.
fn coerce_quantity(value: Option<&Value>) -> u32 {
    let Some(value) = value else { return 1 };
    let qty = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match qty {
        Some(q) if q >= 1.0 && q.fract() == 0.0 && q <= u32::MAX as f64 => q as u32,
        _ => 1,
    }
}

/// A date is kept only if it is ISO-shaped AND a real calendar date;
/// anything else falls through to the mapper's today-fallback.
fn parse_iso_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    let shape = Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok()?;
    if !shape.is_match(s) {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_reply_normalizes() {
        let raw = "```json\n{\"date\":\"2024-03-01\",\"items\":[{\"item\":\"Milk\",\"quantity\":2,\"price\":3.5}]}\n```";
        let result = normalize(raw).unwrap();
        assert_eq!(result.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].name, "Milk");
        assert_eq!(result.items[0].quantity, 2);
        assert_eq!(result.items[0].price, 3.5);
        assert_eq!(result.skipped, 0);
    }

    #[test]
    fn test_fenced_and_unfenced_agree() {
        let bare = "{\"date\":\"2024-03-01\",\"items\":[{\"item\":\"Milk\",\"quantity\":2,\"price\":3.5}]}";
        let fenced = format!("```json\n{bare}\n```");
        assert_eq!(normalize(bare).unwrap(), normalize(&fenced).unwrap());
    }

    #[test]
    fn test_negative_price_item_is_excluded() {
        let raw = "{\"date\":null,\"items\":[{\"item\":\"Bread\",\"price\":-1}]}";
        let err = normalize(raw).unwrap_err();
        assert!(matches!(err, Error::EmptyExtraction));
    }

    #[test]
    fn test_bad_items_are_counted_not_silently_dropped() {
        let raw = r#"{"items":[
            {"item":"Milk","price":3.5},
            {"item":"","price":1.0},
            {"item":"Eggs","price":"oops"},
            "not an object"
        ]}"#;
        let result = normalize(raw).unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn test_price_as_numeric_string_is_accepted() {
        let raw = r#"{"items":[{"item":"Milk","price":"3.50"}]}"#;
        let result = normalize(raw).unwrap();
        assert_eq!(result.items[0].price, 3.5);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let raw = r#"{"items":[
            {"item":"A","price":1.0},
            {"item":"B","price":1.0,"quantity":0},
            {"item":"C","price":1.0,"quantity":-3},
            {"item":"D","price":1.0,"quantity":2.5}
        ]}"#;
        let result = normalize(raw).unwrap();
        assert!(result.items.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn test_quantity_kept_when_valid() {
        let raw = r#"{"items":[{"item":"A","price":1.0,"quantity":4}]}"#;
        assert_eq!(normalize(raw).unwrap().items[0].quantity, 4);
    }

    #[test]
    fn test_unparsable_reply_reports_malformed_with_raw_text() {
        let raw = "Sorry, I couldn't read that receipt.";
        match normalize(raw).unwrap_err() {
            Error::MalformedResponse { raw: kept } => assert_eq!(kept, raw),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_items_is_empty_extraction_not_success() {
        let raw = r#"{"date":"2024-03-01","items":[]}"#;
        assert!(matches!(normalize(raw).unwrap_err(), Error::EmptyExtraction));
    }

    #[test]
    fn test_garbage_date_becomes_null() {
        for date in ["03/01/2024", "yesterday", "2024-3-1", "2024-02-31"] {
            let raw = format!(
                "{{\"date\":\"{date}\",\"items\":[{{\"item\":\"Milk\",\"price\":1.0}}]}}"
            );
            let result = normalize(&raw).unwrap();
            assert_eq!(result.date, None, "date {date:?} should be dropped");
        }
    }

    #[test]
    fn test_non_string_date_becomes_null() {
        let raw = r#"{"date":20240301,"items":[{"item":"Milk","price":1.0}]}"#;
        assert_eq!(normalize(raw).unwrap().date, None);
    }
}
