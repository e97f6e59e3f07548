//! Receipt scan types: the transient uploaded image and the validated
//! extraction output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Media types the extraction service accepts.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/webp", "image/heic"];

/// An uploaded receipt image. Lives only for the duration of one extraction
/// request and is never persisted here.
#[derive(Debug, Clone)]
pub struct ReceiptImage {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

impl ReceiptImage {
    pub fn new(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            bytes,
            media_type: media_type.into(),
        }
    }

    pub fn is_supported(&self) -> bool {
        ACCEPTED_MEDIA_TYPES.contains(&self.media_type.as_str())
    }

    /// Media type for a file extension, for callers reading images off disk.
    pub fn media_type_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "heic" => Some("image/heic"),
            _ => None,
        }
    }
}

/// One purchased item pulled off a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    /// Always >= 1; defaults to 1 when the receipt doesn't show one.
    pub quantity: u32,
    /// Always finite and >= 0.
    pub price: f64,
}

/// Validated output of the normalizer.
///
/// `skipped` counts line items dropped during validation — dropping is
/// reported, never silent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub date: Option<NaiveDate>,
    pub items: Vec<ExtractedItem>,
    pub skipped: usize,
}
