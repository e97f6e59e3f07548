//! Extraction client: sends a receipt image to the vision model with a
//! fixed instruction and returns the reply text verbatim.
//!
//! This layer only transports content. Interpreting the text — including an
//! empty or junk reply — belongs to the normalizer. No retries here; one
//! failed call is one failed scan.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;

use billfold_core::receipt::ReceiptImage;
use billfold_core::Error;

/// Connection settings for the vision extraction service.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl ExtractorConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// Fixed instruction sent with every receipt image.
const SCAN_PROMPT: &str = "\
Analyze this receipt image.
Extract the receipt date in YYYY-MM-DD format and every purchased item, \
its quantity (if shown) and its price.
Return ONLY one JSON object. Do not add any text before or after the JSON.
The object must have this structure:
{
  \"date\": \"YYYY-MM-DD\",
  \"items\": [
    { \"item\": \"Item name\", \"quantity\": 1, \"price\": 99.99 }
  ]
}
If a quantity is not shown, use 1.
If something cannot be read, skip it.
Do not include discounts, taxes or the total, only the items themselves.
If no date is found, use null.";

/// Send one extraction request. Fails fast on an unsupported media type,
/// before any paid call goes out.
pub async fn request_extraction(
    config: &ExtractorConfig,
    image: &ReceiptImage,
) -> Result<String, Error> {
    if !image.is_supported() {
        return Err(Error::InvalidInput(image.media_type.clone()));
    }

    #[derive(Serialize)]
    struct InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    }

    #[derive(Serialize)]
    #[serde(untagged)]
    enum Part {
        Text {
            text: String,
        },
        Image {
            #[serde(rename = "inlineData")]
            inline_data: InlineData,
        },
    }

    #[derive(Serialize)]
    struct Content {
        parts: Vec<Part>,
    }

    #[derive(Serialize)]
    struct Req {
        contents: Vec<Content>,
    }

    #[derive(Deserialize)]
    struct Resp {
        #[serde(default)]
        candidates: Vec<Candidate>,
    }

    #[derive(Deserialize)]
    struct Candidate {
        content: Option<RespContent>,
    }

    #[derive(Deserialize)]
    struct RespContent {
        #[serde(default)]
        parts: Vec<RespPart>,
    }

    #[derive(Deserialize)]
    struct RespPart {
        text: Option<String>,
    }

    let body = Req {
        contents: vec![Content {
            parts: vec![
                Part::Text {
                    text: SCAN_PROMPT.to_string(),
                },
                Part::Image {
                    inline_data: InlineData {
                        mime_type: image.media_type.clone(),
                        data: STANDARD.encode(&image.bytes),
                    },
                },
            ],
        }],
    };

    let url = format!(
        "{}/v1beta/models/{}:generateContent?key={}",
        config.base_url.trim_end_matches('/'),
        config.model,
        config.api_key
    );

    debug!(model = %config.model, bytes = image.bytes.len(), "sending extraction request");

    let client = reqwest::Client::new();
    let resp = client
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::ExtractionService(format!("request: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        return Err(Error::ExtractionService(format!("{status} {txt}")));
    }

    let out: Resp = resp
        .json()
        .await
        .map_err(|e| Error::ExtractionService(format!("decode response: {e}")))?;

    let mut text = String::new();
    for c in out.candidates {
        let Some(content) = c.content else { continue };
        for p in content.parts {
            if let Some(t) = p.text {
                text.push_str(&t);
            }
        }
    }
    Ok(text)
}
