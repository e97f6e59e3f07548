//! billfold-extract: receipt image → validated line items via an external
//! vision model.

pub mod client;
pub mod normalize;

pub use client::{request_extraction, ExtractorConfig};
pub use normalize::normalize;

use billfold_core::receipt::{ExtractionResult, ReceiptImage};
use billfold_core::Error;

/// One extraction service call, then normalization of the untrusted reply.
pub async fn analyze(
    config: &ExtractorConfig,
    image: &ReceiptImage,
) -> Result<ExtractionResult, Error> {
    let raw = client::request_extraction(config, image).await?;
    normalize::normalize(&raw)
}
