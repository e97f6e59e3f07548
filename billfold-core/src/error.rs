//! Failure taxonomy for the receipt-to-ledger pipeline.
//!
//! Every variant is a distinct, user-displayable reason. Nothing in the
//! pipeline catches-and-ignores these; retry is a user-initiated re-run of
//! the whole flow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Rejected before any external call was made.
    #[error("unsupported image type: {0}")]
    InvalidInput(String),

    /// The extraction service call itself failed (network, timeout, non-2xx).
    #[error("extraction service failed: {0}")]
    ExtractionService(String),

    /// The service replied, but the text could not be parsed as the expected
    /// JSON shape. Carries the raw text for diagnostics.
    #[error("extraction response was not valid JSON")]
    MalformedResponse { raw: String },

    /// Parse succeeded, but no line item survived validation.
    #[error("no usable line items found on the receipt")]
    EmptyExtraction,

    /// No authenticated actor at mapping or commit time.
    #[error("not signed in")]
    Unauthenticated,

    /// The ledger store rejected the write. Surfaced verbatim to the caller.
    #[error("ledger store rejected the write: {0}")]
    Persistence(String),
}
