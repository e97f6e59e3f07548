//! billfold-core: domain types and pure logic for the Billfold ledger

pub mod entry;
pub mod error;
pub mod identity;
pub mod mapper;
pub mod receipt;
pub mod report;
pub mod time;

pub use entry::{IncomeEntry, LedgerEntry, StoredEntry, StoredIncome};
pub use error::Error;
pub use identity::{Anonymous, Identity, StaticIdentity};
pub use mapper::{category_for, map_entries};
pub use receipt::{ExtractedItem, ExtractionResult, ReceiptImage, ACCEPTED_MEDIA_TYPES};
pub use report::{balance, by_category, by_month, expense_total, income_total};
pub use time::today_in;
