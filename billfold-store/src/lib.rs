//! billfold-store: hosted ledger store access and the batch commit
//! coordinator.

pub mod commit;
pub mod rest;

pub use commit::CommitCoordinator;
pub use rest::{RestStore, StoreConfig};

use async_trait::async_trait;
use billfold_core::{Error, IncomeEntry, LedgerEntry, StoredEntry, StoredIncome};

/// Read/write boundary with the persistent ledger store.
///
/// `insert_entries` is a single batch write: the store either accepts the
/// whole batch or rejects it. A reported failure means "assume nothing was
/// committed, re-attempt the whole batch" — there is no per-row outcome.
/// Reads and deletes are always owner-scoped.
#[async_trait]
pub trait LedgerStore {
    async fn insert_entries(&self, entries: &[LedgerEntry]) -> Result<(), Error>;
    async fn insert_income(&self, rows: &[IncomeEntry]) -> Result<(), Error>;
    async fn entries_for(&self, owner: &str) -> Result<Vec<StoredEntry>, Error>;
    async fn income_for(&self, owner: &str) -> Result<Vec<StoredIncome>, Error>;
    async fn delete_entry(&self, owner: &str, id: &str) -> Result<(), Error>;
}
