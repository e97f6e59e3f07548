//! Batch commit: the full candidate list lands in one store write, or none
//! of it does.

use tracing::info;

use billfold_core::{Error, Identity, LedgerEntry};

use crate::LedgerStore;

/// Commits reviewed candidate entries on explicit user confirmation.
pub struct CommitCoordinator<'a, S: LedgerStore + ?Sized> {
    store: &'a S,
    identity: &'a dyn Identity,
}

impl<'a, S: LedgerStore + ?Sized> CommitCoordinator<'a, S> {
    pub fn new(store: &'a S, identity: &'a dyn Identity) -> Self {
        Self { store, identity }
    }

    /// Write the whole batch as one bulk insert; returns the row count.
    ///
    /// The identity is re-resolved here because the session may have expired
    /// between preview and confirm. Entries not owned by the current actor
    /// reject the whole batch. On any error, nothing was committed.
    pub async fn commit(&self, entries: &[LedgerEntry]) -> Result<usize, Error> {
        let owner = self.identity.current_user().ok_or(Error::Unauthenticated)?;
        if entries.iter().any(|e| e.owner != owner) {
            return Err(Error::Unauthenticated);
        }
        if entries.is_empty() {
            return Err(Error::EmptyExtraction);
        }

        self.store.insert_entries(entries).await?;
        info!(count = entries.len(), owner = %owner, "committed ledger batch");
        Ok(entries.len())
    }
}
