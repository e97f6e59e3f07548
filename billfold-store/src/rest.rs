//! REST client for the hosted backend's row API (PostgREST-style).
//!
//! Every request carries the project API key plus the signed-in user's
//! bearer token; the backend's row-level policies enforce ownership on its
//! side, and we still scope every read and delete by owner here.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use billfold_core::{Error, IncomeEntry, LedgerEntry, StoredEntry, StoredIncome};

use crate::LedgerStore;

/// Project-level connection settings (not per-user).
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub expenses_table: String,
    pub income_table: String,
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            expenses_table: "expenses".to_string(),
            income_table: "income".to_string(),
        }
    }
}

/// A store handle bound to one signed-in session.
pub struct RestStore {
    config: StoreConfig,
    token: String,
    client: reqwest::Client,
}

impl RestStore {
    pub fn new(config: StoreConfig, access_token: impl Into<String>) -> Self {
        Self {
            config,
            token: access_token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            table
        )
    }

    /// One bulk insert; the whole batch lands or the whole batch is rejected.
    async fn insert_rows<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), Error> {
        debug!(table, count = rows.len(), "bulk insert");
        let resp = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.token)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| Error::Persistence(format!("store request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(Error::Persistence(format!("{status} {txt}")));
        }
        Ok(())
    }

    async fn fetch_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        owner: &str,
    ) -> Result<Vec<T>, Error> {
        let owner_filter = format!("eq.{owner}");
        let resp = self
            .client
            .get(self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.token)
            .query(&[
                ("select", "*"),
                ("user_id", owner_filter.as_str()),
                ("order", "date.desc"),
            ])
            .send()
            .await
            .map_err(|e| Error::Persistence(format!("store request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(Error::Persistence(format!("{status} {txt}")));
        }

        resp.json()
            .await
            .map_err(|e| Error::Persistence(format!("decode rows: {e}")))
    }
}

#[async_trait]
impl LedgerStore for RestStore {
    async fn insert_entries(&self, entries: &[LedgerEntry]) -> Result<(), Error> {
        self.insert_rows(&self.config.expenses_table, entries)
            .await
    }

    async fn insert_income(&self, rows: &[IncomeEntry]) -> Result<(), Error> {
        self.insert_rows(&self.config.income_table, rows)
            .await
    }

    async fn entries_for(&self, owner: &str) -> Result<Vec<StoredEntry>, Error> {
        self.fetch_rows(&self.config.expenses_table, owner)
            .await
    }

    async fn income_for(&self, owner: &str) -> Result<Vec<StoredIncome>, Error> {
        self.fetch_rows(&self.config.income_table, owner)
            .await
    }

    async fn delete_entry(&self, owner: &str, id: &str) -> Result<(), Error> {
        let resp = self
            .client
            .delete(self.table_url(&self.config.expenses_table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.token)
            .query(&[("id", &format!("eq.{id}")), ("user_id", &format!("eq.{owner}"))])
            .send()
            .await
            .map_err(|e| Error::Persistence(format!("store request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(Error::Persistence(format!("{status} {txt}")));
        }
        Ok(())
    }
}
