use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::ensure_billfold_home;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreSection,
    pub llm: LlmSection,
    /// IANA timezone used to resolve "today" for ledger dates.
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub base_url: String,
    /// Project (publishable) API key; the per-user token lives in auth.json.
    pub api_key: String,
    #[serde(default = "default_expenses_table")]
    pub expenses_table: String,
    #[serde(default = "default_income_table")]
    pub income_table: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    pub model: String,
    pub base_url: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_expenses_table() -> String {
    "expenses".to_string()
}

fn default_income_table() -> String {
    "income".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreSection {
                base_url: "http://localhost:54321".to_string(),
                api_key: String::new(),
                expenses_table: default_expenses_table(),
                income_table: default_income_table(),
            },
            llm: LlmSection {
                model: "gemini-2.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com".to_string(),
            },
            timezone: default_timezone(),
        }
    }
}

impl Config {
    pub fn store_config(&self) -> billfold_store::StoreConfig {
        billfold_store::StoreConfig {
            base_url: self.store.base_url.clone(),
            api_key: self.store.api_key.clone(),
            expenses_table: self.store.expenses_table.clone(),
            income_table: self.store.income_table.clone(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_billfold_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
