use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use billfold_core::{report, Identity, IncomeEntry, LedgerEntry};
use billfold_store::{LedgerStore, RestStore};

mod auth;
mod config;
mod scan;
mod state;

#[derive(Parser, Debug)]
#[command(name = "billfold", version, about = "Personal-finance ledger with receipt scanning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a receipt image into candidate ledger entries
    Scan {
        /// Path to a receipt image (jpg, png, webp, heic)
        image: PathBuf,

        /// Save the entries after review (otherwise preview only)
        #[arg(long)]
        commit: bool,

        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,

        /// Override the inferred category for every entry
        #[arg(long)]
        category: Option<String>,
    },

    /// Record one expense by hand
    Add {
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,

        #[arg(long)]
        category: Option<String>,

        /// YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List your expenses, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Income records
    Income {
        #[command(subcommand)]
        command: IncomeCommand,
    },

    /// Totals, balance, and category/month breakdowns
    Report,

    /// Delete one of your expenses by id
    Delete { id: String },

    /// Sign-in and API key management
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },

    /// Config management (~/.billfold/config.toml)
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum IncomeCommand {
    /// Record one income entry
    Add {
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,

        /// Where the money came from (employer, client, …)
        #[arg(long)]
        source: String,

        /// YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List your income, newest first
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Sign in to the ledger store with email + password
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Store the vision API key used for receipt scanning
    PasteVisionKey,

    /// Show the current session
    Status,

    /// Drop the current session
    Logout,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the active config
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan {
            image,
            commit,
            yes,
            category,
        } => {
            scan::run_scan(&image, commit, yes, category).await?;
        }

        Command::Add {
            amount,
            description,
            category,
            date,
        } => {
            add_expense(amount, description, category, date).await?;
        }

        Command::List { limit } => {
            list_expenses(limit).await?;
        }

        Command::Income { command } => match command {
            IncomeCommand::Add {
                amount,
                description,
                source,
                date,
            } => {
                add_income(amount, description, source, date).await?;
            }
            IncomeCommand::List { limit } => {
                list_income(limit).await?;
            }
        },

        Command::Report => {
            print_report().await?;
        }

        Command::Delete { id } => {
            delete_expense(&id).await?;
        }

        Command::Auth { command } => match command {
            AuthCommand::Login { email } => auth::login(email).await?,
            AuthCommand::PasteVisionKey => auth::paste_vision_key()?,
            AuthCommand::Status => auth::status()?,
            AuthCommand::Logout => auth::logout()?,
        },

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

/// Open an owner-scoped store handle for the signed-in user.
fn open_store() -> Result<(RestStore, String, config::Config)> {
    let cfg = config::load_config()?;
    let session = auth::load_auth()?;
    let owner = session
        .current_user()
        .context("not signed in; run: billfold auth login")?;
    let token = session
        .access_token
        .context("not signed in; run: billfold auth login")?;
    Ok((RestStore::new(cfg.store_config(), token), owner, cfg))
}

async fn add_expense(
    amount: f64,
    description: String,
    category: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    if amount <= 0.0 {
        bail!("amount must be positive");
    }
    let description = description.trim().to_string();
    if description.is_empty() {
        bail!("description must not be empty");
    }

    let (store, owner, cfg) = open_store()?;
    let date = match date {
        Some(d) => d,
        None => billfold_core::today_in(&cfg.timezone)?,
    };

    let entry = LedgerEntry {
        amount,
        description,
        category: category.unwrap_or_else(|| "Uncategorized".to_string()),
        date,
        owner,
    };

    store.insert_entries(std::slice::from_ref(&entry)).await?;
    println!("Added ${:.2} {} on {}", entry.amount, entry.description, entry.date);
    Ok(())
}

async fn list_expenses(limit: usize) -> Result<()> {
    let (store, owner, _cfg) = open_store()?;
    let rows = store.entries_for(&owner).await?;

    println!("DATE        CATEGORY         AMOUNT  DESCRIPTION            ID");
    for row in rows.iter().take(limit) {
        println!(
            "{}  {:<15} ${:>7.2}  {:<21}  {}",
            row.entry.date, row.entry.category, row.entry.amount, row.entry.description, row.id
        );
    }
    println!("\n{} of {} entries", rows.len().min(limit), rows.len());
    Ok(())
}

async fn add_income(
    amount: f64,
    description: String,
    source: String,
    date: Option<NaiveDate>,
) -> Result<()> {
    if amount <= 0.0 {
        bail!("amount must be positive");
    }
    let description = description.trim().to_string();
    let source = source.trim().to_string();
    if description.is_empty() || source.is_empty() {
        bail!("description and source must not be empty");
    }

    let (store, owner, cfg) = open_store()?;
    let date = match date {
        Some(d) => d,
        None => billfold_core::today_in(&cfg.timezone)?,
    };

    let row = IncomeEntry {
        amount,
        description,
        source,
        date,
        owner,
    };

    store.insert_income(std::slice::from_ref(&row)).await?;
    println!("Added ${:.2} from {} on {}", row.amount, row.source, row.date);
    Ok(())
}

async fn list_income(limit: usize) -> Result<()> {
    let (store, owner, _cfg) = open_store()?;
    let rows = store.income_for(&owner).await?;

    println!("DATE        SOURCE           AMOUNT  DESCRIPTION            ID");
    for row in rows.iter().take(limit) {
        println!(
            "{}  {:<15} ${:>7.2}  {:<21}  {}",
            row.entry.date, row.entry.source, row.entry.amount, row.entry.description, row.id
        );
    }
    println!("\n{} of {} entries", rows.len().min(limit), rows.len());
    Ok(())
}

async fn print_report() -> Result<()> {
    let (store, owner, _cfg) = open_store()?;
    let expenses: Vec<LedgerEntry> = store
        .entries_for(&owner)
        .await?
        .into_iter()
        .map(|r| r.entry)
        .collect();
    let income: Vec<IncomeEntry> = store
        .income_for(&owner)
        .await?
        .into_iter()
        .map(|r| r.entry)
        .collect();

    println!("Income:   ${:>10.2}", report::income_total(&income));
    println!("Expenses: ${:>10.2}", report::expense_total(&expenses));
    println!("Balance:  ${:>10.2}", report::balance(&income, &expenses));

    let by_category = report::by_category(&expenses);
    if !by_category.is_empty() {
        println!("\nBy category:");
        for (category, total) in by_category {
            println!("  {:<18} ${:>8.2}", category, total);
        }
    }

    let by_month = report::by_month(&expenses);
    if !by_month.is_empty() {
        println!("\nBy month:");
        for (month, total) in by_month {
            println!("  {:<18} ${:>8.2}", month, total);
        }
    }

    Ok(())
}

async fn delete_expense(id: &str) -> Result<()> {
    let (store, owner, _cfg) = open_store()?;
    store.delete_entry(&owner, id).await?;
    println!("Deleted {id}");
    Ok(())
}
