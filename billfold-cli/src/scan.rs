//! The scan flow: image file → extraction → normalize → map → review →
//! commit. Nothing is persisted until the user explicitly confirms; walking
//! away discards the candidates.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use billfold_core::{map_entries, today_in, LedgerEntry, ReceiptImage};
use billfold_extract::{analyze, ExtractorConfig};
use billfold_store::{CommitCoordinator, RestStore};

use crate::{auth, config};

pub async fn run_scan(
    image_path: &Path,
    commit: bool,
    yes: bool,
    category: Option<String>,
) -> Result<()> {
    let cfg = config::load_config()?;
    let session = auth::load_auth()?;

    let Some(api_key) = session.vision_api_key.clone() else {
        bail!("no vision API key; run: billfold auth paste-vision-key");
    };

    let media_type = image_path
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ReceiptImage::media_type_for_extension)
        .ok_or_else(|| {
            anyhow::anyhow!("unsupported image extension: {}", image_path.display())
        })?;

    let bytes = fs::read(image_path)
        .with_context(|| format!("read {}", image_path.display()))?;
    let image = ReceiptImage::new(bytes, media_type);

    let extractor = ExtractorConfig {
        api_key,
        model: cfg.llm.model.clone(),
        base_url: cfg.llm.base_url.clone(),
    };

    println!("Scanning {} …", image_path.display());
    let result = analyze(&extractor, &image).await?;
    debug!(items = result.items.len(), skipped = result.skipped, "extraction normalized");

    if result.skipped > 0 {
        println!("Skipped {} unreadable line item(s).", result.skipped);
    }

    let today = today_in(&cfg.timezone)?;
    let mut entries = map_entries(&result, &session, today)?;
    if let Some(cat) = category {
        for e in &mut entries {
            e.category = cat.clone();
        }
    }

    print_preview(&entries);

    if !commit {
        println!("\nPreview only. Re-run with --commit to save these entries.");
        return Ok(());
    }

    if !yes && !confirm(&format!("Save {} entries? [y/N] ", entries.len()))? {
        println!("Aborted; nothing saved.");
        return Ok(());
    }

    let token = session
        .access_token
        .clone()
        .context("not signed in; run: billfold auth login")?;
    let store = RestStore::new(cfg.store_config(), token);
    let coordinator = CommitCoordinator::new(&store, &session);

    let count = coordinator.commit(&entries).await?;
    println!("Saved {count} entries.");
    Ok(())
}

fn print_preview(entries: &[LedgerEntry]) {
    println!("\n  #  DATE        CATEGORY         AMOUNT  DESCRIPTION");
    for (i, e) in entries.iter().enumerate() {
        println!(
            "{:>3}  {}  {:<15} ${:>7.2}  {}",
            i + 1,
            e.date,
            e.category,
            e.amount,
            e.description
        );
    }
    let total: f64 = entries.iter().map(|e| e.amount).sum();
    println!("{:>31} ${total:>7.2}", "total");
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(matches!(s.trim(), "y" | "Y" | "yes"))
}
