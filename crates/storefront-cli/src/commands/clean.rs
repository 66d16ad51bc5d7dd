use anyhow::{Context, Result};
use std::path::Path;
use storefront_browser::ScreenshotStore;

/// Remove screenshots last modified more than `days` days ago
pub fn execute(dir: &Path, days: u64) -> Result<()> {
    let store = ScreenshotStore::new(dir);
    let removed = store
        .cleanup_older_than(days)
        .with_context(|| format!("Failed to clean screenshots in {}", dir.display()))?;

    println!(
        "🧹 Removed {} screenshot(s) older than {} days from {}",
        removed,
        days,
        dir.display()
    );
    Ok(())
}
