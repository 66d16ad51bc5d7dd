use crate::Result;
use crate::driver::Driver;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 86_400;

/// Directory of PNG screenshots taken during runs.
#[derive(Debug, Clone)]
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Keep letters, digits, spaces, `_` and `-`; everything else becomes `_`.
    pub fn sanitize(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    pub fn file_name(name: &str, at: DateTime<Local>) -> String {
        let name = if name.is_empty() { "screenshot" } else { name };
        format!(
            "{}_{}.png",
            Self::sanitize(name),
            at.format("%Y%m%d_%H%M%S_%6f")
        )
    }

    pub async fn capture(&self, driver: &Driver, name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(name, Local::now()));

        driver.screenshot(&path).await?;
        tracing::info!("Screenshot captured: {}", path.display());
        Ok(path)
    }

    pub async fn capture_success(&self, driver: &Driver, test_name: &str) -> Result<PathBuf> {
        self.capture(driver, &format!("SUCCESS_{}", test_name)).await
    }

    /// Delete files last modified more than `days` whole days ago.
    ///
    /// Returns how many files were removed. A missing directory removes nothing.
    pub fn cleanup_older_than(&self, days: u64) -> Result<usize> {
        if !self.dir.is_dir() {
            return Ok(0);
        }

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let age = now
                .duration_since(metadata.modified()?)
                .unwrap_or(Duration::ZERO);
            if age.as_secs() / SECONDS_PER_DAY > days {
                std::fs::remove_file(entry.path())?;
                tracing::info!("Removed old screenshot: {}", entry.file_name().to_string_lossy());
                removed += 1;
            }
        }
        Ok(removed)
    }
}
