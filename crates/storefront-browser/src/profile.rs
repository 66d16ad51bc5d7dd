use crate::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Chrome user-data directory for one run.
///
/// A throwaway profile gives every run a clean session with no leftover
/// cookies; a named profile keeps its state between runs.
pub enum BrowserProfile {
    Throwaway(TempDir),
    Named(PathBuf),
}

impl BrowserProfile {
    /// Fresh profile removed when the value is dropped
    pub fn throwaway() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("storefront-e2e-").tempdir()?;
        tracing::debug!("Using throwaway Chrome profile at {}", dir.path().display());
        Ok(BrowserProfile::Throwaway(dir))
    }

    /// Profile kept at `path`, created when missing
    pub fn named(path: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&path)?;
        tracing::debug!("Using Chrome profile at {}", path.display());
        Ok(BrowserProfile::Named(path))
    }

    pub fn path(&self) -> &Path {
        match self {
            BrowserProfile::Throwaway(dir) => dir.path(),
            BrowserProfile::Named(path) => path,
        }
    }

    pub fn is_throwaway(&self) -> bool {
        matches!(self, BrowserProfile::Throwaway(_))
    }
}
