use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Executable names looked up on `PATH` before the fixed install locations.
const PATH_CANDIDATES: [&str; 4] = ["google-chrome", "google-chrome-stable", "chromium", "chromium-browser"];

/// Locates the Chrome binary that drives the checkout run
pub struct ChromeFinder {
    custom_path: Option<PathBuf>,
}

impl ChromeFinder {
    pub fn new(custom_path: Option<PathBuf>) -> Self {
        Self { custom_path }
    }

    /// An explicit path wins and must be valid; otherwise `PATH`, then install locations.
    pub fn find(&self) -> Result<PathBuf> {
        if let Some(path) = &self.custom_path {
            return validate_executable(path);
        }

        for name in PATH_CANDIDATES {
            if let Ok(path) = which::which(name) {
                tracing::debug!("Found {} on PATH at {}", name, path.display());
                return Ok(path);
            }
        }

        let installs = install_locations();
        if let Some(path) = installs.iter().find_map(|p| validate_executable(p).ok()) {
            return Ok(path);
        }

        Err(Error::Browser(format!(
            "Chrome not found on PATH ({}) or at: {}. Use --chrome-path or CHROME_PATH to specify location.",
            PATH_CANDIDATES.join(", "),
            installs
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

fn install_locations() -> Vec<PathBuf> {
    #[cfg(target_os = "macos")]
    return vec![
        PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"),
        PathBuf::from("/Applications/Chromium.app/Contents/MacOS/Chromium"),
    ];

    #[cfg(target_os = "linux")]
    return vec![
        PathBuf::from("/usr/bin/google-chrome"),
        PathBuf::from("/usr/bin/chromium"),
        PathBuf::from("/usr/bin/chromium-browser"),
        PathBuf::from("/snap/bin/chromium"),
    ];

    #[cfg(target_os = "windows")]
    return vec![
        PathBuf::from(r"C:\Program Files\Google\Chrome\Application\chrome.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe"),
    ];

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    return vec![];
}

fn validate_executable(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(Error::Browser(format!("Chrome not found at: {}", path.display())));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(path)?.permissions().mode();
        if mode & 0o111 == 0 {
            return Err(Error::Browser(format!(
                "Chrome binary not executable: {}",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_executable_is_used() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let found = ChromeFinder::new(Some(path.to_path_buf())).find().unwrap();
        assert_eq!(found, path);
    }

    #[test]
    fn test_missing_custom_path_is_an_error() {
        let err = ChromeFinder::new(Some(PathBuf::from("/nonexistent/chrome")))
            .find()
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_directory_is_not_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let result = ChromeFinder::new(Some(dir.path().to_path_buf())).find();
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_file_is_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        let err = ChromeFinder::new(Some(temp.path().to_path_buf()))
            .find()
            .unwrap_err();
        assert!(err.to_string().contains("not executable"));
    }
}
