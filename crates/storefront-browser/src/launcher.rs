use crate::{Error, Result};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

pub const DEFAULT_DEBUGGING_PORT: u16 = 9222;

/// Flags every run passes to Chrome regardless of mode.
const STABILITY_FLAGS: [&str; 5] = [
    "--disable-extensions",
    "--disable-popup-blocking",
    "--disable-notifications",
    "--no-sandbox",
    "--disable-dev-shm-usage",
];

/// Starts the Chrome process the session attaches to over CDP
pub struct ChromeLauncher {
    chrome_path: PathBuf,
    profile_path: PathBuf,
    headless: bool,
    window: (u32, u32),
    debugging_port: u16,
}

impl ChromeLauncher {
    pub fn new(chrome_path: PathBuf, profile_path: PathBuf) -> Self {
        Self {
            chrome_path,
            profile_path,
            headless: false,
            window: (1920, 1080),
            debugging_port: DEFAULT_DEBUGGING_PORT,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window = (width, height);
        self
    }

    pub fn debugging_port(mut self, port: u16) -> Self {
        self.debugging_port = port;
        self
    }

    pub fn port(&self) -> u16 {
        self.debugging_port
    }

    pub fn launch(&self) -> Result<Child> {
        let args = self.build_args();
        tracing::debug!("Launching {} {}", self.chrome_path.display(), args.join(" "));

        Command::new(&self.chrome_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Browser(format!("Failed to launch Chrome: {}", e)))
    }

    fn build_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debugging_port),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            format!("--user-data-dir={}", self.profile_path.display()),
            format!("--window-size={},{}", self.window.0, self.window.1),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args.extend(STABILITY_FLAGS.iter().map(|f| f.to_string()));
        args.push("about:blank".to_string());
        args
    }
}
