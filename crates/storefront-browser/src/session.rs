use crate::driver::Driver;
use crate::launcher::{ChromeLauncher, DEFAULT_DEBUGGING_PORT};
use crate::profile::BrowserProfile;
use crate::{ChromeFinder, Error, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Child;
use std::time::Duration;
use storefront_core::data::TestConfig;
use tokio::task::JoinHandle;

const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_BACKOFF: Duration = Duration::from_millis(500);

/// How to start the browser for a run.
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub chrome_path: Option<PathBuf>,
    /// Named profile directory; a throwaway profile when `None`.
    pub profile_dir: Option<PathBuf>,
    pub headless: bool,
    pub window: (u32, u32),
    pub debugging_port: u16,
    pub base_url: String,
    pub element_wait: Duration,
}

impl BrowserOptions {
    pub fn from_config(config: &TestConfig) -> Self {
        Self {
            chrome_path: None,
            profile_dir: None,
            headless: config.headless,
            window: (config.window_width, config.window_height),
            debugging_port: DEFAULT_DEBUGGING_PORT,
            base_url: config.base_url.clone(),
            element_wait: config.element_wait(),
        }
    }
}

/// A running Chrome with one page opened on the storefront.
///
/// The Chrome process is killed when the session is closed or dropped.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    chrome: Option<Child>,
    handler_task: JoinHandle<()>,
    element_wait: Duration,
    _profile: BrowserProfile,
}

impl BrowserSession {
    pub async fn start(options: &BrowserOptions) -> Result<Self> {
        let chrome_binary = ChromeFinder::new(options.chrome_path.clone()).find()?;
        tracing::info!("Using Chrome at {}", chrome_binary.display());

        let profile = match &options.profile_dir {
            Some(dir) => BrowserProfile::named(dir.clone())?,
            None => BrowserProfile::throwaway()?,
        };

        let launcher = ChromeLauncher::new(chrome_binary, profile.path().to_path_buf())
            .headless(options.headless)
            .window_size(options.window.0, options.window.1)
            .debugging_port(options.debugging_port);
        let mut chrome = launcher.launch()?;

        let (browser, mut handler) = match connect(launcher.port()).await {
            Ok(connected) => connected,
            Err(e) => {
                let _ = chrome.kill();
                return Err(e);
            }
        };

        // The handler must be polled for any CDP command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        let page = match browser.pages().await?.into_iter().next() {
            Some(page) => page,
            None => browser.new_page("about:blank").await?,
        };

        tracing::info!("Opening {}", options.base_url);
        page.goto(options.base_url.as_str()).await?;

        Ok(Self {
            browser,
            page,
            chrome: Some(chrome),
            handler_task,
            element_wait: options.element_wait,
            _profile: profile,
        })
    }

    pub fn driver(&self) -> Driver {
        Driver::new(self.page.clone(), self.element_wait)
    }

    pub async fn close(mut self) -> Result<()> {
        if let Err(e) = self.browser.close().await {
            tracing::debug!("Browser close failed, killing process: {}", e);
        }
        self.handler_task.abort();
        if let Some(mut chrome) = self.chrome.take() {
            let _ = chrome.kill();
            chrome.wait()?;
        }
        tracing::info!("Browser session closed");
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler_task.abort();
        if let Some(mut chrome) = self.chrome.take() {
            let _ = chrome.kill();
            let _ = chrome.wait();
        }
    }
}

/// Chrome may not accept connections right after spawning.
async fn connect(port: u16) -> Result<(Browser, chromiumoxide::Handler)> {
    let url = format!("http://localhost:{}", port);
    let mut attempts_left = CONNECT_ATTEMPTS;

    loop {
        tracing::debug!("Attempting CDP connection to {}...", url);
        match Browser::connect(&url).await {
            Ok(connected) => {
                tracing::info!("CDP connection established");
                return Ok(connected);
            }
            Err(e) => {
                attempts_left -= 1;
                if attempts_left == 0 {
                    return Err(Error::Cdp(format!(
                        "Failed to connect to Chrome after {} attempts: {}",
                        CONNECT_ATTEMPTS, e
                    )));
                }
                tracing::debug!("CDP connection attempt failed, retrying... ({} left)", attempts_left);
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
        }
    }
}
