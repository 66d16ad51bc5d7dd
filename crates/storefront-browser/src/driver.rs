use crate::locator::{Locator, LocatorChain};
use crate::{Error, Result};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const IS_DISPLAYED_JS: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    const style = window.getComputedStyle(this); \
    return rect.width > 0 && rect.height > 0 \
        && style.visibility !== 'hidden' && style.display !== 'none'; }";

const CLEAR_VALUE_JS: &str = "function() { this.value = ''; }";

/// Bounded-wait element operations on one page.
///
/// Lookups poll the DOM until the element appears or the wait expires.
#[derive(Clone)]
pub struct Driver {
    page: Page,
    wait: Duration,
}

impl Driver {
    pub fn new(page: Page, wait: Duration) -> Self {
        Self { page, wait }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Default bound on element lookups.
    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.page.goto(url).await?;
        Ok(())
    }

    /// Elements currently matching, without waiting.
    pub async fn find_all(&self, locator: &Locator) -> Result<Vec<Element>> {
        let found = match locator {
            Locator::Css(selector) => self.page.find_elements(selector.as_str()).await,
            Locator::XPath(_) | Locator::LinkText(_) => {
                let xpath = locator.as_xpath().unwrap_or_default();
                self.page.find_xpaths(xpath).await
            }
        };

        match found {
            Ok(elements) => Ok(elements),
            Err(e) => {
                tracing::trace!("No match for {}: {}", locator, e);
                Ok(Vec::new())
            }
        }
    }

    pub async fn find(&self, locator: &Locator) -> Result<Element> {
        self.find_within(locator, self.wait).await
    }

    pub async fn find_within(&self, locator: &Locator, limit: Duration) -> Result<Element> {
        let deadline = Instant::now() + limit;
        loop {
            if let Some(element) = self.find_all(locator).await?.into_iter().next() {
                tracing::debug!("Found element: {}", locator);
                return Ok(element);
            }
            if Instant::now() >= deadline {
                tracing::debug!("Element not found within {:?}: {}", limit, locator);
                return Err(Error::ElementNotFound {
                    locator: locator.to_string(),
                    waited: limit,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn first_displayed(&self, locator: &Locator) -> Result<Option<Element>> {
        for element in self.find_all(locator).await? {
            if is_displayed(&element).await {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Wait for a displayed match, failing once the default wait expires.
    pub async fn find_visible(&self, locator: &Locator) -> Result<Element> {
        let deadline = Instant::now() + self.wait;
        loop {
            if let Some(element) = self.first_displayed(locator).await? {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                tracing::error!("Element not visible within {:?}: {}", self.wait, locator);
                return Err(Error::ElementNotFound {
                    locator: locator.to_string(),
                    waited: self.wait,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Wait up to `limit` for a displayed match. `false` when none appeared.
    pub async fn wait_visible(&self, locator: &Locator, limit: Duration) -> Result<bool> {
        let deadline = Instant::now() + limit;
        loop {
            if self.first_displayed(locator).await?.is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    pub async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        Ok(self.first_displayed(locator).await?.is_some())
    }

    pub async fn click(&self, locator: &Locator) -> Result<()> {
        let element = self.find_visible(locator).await?;
        element.scroll_into_view().await?;
        element.click().await?;
        tracing::info!("Clicked element: {}", locator);
        Ok(())
    }

    /// Click the `index`-th current match, without waiting.
    pub async fn click_nth(&self, locator: &Locator, index: usize) -> Result<()> {
        let element = self
            .find_all(locator)
            .await?
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::ElementNotFound {
                locator: format!("{}[{}]", locator, index),
                waited: Duration::ZERO,
            })?;
        element.scroll_into_view().await?;
        element.click().await?;
        tracing::info!("Clicked element {} of {}", index, locator);
        Ok(())
    }

    /// Click something that loads a new document and wait for it to finish.
    pub async fn click_and_wait(&self, locator: &Locator) -> Result<()> {
        self.click(locator).await?;
        match tokio::time::timeout(self.wait, self.page.wait_for_navigation()).await {
            Ok(result) => {
                result?;
            }
            Err(_) => tracing::warn!("Navigation after {} did not finish within {:?}", locator, self.wait),
        }
        Ok(())
    }

    /// Replace the value of an input with `text`.
    pub async fn type_text(&self, locator: &Locator, text: &str) -> Result<()> {
        let element = self.find_visible(locator).await?;
        element.call_js_fn(CLEAR_VALUE_JS, false).await?;
        element.click().await?;
        element.type_str(text).await?;
        tracing::info!("Sent keys to element: {}", locator);
        Ok(())
    }

    /// Choose the `<select>` option whose visible text equals `option`.
    pub async fn select_by_text(&self, locator: &Locator, option: &str) -> Result<()> {
        let element = self.find_visible(locator).await?;
        let wanted = serde_json::to_string(option)
            .map_err(|e| Error::Browser(format!("Cannot encode option text: {}", e)))?;
        let script = format!(
            "function() {{ \
                const wanted = {}; \
                const match = Array.from(this.options).find(o => o.text.trim() === wanted); \
                if (!match) return false; \
                this.value = match.value; \
                this.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                return true; }}",
            wanted
        );

        let selected = element
            .call_js_fn(script, false)
            .await?
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if !selected {
            return Err(Error::OptionNotFound {
                locator: locator.to_string(),
                option: option.to_string(),
            });
        }

        tracing::info!("Selected '{}' in {}", option, locator);
        Ok(())
    }

    pub async fn text(&self, locator: &Locator) -> Result<String> {
        let element = self.find(locator).await?;
        element_text(&element).await
    }

    /// Text of every current match, without waiting.
    pub async fn texts(&self, locator: &Locator) -> Result<Vec<String>> {
        let mut texts = Vec::new();
        for element in self.find_all(locator).await? {
            texts.push(element_text(&element).await?);
        }
        Ok(texts)
    }

    pub async fn count(&self, locator: &Locator) -> Result<usize> {
        let count = self.find_all(locator).await?.len();
        tracing::debug!("Found {} elements: {}", count, locator);
        Ok(count)
    }

    /// First non-empty text produced by the chain, giving each entry `limit`.
    pub async fn first_text(&self, chain: &LocatorChain, limit: Duration) -> Result<Option<String>> {
        for locator in chain.iter() {
            let element = match self.find_within(locator, limit).await {
                Ok(element) => element,
                Err(Error::ElementNotFound { .. }) => continue,
                Err(e) => return Err(e),
            };
            let text = element_text(&element).await?;
            if !text.is_empty() {
                tracing::debug!("Read '{}' via {}", text, locator);
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    pub async fn screenshot(&self, path: &Path) -> Result<()> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page.save_screenshot(params, path).await?;
        Ok(())
    }
}

async fn is_displayed(element: &Element) -> bool {
    match element.call_js_fn(IS_DISPLAYED_JS, false).await {
        Ok(returns) => returns
            .result
            .value
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
        Err(e) => {
            tracing::trace!("Visibility check failed: {}", e);
            false
        }
    }
}

async fn element_text(element: &Element) -> Result<String> {
    Ok(element
        .inner_text()
        .await?
        .map(|t| t.trim().to_string())
        .unwrap_or_default())
}
