use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::time::{self, Instant};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    Css(String),
    XPath(String),
}

/// What the scrapers need from a live browser page.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Full navigation; returns once the document has loaded.
    async fn navigate(&self, url: &str) -> anyhow::Result<()>;

    async fn select_option(&self, control: &Locator, value: &str) -> anyhow::Result<()>;

    /// Clicks the `index`th element matching `target`.
    async fn click(&self, target: &Locator, index: usize) -> anyhow::Result<()>;

    async fn count(&self, target: &Locator) -> anyhow::Result<usize>;

    /// Markup of the first element matching `target`, if any.
    async fn outer_html(&self, target: &Locator) -> anyhow::Result<Option<String>>;

    async fn page_source(&self) -> anyhow::Result<String>;

    async fn close(self) -> anyhow::Result<()>
    where
        Self: Sized;
}

/// Polls until at least one element matches `target` or `timeout` elapses.
/// Returns the last count seen, zero on timeout.
pub async fn wait_for_presence<B: Browser>(
    browser: &B,
    target: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> anyhow::Result<usize> {
    let deadline = Instant::now() + timeout;

    loop {
        let count = browser.count(target).await?;
        if count > 0 || Instant::now() >= deadline {
            return Ok(count);
        }
        time::sleep(poll_interval).await;
    }
}

/// Polls until the first element matching `target` is present and its markup
/// differs from `before`. Returns false if that did not happen within `timeout`.
pub async fn wait_for_change<B: Browser>(
    browser: &B,
    target: &Locator,
    before: Option<&str>,
    timeout: Duration,
    poll_interval: Duration,
) -> anyhow::Result<bool> {
    let deadline = Instant::now() + timeout;

    loop {
        if let Some(current) = browser.outer_html(target).await? {
            if before != Some(current.as_str()) {
                return Ok(true);
            }
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        time::sleep(poll_interval).await;
    }
}
