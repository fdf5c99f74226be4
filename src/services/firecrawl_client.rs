use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::{self, Instant};

const FIRECRAWL_URL: &str = "https://api.firecrawl.dev/v1";
const FORMATS: [&str; 2] = ["markdown", "html"];
const CRAWL_POLL_INTERVAL: Duration = Duration::from_secs(2);
const CRAWL_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const PREVIEW_LEN: usize = 200;

pub struct FirecrawlClient {
    client: Client,
    api_key: String,
    url: String,
}

#[derive(Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: [&'a str; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlRequest<'a> {
    url: &'a str,
    limit: u32,
    scrape_options: ScrapeOptions<'a>,
}

#[derive(Serialize)]
struct ScrapeOptions<'a> {
    formats: [&'a str; 2],
}

#[derive(Deserialize)]
struct ScrapeResponse {
    success: bool,
    data: Option<ScrapedPage>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CrawlStarted {
    success: bool,
    id: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct CrawlStatus {
    status: String,
    #[serde(default)]
    data: Vec<ScrapedPage>,
    next: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScrapedPage {
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: Option<String>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub status_code: Option<u16>,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        FirecrawlClient {
            client: Client::new(),
            api_key,
            url: FIRECRAWL_URL.to_string(),
        }
    }

    /// Uses the configured key, falling back to `FIRECRAWL_API_KEY`.
    pub fn from_key(configured: Option<String>) -> anyhow::Result<Self> {
        let api_key = configured
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var("FIRECRAWL_API_KEY").ok())
            .ok_or_else(|| anyhow::anyhow!("No Firecrawl API key configured"))?;

        Ok(FirecrawlClient::new(api_key))
    }

    pub async fn scrape_url(&self, url: &str) -> anyhow::Result<ScrapedPage> {
        log::info!("Scraping: {}", url);

        let response: ScrapeResponse = self
            .client
            .post(format!("{}/scrape", self.url))
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                url,
                formats: FORMATS,
            })
            .send()
            .await?
            .json()
            .await?;

        match (response.success, response.data) {
            (true, Some(page)) => Ok(page),
            _ => Err(anyhow::anyhow!(
                "Firecrawl scrape failed: {}",
                response.error.unwrap_or_else(|| "no data".to_string())
            )),
        }
    }

    /// Starts a crawl job and waits for it to finish.
    pub async fn crawl_url(&self, url: &str, limit: u32) -> anyhow::Result<Vec<ScrapedPage>> {
        log::info!("Crawling: {}", url);

        let started: CrawlStarted = self
            .client
            .post(format!("{}/crawl", self.url))
            .bearer_auth(&self.api_key)
            .json(&CrawlRequest {
                url,
                limit,
                scrape_options: ScrapeOptions { formats: FORMATS },
            })
            .send()
            .await?
            .json()
            .await?;

        let id = match (started.success, started.id) {
            (true, Some(id)) => id,
            _ => anyhow::bail!(
                "Firecrawl crawl was not started: {}",
                started.error.unwrap_or_else(|| "no job id".to_string())
            ),
        };

        let deadline = Instant::now() + CRAWL_TIMEOUT;
        let mut status = self.crawl_status(&format!("{}/crawl/{}", self.url, id)).await?;

        while status.status == "scraping" {
            if Instant::now() >= deadline {
                anyhow::bail!("Crawl {} did not finish within {:?}", id, CRAWL_TIMEOUT);
            }
            time::sleep(CRAWL_POLL_INTERVAL).await;
            status = self.crawl_status(&format!("{}/crawl/{}", self.url, id)).await?;
        }

        if status.status != "completed" {
            anyhow::bail!("Crawl {} ended with status {}", id, status.status);
        }

        let mut pages = status.data;
        let mut next = status.next;
        while let Some(next_url) = next {
            let more = self.crawl_status(&next_url).await?;
            pages.extend(more.data);
            next = more.next;
        }

        log::info!("Crawled {} pages", pages.len());

        Ok(pages)
    }

    async fn crawl_status(&self, url: &str) -> anyhow::Result<CrawlStatus> {
        Ok(self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?)
    }
}

/// The first `PREVIEW_LEN` characters of the markdown followed by `...`.
pub fn markdown_preview(page: &ScrapedPage) -> String {
    let preview: String = page.markdown.chars().take(PREVIEW_LEN).collect();
    format!("{}...", preview)
}
