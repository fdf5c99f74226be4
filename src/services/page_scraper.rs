use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use super::Browser;

#[derive(Debug, Serialize, PartialEq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: String,
    pub content: String,
    pub links: Vec<Link>,
}

pub async fn scrape_page<B: Browser>(browser: &B, url: &str) -> anyhow::Result<PageSummary> {
    log::info!("Navigating to: {}", url);
    browser.navigate(url).await?;

    let source = browser.page_source().await?;
    let summary = summarize_page(url, &source)?;

    log::info!("Page title: {}", summary.title);
    log::info!("Found {} links", summary.links.len());

    Ok(summary)
}

/// Title, body text and links of a page. Link targets are resolved against
/// `url`; anchors without an href are listed with an empty target.
pub fn summarize_page(url: &str, html: &str) -> anyhow::Result<PageSummary> {
    let base = Url::parse(url)?;
    let document = Html::parse_document(html);

    let title_selector = Selector::parse("title").unwrap();
    let body_selector = Selector::parse("body").unwrap();
    let a_tag_selector = Selector::parse("a").unwrap();

    let title = document
        .select(&title_selector)
        .next()
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let content = document
        .select(&body_selector)
        .next()
        .map(|tag| tag.text().collect())
        .unwrap_or_default();

    let links = document
        .select(&a_tag_selector)
        .map(|tag| Link {
            text: tag.text().collect(),
            href: tag
                .value()
                .attr("href")
                .and_then(|href| base.join(href).ok())
                .map(|href| href.to_string())
                .unwrap_or_default(),
        })
        .collect();

    Ok(PageSummary {
        url: url.to_string(),
        title,
        content,
        links,
    })
}
