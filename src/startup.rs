use std::path::PathBuf;

use chrono::{NaiveDate, Utc};

use crate::{
    cli::{Command, USAGE},
    configuration::{DirectorySettings, OutputFormat, OutputSettings, Settings},
    dal::output_file::{output_path, write_output},
    services::{
        markdown_preview, scrape_directory, scrape_page, to_csv, to_json, Browser, Droid,
        FirecrawlClient,
    },
};

pub async fn run(command: Command, settings: Settings) -> anyhow::Result<()> {
    match command {
        Command::Directory => run_directory(settings).await,
        Command::Page { url } => run_page(settings, &url).await,
        Command::FirecrawlScrape { url } => {
            let client = FirecrawlClient::from_key(settings.api_keys.firecrawl)?;
            let page = client.scrape_url(&url).await?;
            log::info!("Scrape successful!");
            log::info!("Content: {}", page.markdown);
            Ok(())
        }
        Command::FirecrawlCrawl { url, limit } => {
            let client = FirecrawlClient::from_key(settings.api_keys.firecrawl)?;
            let pages = client.crawl_url(&url, limit).await?;
            log::info!("Crawl successful!");
            for (i, page) in pages.iter().enumerate() {
                log::info!(
                    "--- Page {}: {} ---\n{}",
                    i + 1,
                    page.metadata.source_url.as_deref().unwrap_or_default(),
                    markdown_preview(page)
                );
            }
            Ok(())
        }
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
    }
}

async fn run_directory(settings: Settings) -> anyhow::Result<()> {
    let droid = Droid::new(&settings.browser).await?;
    scrape_and_save(
        droid,
        &settings.directory,
        &settings.output,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(())
}

/// Scrapes every configured state, closes `browser` and writes the export.
/// A browser that fails to close is logged; the records are still written.
pub async fn scrape_and_save<B: Browser>(
    browser: B,
    directory: &DirectorySettings,
    output: &OutputSettings,
    date: NaiveDate,
) -> anyhow::Result<PathBuf> {
    let states = directory.query_parameters();
    let records = scrape_directory(&browser, directory, &states).await;
    close_browser(browser).await;

    let contents = match output.format {
        OutputFormat::Csv => to_csv(&records)?,
        OutputFormat::Json => to_json(&records)?,
    };
    let path = output_path(output, date);
    write_output(&path, &contents)?;

    log::info!("Data saved to {}", path.display());
    log::info!("Total records: {}", records.len());

    Ok(path)
}

async fn close_browser<B: Browser>(browser: B) {
    if let Err(e) = browser.close().await {
        log::error!("Failed to close browser: {:?}", e);
    }
}

async fn run_page(settings: Settings, url: &str) -> anyhow::Result<()> {
    let droid = Droid::new(&settings.browser).await?;
    let result = scrape_page(&droid, url).await;
    close_browser(droid).await;

    let summary = result?;
    log::info!("Scrape complete!");
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
