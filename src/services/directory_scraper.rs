use crate::{
    configuration::{DirectorySelectors, DirectorySettings},
    domain::{query_parameter::QueryParameter, record::Record},
};

use super::{extract_records, wait_for_change, wait_for_presence, Browser, Locator};

/// Runs the directory search once per state and collects the records of
/// every result page, in order. A state that fails is logged and skipped;
/// records it produced before failing are kept.
pub async fn scrape_directory<B: Browser>(
    browser: &B,
    settings: &DirectorySettings,
    states: &[QueryParameter],
) -> Vec<Record> {
    let mut records = vec![];

    log::info!("Starting ABC Directory scrape of {} states", states.len());

    for state in states {
        log::info!("=== Processing {} ({}) ===", state.name, state.value);

        if let Err(e) = scrape_state(browser, settings, state, &mut records).await {
            log::error!("Error processing {}: {:?}", state.name, e);
        }
    }

    log::info!("=== Scraping Complete ===");
    log::info!("Total individuals extracted: {}", records.len());

    records
}

async fn scrape_state<B: Browser>(
    browser: &B,
    settings: &DirectorySettings,
    state: &QueryParameter,
    records: &mut Vec<Record>,
) -> anyhow::Result<()> {
    let selectors = &settings.selectors;
    let wait = &settings.wait;
    let cards = Locator::Css(selectors.card.clone());
    let pagination = Locator::Css(selectors.pagination.clone());

    browser.navigate(&settings.listing_url).await?;

    let form = wait_for_presence(
        browser,
        &selectors.state_select,
        wait.form_timeout(),
        wait.poll_interval(),
    )
    .await?;
    if form == 0 {
        anyhow::bail!("State select not found on {}", settings.listing_url);
    }

    browser
        .select_option(&selectors.state_select, &state.value)
        .await?;
    browser.click(&selectors.search_button, 0).await?;

    let result_count = wait_for_presence(
        browser,
        &cards,
        wait.results_timeout(),
        wait.poll_interval(),
    )
    .await?;
    if result_count == 0 {
        log::info!("No results found for {}", state.name);
        return Ok(());
    }
    log::info!("Found results for {}", state.name);

    let total_pages = wait_for_presence(
        browser,
        &pagination,
        wait.pagination_timeout(),
        wait.poll_interval(),
    )
    .await?
    .max(1);
    log::info!("Total pages: {}", total_pages);

    let pages = match settings.page_cap {
        Some(cap) if cap.max(1) < total_pages => {
            log::info!("Limiting {} to the first {} pages", state.name, cap.max(1));
            cap.max(1)
        }
        _ => total_pages,
    };

    let state_start = records.len();

    let page_records = extract_page(browser, selectors).await?;
    log::info!("Page 1: Extracted {} individuals", page_records.len());
    records.extend(page_records);

    for page_index in 1..pages {
        log::info!("Processing page {}...", page_index + 1);

        let controls = browser.count(&pagination).await?;
        if page_index >= controls {
            log::warn!(
                "Only {} pagination controls left for {}, stopping before page {}",
                controls,
                state.name,
                page_index + 1
            );
            break;
        }

        let before = browser.outer_html(&cards).await?;
        browser.click(&pagination, page_index).await?;

        let changed = wait_for_change(
            browser,
            &cards,
            before.as_deref(),
            wait.page_timeout(),
            wait.poll_interval(),
        )
        .await?;
        if !changed {
            log::warn!(
                "Results did not change after opening page {} for {}",
                page_index + 1,
                state.name
            );
        }

        let page_records = extract_page(browser, selectors).await?;
        log::info!(
            "Page {}: Extracted {} individuals",
            page_index + 1,
            page_records.len()
        );
        records.extend(page_records);
    }

    log::info!(
        "{} complete: {} total individuals",
        state.name,
        records.len() - state_start
    );

    if settings.log_sample {
        if let Some(sample) = records.get(state_start) {
            log::info!("Sample individual:\n{}", serde_json::to_string_pretty(sample)?);
        }
    }

    Ok(())
}

async fn extract_page<B: Browser>(
    browser: &B,
    selectors: &DirectorySelectors,
) -> anyhow::Result<Vec<Record>> {
    let source = browser.page_source().await?;
    Ok(extract_records(&source, selectors))
}
