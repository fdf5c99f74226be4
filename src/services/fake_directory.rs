//! In-memory directory site for tests: a search form that leads to canned
//! result pages, served through the `Browser` trait.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use scraper::{Html, Selector};

use crate::configuration::{DirectorySelectors, DirectorySettings, WaitSettings};

use super::{Browser, Locator};

const FORM: &str = r#"<html><body>
    <label>State <select><option value="DE">Delaware</option></select></label>
    <button>Search</button>
    <div class="directory-results-list"></div>
</body></html>"#;

#[derive(Clone)]
enum View {
    Blank,
    Form { selected: Option<String> },
    Results { state: String, page: usize },
}

/// Serves a directory from canned result pages and records what was read.
pub struct FakeDirectory {
    pub results: HashMap<String, Vec<String>>,
    pub failing_select: HashSet<String>,
    pub failing_click: Option<(String, usize)>,
    pub failing_close: bool,
    /// Navigations up to this one land on a page without the search form.
    pub missing_form_visits: usize,
    /// Pagination counts up to this one report no controls.
    pub hidden_pagination_counts: usize,
    view: Mutex<View>,
    reads: Mutex<Vec<String>>,
    navigations: Mutex<usize>,
    pagination_counts: Mutex<usize>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        FakeDirectory {
            results: HashMap::new(),
            failing_select: HashSet::new(),
            failing_click: None,
            failing_close: false,
            missing_form_visits: 0,
            hidden_pagination_counts: 0,
            view: Mutex::new(View::Blank),
            reads: Mutex::new(vec![]),
            navigations: Mutex::new(0),
            pagination_counts: Mutex::new(0),
        }
    }

    /// One result page per entry, each with a pagination control per page.
    pub fn with_pages(self, state: &str, pages: &[&[&str]]) -> Self {
        let total = pages.len();
        let rendered = pages
            .iter()
            .map(|names| results_page(names, total))
            .collect();
        self.with_rendered(state, rendered)
    }

    pub fn with_rendered(mut self, state: &str, pages: Vec<String>) -> Self {
        self.results.insert(state.to_string(), pages);
        self
    }

    /// `"STATE:page"` for every page source read, 1-based.
    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    pub fn navigations(&self) -> usize {
        *self.navigations.lock().unwrap()
    }

    fn current_html(&self) -> String {
        match self.view.lock().unwrap().clone() {
            View::Blank => "<html></html>".to_string(),
            View::Form { .. } => FORM.to_string(),
            View::Results { state, page } => self
                .results
                .get(&state)
                .and_then(|pages| pages.get(page))
                .cloned()
                .unwrap_or_else(|| FORM.to_string()),
        }
    }

    fn select_css(&self, css: &str) -> Vec<String> {
        let document = Html::parse_document(&self.current_html());
        let selector = Selector::parse(css).unwrap();
        document.select(&selector).map(|e| e.html()).collect()
    }
}

/// A results page with one card per name and `controls` pagination buttons.
pub fn results_page(names: &[&str], controls: usize) -> String {
    let cards: String = names
        .iter()
        .map(|name| {
            format!(
                r#"<div class="flex-item flex-item--half">
                    <div class="bg-accent"><p class="text-lg font-bold">{}</p></div>
                    <div class="directory-card__body"><div><p>Org of {}</p></div></div>
                </div>"#,
                name, name
            )
        })
        .collect();
    let buttons: String = (1..=controls)
        .map(|n| {
            format!(
                r#"<button class="bg-accent hover:bg-accent-alt text-lg w-10 h-10 font-bold mx-1">{}</button>"#,
                n
            )
        })
        .collect();

    format!(
        r#"<html><body><div class="directory-results-list">{}</div><nav>{}</nav></body></html>"#,
        cards, buttons
    )
}

/// Directory settings with millisecond waits and the default selectors.
pub fn directory_settings(page_cap: Option<usize>) -> DirectorySettings {
    DirectorySettings {
        listing_url: "https://directory.test/abc-directory".to_string(),
        states: None,
        page_cap,
        wait: WaitSettings {
            form_timeout_ms: 20,
            results_timeout_ms: 20,
            page_timeout_ms: 20,
            pagination_timeout_ms: 20,
            poll_interval_ms: 1,
        },
        log_sample: true,
        selectors: DirectorySelectors::default(),
    }
}

#[async_trait]
impl Browser for FakeDirectory {
    async fn navigate(&self, _url: &str) -> anyhow::Result<()> {
        let visit = {
            let mut navigations = self.navigations.lock().unwrap();
            *navigations += 1;
            *navigations
        };
        *self.view.lock().unwrap() = match visit <= self.missing_form_visits {
            true => View::Blank,
            false => View::Form { selected: None },
        };
        Ok(())
    }

    async fn select_option(&self, _control: &Locator, value: &str) -> anyhow::Result<()> {
        if self.failing_select.contains(value) {
            anyhow::bail!("element not interactable");
        }
        *self.view.lock().unwrap() = View::Form {
            selected: Some(value.to_string()),
        };
        Ok(())
    }

    async fn click(&self, target: &Locator, index: usize) -> anyhow::Result<()> {
        let view = self.view.lock().unwrap().clone();
        let next = match (target, view) {
            (Locator::XPath(_), View::Form { selected: Some(state) }) => {
                View::Results { state, page: 0 }
            }
            (Locator::Css(css), View::Results { state, .. }) => {
                if self.failing_click == Some((state.clone(), index)) {
                    anyhow::bail!("click intercepted");
                }
                if index >= self.select_css(css).len() {
                    anyhow::bail!("no pagination control {}", index);
                }
                View::Results { state, page: index }
            }
            _ => anyhow::bail!("unexpected click on {:?}", target),
        };
        *self.view.lock().unwrap() = next;
        Ok(())
    }

    async fn count(&self, target: &Locator) -> anyhow::Result<usize> {
        match target {
            Locator::Css(css) => {
                if *css == DirectorySelectors::default().pagination {
                    let mut counts = self.pagination_counts.lock().unwrap();
                    *counts += 1;
                    if *counts <= self.hidden_pagination_counts {
                        return Ok(0);
                    }
                }
                Ok(self.select_css(css).len())
            }
            Locator::XPath(_) => match *self.view.lock().unwrap() {
                View::Blank => Ok(0),
                _ => Ok(1),
            },
        }
    }

    async fn outer_html(&self, target: &Locator) -> anyhow::Result<Option<String>> {
        match target {
            Locator::Css(css) => Ok(self.select_css(css).into_iter().next()),
            Locator::XPath(_) => Ok(None),
        }
    }

    async fn page_source(&self) -> anyhow::Result<String> {
        if let View::Results { state, page } = self.view.lock().unwrap().clone() {
            self.reads
                .lock()
                .unwrap()
                .push(format!("{}:{}", state, page + 1));
        }
        Ok(self.current_html())
    }

    async fn close(self) -> anyhow::Result<()>
    where
        Self: Sized,
    {
        match self.failing_close {
            true => anyhow::bail!("session not created: chrome not reachable"),
            false => Ok(()),
        }
    }
}
