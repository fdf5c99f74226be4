use std::{path::Path, time::Duration};

use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

use crate::{
    domain::query_parameter::{us_states, QueryParameter},
    services::Locator,
};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub directory: DirectorySettings,
    pub output: OutputSettings,
    #[serde(default)]
    pub api_keys: ApiKeys,
}

#[derive(Deserialize, Clone, Debug)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    #[serde(default)]
    pub chrome_args: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct DirectorySettings {
    pub listing_url: String,
    /// Falls back to every US state and territory when not set.
    pub states: Option<Vec<QueryParameter>>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub page_cap: Option<usize>,
    pub wait: WaitSettings,
    #[serde(default)]
    pub log_sample: bool,
    #[serde(default)]
    pub selectors: DirectorySelectors,
}

impl DirectorySettings {
    pub fn query_parameters(&self) -> Vec<QueryParameter> {
        match &self.states {
            Some(states) => states.clone(),
            None => us_states(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct WaitSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub form_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub results_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub page_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pagination_timeout_ms: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub poll_interval_ms: u64,
}

impl WaitSettings {
    pub fn form_timeout(&self) -> Duration {
        Duration::from_millis(self.form_timeout_ms)
    }

    pub fn results_timeout(&self) -> Duration {
        Duration::from_millis(self.results_timeout_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.page_timeout_ms)
    }

    /// How long to wait for pagination controls once the first results
    /// are visible. Single-page states spend all of it.
    pub fn pagination_timeout(&self) -> Duration {
        Duration::from_millis(self.pagination_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Where things live on the directory page. Card field selectors are
/// evaluated relative to a single card.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DirectorySelectors {
    pub state_select: Locator,
    pub search_button: Locator,
    pub card: String,
    pub pagination: String,
    pub name: String,
    pub header_location: String,
    pub lead_paragraphs: String,
    pub body_paragraphs: String,
}

impl Default for DirectorySelectors {
    fn default() -> Self {
        DirectorySelectors {
            state_select: Locator::XPath(
                "//label[contains(normalize-space(.), 'State')]//select".to_string(),
            ),
            search_button: Locator::XPath(
                "(//button[contains(normalize-space(.), 'Search')])[last()]".to_string(),
            ),
            card: ".directory-results-list .flex-item.flex-item--half".to_string(),
            pagination: r".bg-accent.hover\:bg-accent-alt.text-lg.w-10.h-10.font-bold.mx-1"
                .to_string(),
            name: ".bg-accent p.text-lg.font-bold".to_string(),
            header_location: ".bg-accent p.text-xs.italic".to_string(),
            lead_paragraphs: ".directory-card__body div:first-child p".to_string(),
            body_paragraphs: ".directory-card__body p".to_string(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct OutputSettings {
    pub directory: String,
    pub file_prefix: String,
    pub file_name: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApiKeys {
    pub firecrawl: Option<String>,
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> anyhow::Result<Settings> {
    let base_path = std::env::current_dir()?;
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(anyhow::Error::msg)?;

    get_configuration_from(&base_path.join("configuration"), environment)
}

pub fn get_configuration_from(
    configuration_directory: &Path,
    environment: Environment,
) -> anyhow::Result<Settings> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize::<Settings>()?)
}
