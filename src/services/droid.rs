use async_trait::async_trait;
use thirtyfour::{
    components::SelectElement, prelude::*, ChromiumLikeCapabilities, DesiredCapabilities,
};

use crate::configuration::BrowserSettings;

use super::{Browser, Locator};

pub struct Droid {
    pub driver: WebDriver,
}

impl Droid {
    pub async fn new(settings: &BrowserSettings) -> anyhow::Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if settings.headless {
            caps.set_headless()?;
        }
        for arg in settings.chrome_args.iter() {
            caps.add_arg(arg)?;
        }

        log::info!(
            "Starting browser session on {} (headless: {})",
            settings.webdriver_url,
            settings.headless
        );
        let driver = WebDriver::new(settings.webdriver_url.as_str(), caps).await?;
        if !settings.headless {
            driver.maximize_window().await?;
        }

        Ok(Droid { driver })
    }
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(css) => By::Css(css.clone()),
        Locator::XPath(xpath) => By::XPath(xpath.clone()),
    }
}

#[async_trait]
impl Browser for Droid {
    async fn navigate(&self, url: &str) -> anyhow::Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn select_option(&self, control: &Locator, value: &str) -> anyhow::Result<()> {
        let element = self.driver.find(by(control)).await?;
        SelectElement::new(&element)
            .await?
            .select_by_value(value)
            .await?;
        Ok(())
    }

    async fn click(&self, target: &Locator, index: usize) -> anyhow::Result<()> {
        let elements = self.driver.find_all(by(target)).await?;
        let element = elements.get(index).ok_or_else(|| {
            anyhow::anyhow!(
                "No element {} of {} matching {:?}",
                index,
                elements.len(),
                target
            )
        })?;
        element.click().await?;
        Ok(())
    }

    async fn count(&self, target: &Locator) -> anyhow::Result<usize> {
        Ok(self.driver.find_all(by(target)).await?.len())
    }

    async fn outer_html(&self, target: &Locator) -> anyhow::Result<Option<String>> {
        match self.driver.find_all(by(target)).await?.first() {
            Some(element) => Ok(Some(element.outer_html().await?)),
            None => Ok(None),
        }
    }

    async fn page_source(&self) -> anyhow::Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn close(self) -> anyhow::Result<()>
    where
        Self: Sized,
    {
        self.driver.quit().await?;
        Ok(())
    }
}
