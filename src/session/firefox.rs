use crate::errors::{HarnessError, Result};
use crate::selector::Selector;
use crate::session::{BrowserKind, SessionOptions, WebElement, WebSession};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::key::Key;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::path::Path;
use tracing::debug;
use url::Url;

/// Gecko session over WebDriver (geckodriver).
///
/// The implicit wait is set natively on the remote end, so `find_elements`
/// already blocks up to the ceiling before returning empty.
pub struct FirefoxSession {
    client: Client,
}

impl FirefoxSession {
    pub async fn connect(options: &SessionOptions) -> Result<Self> {
        let mut caps = serde_json::map::Map::new();
        let mut args: Vec<&str> = Vec::new();
        if options.headless {
            args.push("-headless");
        }
        caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .map_err(|e| {
                HarnessError::Session(format!(
                    "failed to connect to WebDriver at {}: {}",
                    options.webdriver_url, e
                ))
            })?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                None,
                Some(options.implicit_wait),
            ))
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))?;

        client
            .set_window_size(options.window_width, options.window_height)
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl WebSession for FirefoxSession {
    type Element = FirefoxElement;

    fn kind(&self) -> BrowserKind {
        BrowserKind::Firefox
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.client
            .goto(url)
            .await
            .map_err(|e| HarnessError::Navigation(e.to_string()))
    }

    async fn find_elements(&mut self, selector: &Selector) -> Result<Vec<FirefoxElement>> {
        let css = selector.to_css();
        debug!(%selector, css, "querying document");

        let elements = self
            .client
            .find_all(Locator::Css(&css))
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))?;

        Ok(elements
            .into_iter()
            .map(|inner| FirefoxElement { inner })
            .collect())
    }

    async fn current_url(&mut self) -> Result<Url> {
        self.client
            .current_url()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn save_screenshot(&mut self, path: &Path) -> Result<()> {
        let png = self
            .client
            .screenshot()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))?;
        tokio::fs::write(path, png).await?;
        Ok(())
    }

    async fn quit(self) -> Result<()> {
        self.client
            .close()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }
}

pub struct FirefoxElement {
    inner: Element,
}

#[async_trait]
impl WebElement for FirefoxElement {
    async fn text(&self) -> Result<String> {
        self.inner
            .text()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn click(&self) -> Result<()> {
        self.inner
            .click()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        self.inner
            .send_keys(text)
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn submit(&self) -> Result<()> {
        // WebDriver has no form-submit command; Enter in the field submits
        // the enclosing form.
        let enter = char::from(Key::Enter).to_string();
        self.inner
            .send_keys(&enter)
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn is_displayed(&self) -> Result<bool> {
        self.inner
            .is_displayed()
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attr(name)
            .await
            .map_err(|e| HarnessError::Session(e.to_string()))
    }
}
