use crate::errors::{HarnessError, Result};
use crate::selector::Selector;
use crate::session::{poll_query, BrowserKind, SessionOptions, WebElement, WebSession};
use async_trait::async_trait;
use headless_chrome::browser::tab::element::Element;
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::json;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const IS_DISPLAYED_FN: &str = r#"
    function() {
        const rect = this.getBoundingClientRect();
        const style = window.getComputedStyle(this);
        return rect.width > 0 &&
               rect.height > 0 &&
               style.visibility !== 'hidden' &&
               style.display !== 'none';
    }
"#;

/// Chromium session over the DevTools protocol.
///
/// CDP has no native implicit wait, so element queries poll until the
/// configured ceiling elapses.
pub struct ChromeSession {
    browser: Browser,
    tab: Arc<Tab>,
    implicit_wait: Duration,
}

impl ChromeSession {
    pub async fn launch(options: &SessionOptions) -> Result<Self> {
        // Create strings first to ensure they live long enough
        let window_size_arg = format!(
            "--window-size={},{}",
            options.window_width, options.window_height
        );

        let args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        let launch_options = LaunchOptions::default_builder()
            .headless(options.headless)
            .args(args)
            .build()
            .map_err(|e| HarnessError::Session(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| HarnessError::Session(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| HarnessError::Session(e.to_string()))?;

        Ok(Self {
            browser,
            tab,
            implicit_wait: options.implicit_wait,
        })
    }
}

#[async_trait]
impl WebSession for ChromeSession {
    type Element = ChromeElement;

    fn kind(&self) -> BrowserKind {
        BrowserKind::Chrome
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| HarnessError::Navigation(e.to_string()))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| HarnessError::Navigation(e.to_string()))?;

        Ok(())
    }

    async fn find_elements(&mut self, selector: &Selector) -> Result<Vec<ChromeElement>> {
        let css = selector.to_css();
        debug!(%selector, css, "querying document");

        let node_ids = poll_query(self.implicit_wait, || {
            let tab = Arc::clone(&self.tab);
            let css = css.clone();
            async move {
                match tab.find_elements(&css) {
                    Ok(elements) => Ok(elements.into_iter().map(|e| e.node_id).collect()),
                    // find_elements reports an empty result as an error; fold
                    // it into the poll and let the deadline decide.
                    Err(e) if e.is::<NoElementFound>() => Ok(Vec::new()),
                    Err(e) => Err(e.into()),
                }
            }
        })
        .await?;

        Ok(node_ids
            .into_iter()
            .map(|node_id| ChromeElement {
                tab: Arc::clone(&self.tab),
                node_id,
            })
            .collect())
    }

    async fn current_url(&mut self) -> Result<Url> {
        let raw = self.tab.get_url();
        Url::parse(&raw).map_err(|e| HarnessError::Session(format!("bad current url: {}", e)))
    }

    async fn save_screenshot(&mut self, path: &Path) -> Result<()> {
        let png = self.tab.capture_screenshot(
            headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
            None,
            None,
            true,
        )?;
        tokio::fs::write(path, png).await?;
        Ok(())
    }

    async fn quit(self) -> Result<()> {
        // The browser process exits when the handle is dropped.
        drop(self.tab);
        drop(self.browser);
        Ok(())
    }
}

/// Handle to a live DOM node, held as its node id and re-resolved per
/// operation; a node gone stale surfaces as a session error.
pub struct ChromeElement {
    tab: Arc<Tab>,
    node_id: u32,
}

impl ChromeElement {
    fn resolve(&self) -> Result<Element<'_>> {
        Element::new(&self.tab, self.node_id).map_err(|e| HarnessError::Session(e.to_string()))
    }
}

#[async_trait]
impl WebElement for ChromeElement {
    async fn text(&self) -> Result<String> {
        Ok(self.resolve()?.get_inner_text()?)
    }

    async fn click(&self) -> Result<()> {
        self.resolve()?.click()?;
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<()> {
        let element = self.resolve()?;
        element.click()?;
        element.type_into(text)?;
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        self.resolve()?.call_js_fn(
            r#"
            function() {
                const form = this.form || this.closest('form');
                if (form) {
                    form.submit();
                }
            }
            "#,
            vec![],
            false,
        )?;
        Ok(())
    }

    async fn is_displayed(&self) -> Result<bool> {
        let result = self.resolve()?.call_js_fn(IS_DISPLAYED_FN, vec![], false)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        let result = self.resolve()?.call_js_fn(
            "function(name) { return this.getAttribute(name); }",
            vec![json!(name)],
            false,
        )?;
        Ok(result
            .value
            .and_then(|v| v.as_str().map(|s| s.to_string())))
    }
}
