pub mod chrome;
pub mod firefox;

#[cfg(test)]
pub(crate) mod fake;

use crate::errors::Result;
use crate::selector::Selector;
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

pub use chrome::ChromeSession;
pub use firefox::FirefoxSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
}

impl BrowserKind {
    /// Lowercase name, also used in screenshot file names.
    pub fn as_str(self) -> &'static str {
        match self {
            BrowserKind::Chrome => "chrome",
            BrowserKind::Firefox => "firefox",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    /// Ceiling applied automatically to every element query in the session.
    pub implicit_wait: Duration,
    pub window_width: u32,
    pub window_height: u32,
    /// WebDriver endpoint for Gecko sessions (geckodriver).
    pub webdriver_url: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: true,
            implicit_wait: Duration::from_secs(10),
            window_width: 1280,
            window_height: 720,
            webdriver_url: "http://localhost:4444".to_string(),
        }
    }
}

/// A live, rendered node owned by the browser session. Handles are only ever
/// queried, never created or destroyed by this crate.
#[async_trait]
pub trait WebElement: Send + Sync {
    /// Rendered (visible) text of the element.
    async fn text(&self) -> Result<String>;

    async fn click(&self) -> Result<()>;

    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Submit the form owning this element.
    async fn submit(&self) -> Result<()>;

    async fn is_displayed(&self) -> Result<bool>;

    async fn attribute(&self, name: &str) -> Result<Option<String>>;
}

/// One browser session, driven sequentially through a scenario and released
/// exactly once via `quit`.
#[async_trait]
pub trait WebSession: Send + Sync {
    type Element: WebElement;

    fn kind(&self) -> BrowserKind;

    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Query the current document. A query that matches nothing blocks up to
    /// the session's implicit wait, then returns empty; it never combines
    /// that wait with an explicit pause.
    async fn find_elements(&mut self, selector: &Selector) -> Result<Vec<Self::Element>>;

    async fn current_url(&mut self) -> Result<Url>;

    async fn save_screenshot(&mut self, path: &Path) -> Result<()>;

    async fn quit(self) -> Result<()>;
}

pub(crate) const QUERY_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Re-run `query` until it yields something or the implicit wait elapses.
/// An empty result after the deadline is returned as-is; only transport
/// failures become errors.
pub(crate) async fn poll_query<T, F, Fut>(implicit_wait: Duration, mut query: F) -> Result<Vec<T>>
where
    T: Send,
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = Result<Vec<T>>> + Send,
{
    let deadline = Instant::now() + implicit_wait;
    loop {
        let found = query().await?;
        if !found.is_empty() {
            return Ok(found);
        }
        if Instant::now() >= deadline {
            return Ok(Vec::new());
        }
        tokio::time::sleep(QUERY_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HarnessError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn empty_query_gives_up_after_the_implicit_wait() {
        let started = Instant::now();
        let found: Vec<u32> = poll_query(Duration::from_secs(10), || async { Ok(Vec::new()) })
            .await
            .unwrap();

        assert!(found.is_empty());
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(10), "gave up too early: {waited:?}");
        assert!(waited < Duration::from_secs(11), "kept polling too long: {waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_match_does_not_wait() {
        let started = Instant::now();
        let found = poll_query(Duration::from_secs(10), || async { Ok(vec![1u32]) })
            .await
            .unwrap();

        assert_eq!(found, vec![1]);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn late_match_is_picked_up_by_a_later_poll() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);

        let found = poll_query(Duration::from_secs(10), move || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 3 {
                    Ok(Vec::new())
                } else {
                    Ok(vec!["found"])
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(found, vec!["found"]);
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let result: Result<Vec<u32>> = poll_query(Duration::from_secs(10), || async {
            Err(HarnessError::Session("tab crashed".to_string()))
        })
        .await;

        assert!(matches!(result, Err(HarnessError::Session(_))));
    }
}
