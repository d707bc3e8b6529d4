//! In-memory stand-ins for finder and runner tests; no browser involved.

use crate::errors::Result;
use crate::selector::Selector;
use crate::session::{BrowserKind, WebElement, WebSession};
use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

#[derive(Clone, Debug)]
pub(crate) struct FakeElement {
    pub text: String,
    pub displayed: bool,
    pub href: Option<String>,
    pub clicks: Arc<AtomicUsize>,
}

impl FakeElement {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            displayed: true,
            href: None,
            clicks: Arc::new(AtomicUsize::new(0)),
        }
    }

}

#[async_trait]
impl WebElement for FakeElement {
    async fn text(&self) -> Result<String> {
        Ok(self.text.clone())
    }

    async fn click(&self) -> Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_keys(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn submit(&self) -> Result<()> {
        Ok(())
    }

    async fn is_displayed(&self) -> Result<bool> {
        Ok(self.displayed)
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        if name == "href" {
            Ok(self.href.clone())
        } else {
            Ok(None)
        }
    }
}

pub(crate) struct FakeSession {
    kind: BrowserKind,
    elements: Vec<(Selector, FakeElement)>,
    pub released: Arc<AtomicBool>,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::with_kind(BrowserKind::Chrome)
    }

    pub fn with_kind(kind: BrowserKind) -> Self {
        Self {
            kind,
            elements: Vec::new(),
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn insert(&mut self, selector: Selector, element: FakeElement) {
        self.elements.push((selector, element));
    }
}

#[async_trait]
impl WebSession for FakeSession {
    type Element = FakeElement;

    fn kind(&self) -> BrowserKind {
        self.kind
    }

    async fn navigate(&mut self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn find_elements(&mut self, selector: &Selector) -> Result<Vec<FakeElement>> {
        Ok(self
            .elements
            .iter()
            .filter(|(candidate, _)| candidate == selector)
            .map(|(_, element)| element.clone())
            .collect())
    }

    async fn current_url(&mut self) -> Result<Url> {
        Ok(Url::parse("http://localhost/").expect("static url"))
    }

    async fn save_screenshot(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    async fn quit(self) -> Result<()> {
        self.released.store(true, Ordering::SeqCst);
        Ok(())
    }
}
