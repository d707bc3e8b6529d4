//! Searches Wikipedia for "continuous delivery", walks through the pipeline
//! diagram's media viewer, then follows the automated-testing redirect and
//! checks that the expected section headers are visible.

use crate::errors::Result;
use crate::finder::{require_element, require_element_with_text};
use crate::scenario::{assert_displayed, pause, Scenario, ScenarioContext};
use crate::selector::Selector;
use crate::session::{WebElement, WebSession};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The global gateway page, which defaults to the English wiki.
const GATEWAY_URL: &str = "http://www.wikipedia.org";

/// Closing the media viewer runs page script well after DOM-ready; the
/// implicit wait does not cover it.
const MEDIA_VIEWER_DELAY: Duration = Duration::from_secs(4);

pub struct WikipediaSearch;

#[async_trait]
impl<S: WebSession> Scenario<S> for WikipediaSearch {
    fn name(&self) -> &'static str {
        "wikipedia_search"
    }

    async fn run(&self, session: &mut S, _ctx: &ScenarioContext) -> Result<()> {
        session.navigate(GATEWAY_URL).await?;

        let search_box = require_element(session, &Selector::name("search")).await?;
        search_box.send_keys("continuous delivery").await?;
        search_box.submit().await?;

        // The pipeline diagram thumbnail has no rendered text; match on its
        // href instead.
        let images = session.find_elements(&Selector::class("image")).await?;
        for image in &images {
            if let Some(href) = image.attribute("href").await? {
                if href.contains("diagram") {
                    image.click().await?;
                }
            }
        }

        pause(MEDIA_VIEWER_DELAY).await;

        let close_button = require_element(session, &Selector::class("mw-mmv-close")).await?;
        close_button.click().await?;

        let redirect_link = require_element_with_text(
            session,
            &Selector::class("mw-redirect"),
            "automated testing",
        )
        .await?;
        redirect_link.click().await?;

        let current_url = session.current_url().await?;
        debug!(url = %current_url, "landed on article");

        // Keeping the [edit] suffix pins the match to the section header
        // itself rather than a table-of-contents entry.
        let overview =
            require_element_with_text(session, &Selector::tag("h2"), "Overview[edit]").await?;
        assert_displayed(&overview, "Overview section header").await?;

        let code_driven =
            require_element_with_text(session, &Selector::tag("h2"), "Code-driven testing[edit]")
                .await?;
        assert_displayed(&code_driven, "Code-driven testing section header").await?;

        Ok(())
    }
}
