//! Drives the SauceLabs platform configurator: pick an API, a device, an
//! operating system and a browser, toggle the advanced options, then check
//! the generated snippet against the expected output.

use crate::errors::Result;
use crate::finder::{require_element, require_element_with_text};
use crate::scenario::{assert_text_equal, pause, Scenario, ScenarioContext};
use crate::selector::Selector;
use crate::session::{BrowserKind, WebElement, WebSession};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

const CONFIGURATOR_URL: &str =
    "https://docs.saucelabs.com/reference/platforms-configurator/?_ga=1.5883444.608313.1428365147#/";

/// Minor animations lag behind the DOM-ready signal; the implicit wait does
/// not cover these.
const ANIMATION_DELAY: Duration = Duration::from_secs(1);

pub struct PlatformConfigurator;

#[async_trait]
impl<S: WebSession> Scenario<S> for PlatformConfigurator {
    fn name(&self) -> &'static str {
        "platform_configurator"
    }

    async fn run(&self, session: &mut S, ctx: &ScenarioContext) -> Result<()> {
        let settings = &ctx.settings;
        session.navigate(CONFIGURATOR_URL).await?;

        let api = settings.require("api")?;
        let api_button =
            require_element_with_text(session, &Selector::class("api-button"), &api).await?;
        api_button.click().await?;

        // All of the buttons are candidates; the label text is unique.
        let device_dropdown =
            require_element_with_text(session, &Selector::tag("button"), "Select a device").await?;
        device_dropdown.click().await?;

        // The tab class names are lowercase; the tab text keeps proper case.
        let category = settings.require("device_category")?;
        let device_tab = require_element_with_text(
            session,
            &Selector::class(category.to_lowercase()),
            &category,
        )
        .await?;
        device_tab.click().await?;

        pause(ANIMATION_DELAY).await;

        let device = settings.require("device")?;
        let device_choice =
            require_element_with_text(session, &Selector::tag("span"), &device).await?;
        device_choice.click().await?;

        let os_dropdown = require_element_with_text(
            session,
            &Selector::tag("button"),
            "Select an operating system",
        )
        .await?;
        os_dropdown.click().await?;

        let operating_system = settings.require("operating_system")?;
        let os_choice =
            require_element_with_text(session, &Selector::tag("span"), &operating_system).await?;
        os_choice.click().await?;

        pause(ANIMATION_DELAY).await;

        let browser_dropdown =
            require_element_with_text(session, &Selector::tag("button"), "Select a browser")
                .await?;
        browser_dropdown.click().await?;

        let browser = settings.require("browser")?;
        let browser_tab = require_element_with_text(
            session,
            &Selector::class(browser.to_lowercase()),
            &browser,
        )
        .await?;
        browser_tab.click().await?;

        let browser_version = settings.require("browser_version")?;
        let version_choice =
            require_element_with_text(session, &Selector::tag("span"), &browser_version).await?;
        version_choice.click().await?;

        let advanced_button = require_element_with_text(
            session,
            &Selector::tag("h4"),
            "Show Advanced Configuration",
        )
        .await?;
        advanced_button.click().await?;

        pause(ANIMATION_DELAY).await;

        // Both toggles default to on; switch them off when the settings ask.
        if !settings.require_bool("record_video")? {
            let toggle =
                require_element_with_text(session, &Selector::tag("label"), "Record Video").await?;
            toggle.click().await?;
        }

        if !settings.require_bool("capture_screenshot")? {
            let toggle =
                require_element_with_text(session, &Selector::tag("label"), "Capture Screenshot")
                    .await?;
            toggle.click().await?;
        }

        self.verify_snippet(session, ctx).await?;

        let save_dir = settings.require("screenshot_save_path")?;
        let file_name = format!("{}_screen.png", session.kind());
        session
            .save_screenshot(&Path::new(&save_dir).join(file_name))
            .await?;

        Ok(())
    }
}

impl PlatformConfigurator {
    /// Switch the snippet panel to the configured language and compare its
    /// text against `expected_output`.
    async fn verify_snippet<S: WebSession>(
        &self,
        session: &mut S,
        ctx: &ScenarioContext,
    ) -> Result<()> {
        let language = ctx.settings.require("output_language")?;

        // Gecko reports an empty string for the language <li>'s rendered
        // text, so the anchor inside it is matched there instead. The panel
        // itself is classed under Chromium but only carries a stable id
        // under Gecko.
        let (tab_selector, panel_selector) = match session.kind() {
            BrowserKind::Chrome => (
                Selector::tag("li"),
                Selector::class(language.to_lowercase()),
            ),
            BrowserKind::Firefox => (
                Selector::tag("a"),
                Selector::id(format!("code-result-{}", language)),
            ),
        };

        let language_tab = require_element_with_text(session, &tab_selector, &language).await?;
        language_tab.click().await?;

        pause(ANIMATION_DELAY).await;

        let panel = require_element(session, &panel_selector).await?;
        let expected = ctx.settings.require("expected_output")?;
        assert_text_equal(&expected, &panel.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::errors::HarnessError;
    use crate::session::fake::{FakeElement, FakeSession};

    const SNIPPET: &str = "caps = Selenium::WebDriver::Remote::Capabilities.chrome()";

    fn snippet_context() -> ScenarioContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configuration.ini");
        std::fs::write(
            &path,
            format!(
                "[platform]\n\
                 device = Mac\n\
                 [output]\n\
                 output_language = Ruby\n\
                 expected_output = {}\n",
                SNIPPET
            ),
        )
        .unwrap();
        ScenarioContext::new(Settings::load(&path).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn chromium_snippet_check_uses_list_tab_and_panel_class() {
        let mut session = FakeSession::new();
        session.insert(Selector::tag("li"), FakeElement::with_text("Ruby"));
        session.insert(Selector::class("ruby"), FakeElement::with_text(SNIPPET));

        PlatformConfigurator
            .verify_snippet(&mut session, &snippet_context())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn gecko_snippet_check_uses_anchor_tab_and_panel_id() {
        // Gecko reports no rendered text for the <li>, so the anchor is
        // matched there and the panel is addressed by its stable id.
        let mut session = FakeSession::with_kind(BrowserKind::Firefox);
        session.insert(Selector::tag("a"), FakeElement::with_text("Ruby"));
        session.insert(
            Selector::id("code-result-Ruby"),
            FakeElement::with_text(SNIPPET),
        );

        PlatformConfigurator
            .verify_snippet(&mut session, &snippet_context())
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn snippet_mismatch_is_an_assertion_failure() {
        let mut session = FakeSession::with_kind(BrowserKind::Firefox);
        session.insert(Selector::tag("a"), FakeElement::with_text("Ruby"));
        session.insert(
            Selector::id("code-result-Ruby"),
            FakeElement::with_text("caps = something else entirely"),
        );

        let err = PlatformConfigurator
            .verify_snippet(&mut session, &snippet_context())
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::Assertion(_)), "{err:?}");
    }
}
