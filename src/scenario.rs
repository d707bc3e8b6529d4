//! Scenario plumbing: context, runner, pauses and assertions.

use crate::config::Settings;
use crate::errors::{HarnessError, Result};
use crate::session::{WebElement, WebSession};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Everything a scenario step may read: the flattened settings, held
/// immutably for the duration of one scenario.
pub struct ScenarioContext {
    pub settings: Settings,
}

impl ScenarioContext {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }
}

/// One ordered sequence of interactions against a live session.
#[async_trait]
pub trait Scenario<S: WebSession>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, session: &mut S, ctx: &ScenarioContext) -> Result<()>;
}

/// Drive `scenario` over an owned session and release the session on every
/// exit path, assertion failure included. When both the scenario and the
/// release fail, the scenario's error wins.
pub async fn run_scenario<S: WebSession>(
    mut session: S,
    ctx: &ScenarioContext,
    scenario: &dyn Scenario<S>,
) -> Result<()> {
    info!(scenario = scenario.name(), browser = %session.kind(), "starting scenario");

    let outcome = scenario.run(&mut session, ctx).await;
    let released = session.quit().await;

    if outcome.is_ok() {
        info!(scenario = scenario.name(), "scenario passed");
    }

    outcome.and(released)
}

/// Fixed pause for client-side animation or script execution that the
/// DOM-ready signal does not cover. Never applied to an element query: those
/// are already covered by the session's implicit wait, and stacking the two
/// makes total wait times unpredictable.
pub async fn pause(duration: Duration) {
    tokio::time::sleep(duration).await;
}

pub fn assert_text_equal(expected: &str, actual: &str) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::Assertion(format!(
            "expected text {:?}, got {:?}",
            expected, actual
        )))
    }
}

pub async fn assert_displayed<E: WebElement>(element: &E, what: &str) -> Result<()> {
    if element.is_displayed().await? {
        Ok(())
    } else {
        Err(HarnessError::Assertion(format!("{} is not visible", what)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{FakeElement, FakeSession};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    struct Passing;

    #[async_trait]
    impl Scenario<FakeSession> for Passing {
        fn name(&self) -> &'static str {
            "passing"
        }

        async fn run(&self, session: &mut FakeSession, _ctx: &ScenarioContext) -> Result<()> {
            session.navigate("http://localhost/").await
        }
    }

    struct Failing;

    #[async_trait]
    impl Scenario<FakeSession> for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn run(&self, _session: &mut FakeSession, _ctx: &ScenarioContext) -> Result<()> {
            Err(HarnessError::Assertion("expected text missing".to_string()))
        }
    }

    fn empty_context() -> ScenarioContext {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("configuration.ini");
        std::fs::write(&path, "[platform]\ndevice = Mac\n").unwrap();
        ScenarioContext::new(Settings::load(&path).unwrap())
    }

    #[tokio::test]
    async fn session_is_released_after_a_pass() {
        let session = FakeSession::new();
        let released = Arc::clone(&session.released);

        run_scenario(session, &empty_context(), &Passing).await.unwrap();

        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn session_is_released_even_when_the_scenario_fails() {
        let session = FakeSession::new();
        let released = Arc::clone(&session.released);

        let err = run_scenario(session, &empty_context(), &Failing)
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::Assertion(_)), "{err:?}");
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn assert_displayed_reports_hidden_elements() {
        let mut hidden = FakeElement::with_text("Overview[edit]");
        hidden.displayed = false;

        let err = assert_displayed(&hidden, "section header").await.unwrap_err();
        assert!(matches!(err, HarnessError::Assertion(_)), "{err:?}");

        let shown = FakeElement::with_text("Overview[edit]");
        assert!(assert_displayed(&shown, "section header").await.is_ok());
    }

    #[test]
    fn assert_text_equal_mismatch_carries_both_sides() {
        let err = assert_text_equal("expected", "actual").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected") && message.contains("actual"));
    }
}
