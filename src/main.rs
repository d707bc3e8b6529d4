use clap::{Parser, ValueEnum};
use crosscheck::scenario::{run_scenario, Scenario, ScenarioContext};
use crosscheck::scenarios::{PlatformConfigurator, WikipediaSearch};
use crosscheck::session::{ChromeSession, FirefoxSession};
use crosscheck::{SessionOptions, Settings, WebSession};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Cross-browser UI checks: drives Chrome (DevTools) and Firefox (WebDriver)
/// through the scripted scenarios and reports pass/fail per scenario.
///
/// Firefox sessions need a running geckodriver at --webdriver-url.
#[derive(Parser)]
#[command(name = "crosscheck", version, about)]
struct Cli {
    /// Which browser(s) to drive.
    #[arg(long, value_enum, default_value_t = BrowserArg::All)]
    browser: BrowserArg,

    /// Path to the INI settings file.
    #[arg(long, default_value = "configuration.ini")]
    config: PathBuf,

    /// WebDriver endpoint for the Firefox session.
    #[arg(long, default_value = "http://localhost:4444")]
    webdriver_url: String,

    /// Run with visible browser windows.
    #[arg(long)]
    headed: bool,

    /// Implicit wait ceiling, in seconds, applied to every element query.
    #[arg(long, default_value_t = 10)]
    implicit_wait: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BrowserArg {
    Chrome,
    Firefox,
    All,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let options = SessionOptions {
        headless: !cli.headed,
        implicit_wait: Duration::from_secs(cli.implicit_wait),
        webdriver_url: cli.webdriver_url.clone(),
        ..SessionOptions::default()
    };

    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(err) => {
            error!(config = %cli.config.display(), error = %err, "failed to load settings");
            std::process::exit(2);
        }
    };
    let ctx = ScenarioContext::new(settings);

    let mut failures = 0;

    if matches!(cli.browser, BrowserArg::Chrome | BrowserArg::All) {
        failures += run_suite(|| ChromeSession::launch(&options), &ctx).await;
    }

    if matches!(cli.browser, BrowserArg::Firefox | BrowserArg::All) {
        failures += run_suite(|| FirefoxSession::connect(&options), &ctx).await;
    }

    if failures > 0 {
        error!(failures, "scenario failures");
        std::process::exit(1);
    }
    info!("all scenarios passed");
}

/// Run every scenario against a fresh session from `launch`; scenarios never
/// share a session or mutable state.
async fn run_suite<S, F, Fut>(launch: F, ctx: &ScenarioContext) -> usize
where
    S: WebSession,
    F: Fn() -> Fut,
    Fut: Future<Output = crosscheck::Result<S>>,
{
    let scenarios: [&dyn Scenario<S>; 2] = [&PlatformConfigurator, &WikipediaSearch];

    let mut failures = 0;
    for scenario in scenarios {
        match launch().await {
            Ok(session) => {
                if let Err(err) = run_scenario(session, ctx, scenario).await {
                    error!(scenario = scenario.name(), error = %err, "scenario failed");
                    failures += 1;
                }
            }
            Err(err) => {
                error!(error = %err, "failed to start browser session");
                failures += 1;
            }
        }
    }
    failures
}
