use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("No element matched {selector} with text {text:?} within the implicit wait")]
    QueryTimeout { selector: String, text: String },

    #[error("Ambiguous match: {count} elements matched {selector} with text {text:?}")]
    AmbiguousMatch {
        selector: String,
        text: String,
        count: usize,
    },

    #[error("Configuration error: {0}")]
    ConfigParse(String),

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;

// headless_chrome surfaces its failures as anyhow errors.
impl From<anyhow::Error> for HarnessError {
    fn from(err: anyhow::Error) -> Self {
        HarnessError::Session(err.to_string())
    }
}
