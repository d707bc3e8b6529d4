pub mod config;
pub mod errors;
pub mod finder;
pub mod scenario;
pub mod scenarios;
pub mod selector;
pub mod session;

pub use config::{DeviceCategory, SettingValue, Settings};
pub use errors::{HarnessError, Result};
pub use selector::Selector;
pub use session::{BrowserKind, SessionOptions, WebElement, WebSession};
