pub mod platform_configurator;
pub mod wikipedia;

pub use platform_configurator::PlatformConfigurator;
pub use wikipedia::WikipediaSearch;
