//! Configuration module

mod site;

pub use site::ConfigError;
pub use site::MarkdownConfig;
pub use site::PluginSpec;
pub use site::SiteConfig;
