//! Site configuration (_config.yml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading `_config.yml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid site url {0:?}: expected an absolute http(s) url")]
    InvalidSite(String),
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // URL root of the deployed site, e.g. https://example.com/
    pub site: Option<String>,

    // Directory
    pub content_dir: String,
    pub public_dir: String,
    pub public_assets_dir: String,
    pub icons_dir: String,

    // Home page
    pub home_posts: usize,

    // Markdown pipeline, passed through to the renderer
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: "Blog posts".to_string(),
            language: "en-gb".to_string(),

            site: None,

            content_dir: "src/content".to_string(),
            public_dir: "dist".to_string(),
            public_assets_dir: "public".to_string(),
            icons_dir: "assets/icons".to_string(),

            home_posts: 5,

            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content, path)?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Self::from_yaml(content, Path::new("_config.yml"))
    }

    fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: SiteConfig =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(site) = &self.site {
            let rest = site
                .strip_prefix("https://")
                .or_else(|| site.strip_prefix("http://"));
            // The root is joined with paths, so a query or fragment has no place
            let has_bad_char = site
                .chars()
                .any(|c| matches!(c, '?' | '#' | '"' | '<' | '>') || c.is_whitespace());
            match rest {
                Some(host) if !host.is_empty() && !host.starts_with('/') && !has_bad_char => {}
                _ => return Err(ConfigError::InvalidSite(site.clone())),
            }
        }
        Ok(())
    }

    /// The site root in `href` form.
    ///
    /// A bare origin gains a trailing slash (`https://example.com` becomes
    /// `https://example.com/`, `https://example.com?x` becomes
    /// `https://example.com/?x`); anything with a path is left untouched.
    pub fn site_href(&self) -> Option<String> {
        let site = self.site.as_deref()?;
        let scheme_len = site.find("://").map(|i| i + 3).unwrap_or(0);
        let after_scheme = &site[scheme_len..];
        match after_scheme.find(['/', '?', '#']) {
            Some(i) if after_scheme[i..].starts_with('/') => Some(site.to_string()),
            Some(i) => {
                let (origin, rest) = site.split_at(scheme_len + i);
                Some(format!("{}/{}", origin, rest))
            }
            None => Some(format!("{}/", site)),
        }
    }
}

/// Markdown rendering options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Syntax highlighting theme
    pub theme: String,
    pub remark_plugins: Vec<PluginSpec>,
    pub rehype_plugins: Vec<PluginSpec>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            remark_plugins: Vec::new(),
            rehype_plugins: Vec::new(),
        }
    }
}

/// A markdown plugin reference: either a bare name or `[name, { options }]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginSpec {
    Name(String),
    WithOptions(String, serde_yaml::Mapping),
}

impl PluginSpec {
    pub fn name(&self) -> &str {
        match self {
            PluginSpec::Name(name) | PluginSpec::WithOptions(name, _) => name,
        }
    }

    /// Look up a string option
    pub fn option(&self, key: &str) -> Option<&str> {
        match self {
            PluginSpec::Name(_) => None,
            PluginSpec::WithOptions(_, options) => options.get(key).and_then(|v| v.as_str()),
        }
    }
}
