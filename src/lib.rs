//! folio: a small static blog generator
//!
//! Blog posts live in a content collection with typed front matter. The
//! generator renders one page per published post, a blog listing, a home
//! page and an RSS 2.0 feed; a development server serves the result.

pub mod blog;
pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the configuration file in the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// The main application: configuration plus resolved directories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content collections directory
    pub content_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Static assets copied verbatim into the output
    pub assets_dir: PathBuf,
    /// Icon SVG directory
    pub icons_dir: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let assets_dir = base_dir.join(&config.public_assets_dir);
        let icons_dir = base_dir.join(&config.icons_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            assets_dir,
            icons_dir,
        }
    }

    /// Content store over this site's content directory
    pub fn store(&self) -> content::FsContentStore {
        content::FsContentStore::new(&self.content_dir)
    }

    /// Build the static site
    pub fn build(&self) -> Result<generator::BuildReport> {
        commands::build::run(self, false)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
