//! Social icons loaded from SVG files
//!
//! Icons are read once at startup. A missing file is reported immediately
//! instead of at the first page that needs it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Icon names and their files relative to the icons directory
pub const ICONS: &[(&str, &str)] = &[
    ("twitter", "brands/twitter.svg"),
    ("github", "brands/github.svg"),
    ("linkedin", "brands/linkedin.svg"),
    ("email", "regular/envelope.svg"),
];

#[derive(Debug, Error)]
#[error("failed to load icon {name:?} from {}: {source}", path.display())]
pub struct IconError {
    pub name: String,
    pub path: PathBuf,
    pub source: std::io::Error,
}

/// Immutable name -> SVG markup lookup
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct IconSet {
    icons: BTreeMap<String, String>,
}

impl IconSet {
    /// Load every icon in [`ICONS`] from `icons_dir`
    pub fn load<P: AsRef<Path>>(icons_dir: P) -> Result<Self, IconError> {
        let icons_dir = icons_dir.as_ref();
        let mut icons = BTreeMap::new();

        for (name, file) in ICONS {
            let path = icons_dir.join(file);
            let svg = fs::read_to_string(&path).map_err(|source| IconError {
                name: name.to_string(),
                path: path.clone(),
                source,
            })?;
            icons.insert(name.to_string(), svg.trim().to_string());
        }

        tracing::debug!("Loaded {} icons from {:?}", icons.len(), icons_dir);
        Ok(Self { icons })
    }

    /// SVG markup of an icon
    pub fn get(&self, name: &str) -> Option<&str> {
        self.icons.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}
