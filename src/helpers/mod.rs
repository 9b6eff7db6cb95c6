//! Presentation helpers
//!
//! Small pure functions used by templates and the feed: date formatting,
//! URL building and the icon set loaded at startup.

mod date;
mod icons;
mod url;

pub use date::*;
pub use icons::*;
pub use url::*;
