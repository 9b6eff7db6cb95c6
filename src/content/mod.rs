//! Content module - blog entries, their schema and the stores that load them

mod entry;
mod frontmatter;
mod markdown;
pub mod store;

pub use entry::{slug_from_id, BlogData, BlogEntry};
pub use frontmatter::{parse_date_string, FieldIssue, FrontMatter, SchemaError};
pub use markdown::MarkdownRenderer;
pub use store::{ContentError, ContentStore, FsContentStore, MemoryStore};
