//! Blog entry model

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Validated front-matter payload of a blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogData {
    pub title: String,

    pub description: Option<String>,

    /// Publication date, used for ordering
    #[serde(rename = "publishDate")]
    pub publish_date: DateTime<Utc>,

    /// Absent means not a draft
    pub draft: Option<bool>,

    /// Tags as authored (order and duplicates kept)
    pub tags: Vec<String>,
}

/// One entry of a content collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogEntry {
    /// Source path relative to the collection directory
    pub id: String,

    /// URL-friendly identifier, unique within the collection
    pub slug: String,

    /// Collection this entry was loaded from
    pub collection: String,

    pub data: BlogData,

    /// Raw markdown after the front matter
    pub body: String,
}

impl BlogEntry {
    /// Whether the entry shows up in listings and the feed
    pub fn is_live(&self) -> bool {
        self.data.draft != Some(true)
    }
}

/// Derive the default slug from an entry id.
///
/// The extension is dropped, every path segment is slugified and a trailing
/// `index` segment collapses into its parent (`notes/index.md` -> `notes`).
pub fn slug_from_id(id: &str) -> String {
    let without_ext = match id.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') => stem,
        _ => id,
    };

    let mut segments: Vec<String> = without_ext
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .map(slug::slugify)
        .collect();

    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(draft: Option<bool>) -> BlogEntry {
        BlogEntry {
            id: "post.md".to_string(),
            slug: "post".to_string(),
            collection: "blog".to_string(),
            data: BlogData {
                title: "Post".to_string(),
                description: None,
                publish_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
                draft,
                tags: Vec::new(),
            },
            body: String::new(),
        }
    }

    #[test]
    fn test_is_live() {
        assert!(entry(None).is_live());
        assert!(entry(Some(false)).is_live());
        assert!(!entry(Some(true)).is_live());
    }

    #[test]
    fn test_slug_from_id() {
        assert_eq!(slug_from_id("hello-world.md"), "hello-world");
        assert_eq!(slug_from_id("My First Post.mdx"), "my-first-post");
        assert_eq!(slug_from_id("2024/Rust Notes.md"), "2024/rust-notes");
        assert_eq!(slug_from_id("series/index.md"), "series");
        assert_eq!(slug_from_id("index.md"), "index");
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(entry(Some(true))).unwrap();
        assert_eq!(json["data"]["publishDate"], "2024-01-03T00:00:00Z");
        assert_eq!(json["data"]["draft"], true);
        assert_eq!(json["slug"], "post");
    }
}
