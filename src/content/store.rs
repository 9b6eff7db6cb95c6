//! Content store - loads content collections from the content directory

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use super::{slug_from_id, BlogEntry, FrontMatter, SchemaError};

/// Errors raised while reading a content collection
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("duplicate slug {slug:?} in collection {collection:?}: {first} and {second}")]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: String,
        second: String,
    },
}

/// Query access to content collections
pub trait ContentStore {
    /// Every entry of `collection`, ordered by id
    fn get_collection(&self, collection: &str) -> Result<Vec<BlogEntry>, ContentError>;

    /// Entries of `collection` for which `filter` returns true
    fn get_collection_filtered(
        &self,
        collection: &str,
        filter: &dyn Fn(&BlogEntry) -> bool,
    ) -> Result<Vec<BlogEntry>, ContentError> {
        let mut entries = self.get_collection(collection)?;
        entries.retain(|entry| filter(entry));
        Ok(entries)
    }
}

/// Reads collections from `<content_dir>/<collection>/`
#[derive(Debug, Clone)]
pub struct FsContentStore {
    content_dir: PathBuf,
}

impl FsContentStore {
    /// Create a store rooted at the content directory
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Directory holding the files of `collection`
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.content_dir.join(collection)
    }
}

impl ContentStore for FsContentStore {
    fn get_collection(&self, collection: &str) -> Result<Vec<BlogEntry>, ContentError> {
        let collection_dir = self.collection_dir(collection);
        if !collection_dir.exists() {
            tracing::warn!(
                "Collection {:?} has no directory at {:?}",
                collection,
                collection_dir
            );
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&collection_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && is_markdown_file(path) {
                entries.push(load_entry(collection, &collection_dir, path)?);
            }
        }

        check_unique_slugs(collection, &entries)?;
        tracing::debug!(
            "Loaded {} entries from collection {:?}",
            entries.len(),
            collection
        );

        Ok(entries)
    }
}

/// Load a single entry from a file
pub fn load_entry(
    collection: &str,
    collection_dir: &Path,
    path: &Path,
) -> Result<BlogEntry, ContentError> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (fm, body) = FrontMatter::parse(&content, path)?;

    // Id is the path relative to the collection, always with forward slashes
    let id = path
        .strip_prefix(collection_dir)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let slug = fm.slug.unwrap_or_else(|| slug_from_id(&id));

    Ok(BlogEntry {
        id,
        slug,
        collection: collection.to_string(),
        data: fm.data,
        body: body.to_string(),
    })
}

fn check_unique_slugs(collection: &str, entries: &[BlogEntry]) -> Result<(), ContentError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for entry in entries {
        if let Some(first) = seen.insert(entry.slug.as_str(), entry.id.as_str()) {
            return Err(ContentError::DuplicateSlug {
                collection: collection.to_string(),
                slug: entry.slug.clone(),
                first: first.to_string(),
                second: entry.id.clone(),
            });
        }
    }
    Ok(())
}

/// Check if a file is a markdown (or MDX) file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown" || e == "mdx")
        .unwrap_or(false)
}

/// In-memory collections
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<String, Vec<BlogEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding one collection
    pub fn with_collection(collection: &str, entries: Vec<BlogEntry>) -> Self {
        let mut store = Self::new();
        store.collections.insert(collection.to_string(), entries);
        store
    }

    /// Add an entry to its collection
    pub fn insert(&mut self, entry: BlogEntry) {
        self.collections
            .entry(entry.collection.clone())
            .or_default()
            .push(entry);
    }
}

impl ContentStore for MemoryStore {
    fn get_collection(&self, collection: &str) -> Result<Vec<BlogEntry>, ContentError> {
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\npublishDate: {}\ntags: [a]\n---\n\nBody of {}\n", title, date, title)
    }

    #[test]
    fn test_loads_collection_sorted_by_id() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "b-post.md", &post("B", "2024-01-02"));
        write(&blog, "a-post.mdx", &post("A", "2024-01-01"));
        write(&blog, "nested/index.md", &post("Nested", "2024-01-03"));
        write(&blog, "notes.txt", "ignored");

        let store = FsContentStore::new(tmp.path());
        let entries = store.get_collection("blog").unwrap();

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a-post.mdx", "b-post.md", "nested/index.md"]);
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a-post", "b-post", "nested"]);
        assert_eq!(entries[0].collection, "blog");
        assert_eq!(entries[0].body, "Body of A\n");
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = FsContentStore::new(tmp.path());
        assert!(store.get_collection("blog").unwrap().is_empty());
    }

    #[test]
    fn test_schema_error_propagates() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("blog"), "bad.md", "---\ntitle: Bad\n---\n");

        let store = FsContentStore::new(tmp.path());
        let err = store.get_collection("blog").unwrap_err();
        match err {
            ContentError::Schema(schema) => {
                assert!(schema.file.ends_with("bad.md"));
                assert_eq!(schema.issues.len(), 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "one.md", &post("One", "2024-01-01"));
        write(
            &blog,
            "two.md",
            "---\ntitle: Two\npublishDate: 2024-01-02\ntags: []\nslug: one\n---\n",
        );

        let store = FsContentStore::new(tmp.path());
        let err = store.get_collection("blog").unwrap_err();
        assert!(matches!(err, ContentError::DuplicateSlug { ref slug, .. } if slug == "one"));
    }

    #[test]
    fn test_filtered_collection() {
        let tmp = TempDir::new().unwrap();
        let blog = tmp.path().join("blog");
        write(&blog, "keep.md", &post("Keep", "2024-01-01"));
        write(&blog, "drop.md", &post("Drop", "2024-01-02"));

        let store = FsContentStore::new(tmp.path());
        let entries = store
            .get_collection_filtered("blog", &|e| e.data.title == "Keep")
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].slug, "keep");
    }
}
