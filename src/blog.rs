//! Blog queries over the `blog` content collection
//!
//! Every public listing (home page, blog index, feed) goes through
//! [`get_live_blog_entries`] and [`sort`], so drafts never leak and all of
//! them agree on newest-first ordering.

use serde::Serialize;

use crate::content::{BlogEntry, ContentError, ContentStore};
use crate::helpers::post_path;

/// Name of the blog collection
pub const BLOG_COLLECTION: &str = "blog";

/// Every blog entry, drafts included
pub fn get_all_blog_entries<S>(store: &S) -> Result<Vec<BlogEntry>, ContentError>
where
    S: ContentStore + ?Sized,
{
    store.get_collection(BLOG_COLLECTION)
}

/// Blog entries that are not drafts
pub fn get_live_blog_entries<S>(store: &S) -> Result<Vec<BlogEntry>, ContentError>
where
    S: ContentStore + ?Sized,
{
    store.get_collection_filtered(BLOG_COLLECTION, &|entry| entry.data.draft != Some(true))
}

/// Sort entries in place by publish date, newest first.
///
/// The sort is stable, but callers must not rely on the relative order of
/// entries published at the same instant.
pub fn sort(entries: &mut [BlogEntry]) {
    entries.sort_by(|a, b| b.data.publish_date.cmp(&a.data.publish_date));
}

/// Route parameters of a post page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlugParams {
    pub slug: String,
}

/// Render input of a post page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryProps {
    pub entry: BlogEntry,
}

/// One generated page: `/blog/{params.slug}/` rendered from `props.entry`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPath {
    pub params: SlugParams,
    pub props: EntryProps,
}

impl StaticPath {
    pub fn for_entry(entry: BlogEntry) -> Self {
        Self {
            params: SlugParams {
                slug: entry.slug.clone(),
            },
            props: EntryProps { entry },
        }
    }

    /// Site-relative output path, e.g. `blog/hello-world/`
    pub fn route(&self) -> String {
        post_path(&self.params.slug)
    }
}

/// One static path per live blog entry
pub fn get_static_paths<S>(store: &S) -> Result<Vec<StaticPath>, ContentError>
where
    S: ContentStore + ?Sized,
{
    Ok(get_live_blog_entries(store)?
        .into_iter()
        .map(StaticPath::for_entry)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BlogData, MemoryStore};
    use chrono::{TimeZone, Utc};

    fn entry(slug: &str, day: u32, draft: Option<bool>) -> BlogEntry {
        BlogEntry {
            id: format!("{}.md", slug),
            slug: slug.to_string(),
            collection: BLOG_COLLECTION.to_string(),
            data: BlogData {
                title: slug.to_uppercase(),
                description: None,
                publish_date: Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap(),
                draft,
                tags: vec!["rust".to_string()],
            },
            body: String::new(),
        }
    }

    fn fixture() -> MemoryStore {
        MemoryStore::with_collection(
            BLOG_COLLECTION,
            vec![
                entry("absent", 2, None),
                entry("draft", 5, Some(true)),
                entry("explicit", 9, Some(false)),
                entry("another-draft", 1, Some(true)),
            ],
        )
    }

    fn slugs(entries: &[BlogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.slug.as_str()).collect()
    }

    /// Store whose reads always fail
    struct BrokenStore;

    impl ContentStore for BrokenStore {
        fn get_collection(&self, _collection: &str) -> Result<Vec<BlogEntry>, ContentError> {
            Err(ContentError::Io {
                path: "blog".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            })
        }
    }

    #[test]
    fn test_all_entries_include_drafts() {
        let entries = get_all_blog_entries(&fixture()).unwrap();
        assert_eq!(
            slugs(&entries),
            vec!["absent", "draft", "explicit", "another-draft"]
        );
    }

    #[test]
    fn test_live_entries_exclude_drafts() {
        let entries = get_live_blog_entries(&fixture()).unwrap();
        assert_eq!(slugs(&entries), vec!["absent", "explicit"]);
        assert!(entries.iter().all(BlogEntry::is_live));
    }

    #[test]
    fn test_all_is_superset_of_live() {
        let store = fixture();
        let all = get_all_blog_entries(&store).unwrap();
        let live = get_live_blog_entries(&store).unwrap();
        assert!(all.len() > live.len());
        assert!(live.iter().all(|e| all.contains(e)));
    }

    #[test]
    fn test_sort_newest_first() {
        let mut entries = get_all_blog_entries(&fixture()).unwrap();
        sort(&mut entries);
        assert_eq!(
            slugs(&entries),
            vec!["explicit", "draft", "absent", "another-draft"]
        );
        for pair in entries.windows(2) {
            assert!(pair[0].data.publish_date >= pair[1].data.publish_date);
        }
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut entries = get_all_blog_entries(&fixture()).unwrap();
        sort(&mut entries);
        let once = entries.clone();
        sort(&mut entries);
        assert_eq!(entries, once);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut empty: Vec<BlogEntry> = Vec::new();
        sort(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![entry("only", 3, None)];
        sort(&mut single);
        assert_eq!(slugs(&single), vec!["only"]);
    }

    #[test]
    fn test_static_paths_one_per_live_entry() {
        let paths = get_static_paths(&fixture()).unwrap();
        assert_eq!(paths.len(), 2);
        for path in &paths {
            assert_eq!(path.params.slug, path.props.entry.slug);
            assert!(path.props.entry.is_live());
        }
        assert_eq!(paths[0].route(), "blog/absent/");
    }

    #[test]
    fn test_store_failure_propagates() {
        assert!(matches!(
            get_all_blog_entries(&BrokenStore),
            Err(ContentError::Io { .. })
        ));
        assert!(get_live_blog_entries(&BrokenStore).is_err());
        assert!(get_static_paths(&BrokenStore).is_err());
    }

    #[test]
    fn test_other_collections_ignored() {
        let mut store = fixture();
        let mut note = entry("note", 4, None);
        note.collection = "notes".to_string();
        store.insert(note);
        assert_eq!(get_all_blog_entries(&store).unwrap().len(), 4);
    }
}
