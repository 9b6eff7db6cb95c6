//! Create a new blog post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::blog::BLOG_COLLECTION;
use crate::Folio;

/// Front matter of a freshly created post
fn scaffold(title: &str, date: &str, draft: bool) -> String {
    format!(
        r#"---
title: {title}
description: ''
publishDate: {date}
draft: {draft}
tags: []
---
"#,
        title = yaml_string(title),
        date = date,
        draft = draft
    )
}

/// Quote a value so YAML reads it back as a string
fn yaml_string(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Create a new post in the blog collection; returns its path
pub fn create_post(folio: &Folio, title: &str, draft: bool) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = folio.content_dir.join(BLOG_COLLECTION);
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = scaffold(title, &now.format("%Y-%m-%d").to_string(), draft);
    fs::write(&file_path, content)?;

    tracing::info!("Created post {:?}", file_path);
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blog;
    use tempfile::TempDir;

    #[test]
    fn test_created_post_passes_schema() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let path = create_post(&folio, "It's a New Post", true).unwrap();
        assert!(path.ends_with("blog/it-s-a-new-post.md"));

        let entries = blog::get_all_blog_entries(&folio.store()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].data.title, "It's a New Post");
        assert_eq!(entries[0].data.draft, Some(true));
        assert_eq!(entries[0].data.description.as_deref(), Some(""));
        assert!(blog::get_live_blog_entries(&folio.store()).unwrap().is_empty());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        create_post(&folio, "Twice", false).unwrap();
        assert!(create_post(&folio, "Twice", false).is_err());
    }

    #[test]
    fn test_rejects_unsluggable_title() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();
        assert!(create_post(&folio, "???", false).is_err());
    }
}
