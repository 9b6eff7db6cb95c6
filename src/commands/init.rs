//! Initialize a new blog

use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;
use crate::helpers::ICONS;
use crate::CONFIG_FILE;

const CONFIG_TEMPLATE: &str = r#"# Site
title: Blog
description: Blog posts
language: en-gb

# URL root of the deployed site; the RSS feed is only built when set
site: https://example.com/

# Directory
content_dir: src/content
public_dir: dist
public_assets_dir: public
icons_dir: assets/icons

# Home page
home_posts: 5

# Markdown
markdown:
  theme: base16-ocean.dark
  remark_plugins:
    - remark-gfm
    - remark-smartypants
  rehype_plugins:
    - [rehype-external-links, { target: _blank }]
"#;

const STYLESHEET: &str = r#"body {
  margin: 0 auto;
  max-width: 42rem;
  padding: 1rem;
  font-family: system-ui, sans-serif;
  line-height: 1.6;
}

.social svg {
  width: 1.25rem;
  height: 1.25rem;
}

figure.highlight pre {
  overflow-x: auto;
  padding: 0.75rem;
}
"#;

fn sample_post(date: &str) -> String {
    format!(
        r#"---
title: Hello World
description: The first post on this blog
publishDate: {date}
tags: [meta]
---

Welcome! This post was created by `folio init`.

## Writing

```bash
$ folio new "My New Post"
```

New posts start with `draft: false`; pass `--draft` to keep one out of
the listing and the feed until it is ready.

## Building

```bash
$ folio build
$ folio serve --watch
```
"#,
        date = date
    )
}

/// Placeholder SVG so a new site builds before real icons are dropped in
fn placeholder_icon(name: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16" aria-label="{}"><circle cx="8" cy="8" r="7"/></svg>
"#,
        name
    )
}

/// Initialize a new site in the given directory.
///
/// Existing files are left alone, so running it twice is harmless.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config = SiteConfig::parse(CONFIG_TEMPLATE)?;

    let posts_dir = target_dir.join(&config.content_dir).join("blog");
    let assets_dir = target_dir.join(&config.public_assets_dir);
    let icons_dir = target_dir.join(&config.icons_dir);

    fs::create_dir_all(&posts_dir)
        .with_context(|| format!("Failed to create {:?}", posts_dir))?;
    fs::create_dir_all(&assets_dir)?;

    write_new(&target_dir.join(CONFIG_FILE), CONFIG_TEMPLATE)?;

    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    write_new(&posts_dir.join("hello-world.md"), &sample_post(&today))?;

    write_new(&assets_dir.join("style.css"), STYLESHEET)?;

    for (name, file) in ICONS {
        let path = icons_dir.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        write_new(&path, &placeholder_icon(name))?;
    }

    Ok(())
}

fn write_new(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("{:?} already exists, leaving it as is", path);
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{blog, Folio};
    use tempfile::TempDir;

    #[test]
    fn test_init_site_builds() {
        let tmp = TempDir::new().unwrap();
        init_site(tmp.path()).unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(folio.config.site.as_deref(), Some("https://example.com/"));
        assert_eq!(folio.config.markdown.remark_plugins.len(), 2);

        let posts = blog::get_live_blog_entries(&folio.store()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");

        let report = folio.build().unwrap();
        assert_eq!(report.pages, 1);
        assert!(report.feed);
        assert_eq!(report.assets, 1);
        assert!(folio.public_dir.join("blog/hello-world/index.html").exists());
        assert!(folio.public_dir.join("style.css").exists());
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "title: Mine\n").unwrap();

        init_site(tmp.path()).unwrap();

        let config = fs::read_to_string(tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, "title: Mine\n");
    }
}
