//! Generator module - writes the static site using the built-in templates

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use crate::blog::{self, StaticPath, BLOG_COLLECTION};
use crate::content::{BlogEntry, ContentStore, MarkdownRenderer};
use crate::feed::{self, FEED_PATH};
use crate::helpers::IconSet;
use crate::templates::{SiteData, TemplateRenderer};
use crate::Folio;

/// What a build produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Post pages written
    pub pages: usize,
    /// Drafts among the post pages
    pub drafts: usize,
    /// Whether rss.xml was written
    pub feed: bool,
    /// Static assets copied
    pub assets: usize,
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
    icons: IconSet,
    render_drafts: bool,
}

impl Generator {
    /// Create a new generator; loads the icon set up front
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new(&folio.config)?;
        let markdown = MarkdownRenderer::from_config(&folio.config.markdown);
        let icons = IconSet::load(&folio.icons_dir)?;

        Ok(Self {
            folio: folio.clone(),
            renderer,
            markdown,
            icons,
            render_drafts: false,
        })
    }

    /// Also write pages for draft posts (they stay out of listings and the feed)
    pub fn with_drafts(mut self, render_drafts: bool) -> Self {
        self.render_drafts = render_drafts;
        self
    }

    /// Generate the entire site
    pub fn generate<S: ContentStore + ?Sized>(&self, store: &S) -> Result<BuildReport> {
        let public_dir = &self.folio.public_dir;
        fs::create_dir_all(public_dir)
            .with_context(|| format!("Failed to create {:?}", public_dir))?;

        // One read of the collection feeds pages, listings and the feed
        let mut all = blog::get_all_blog_entries(store)?;
        blog::sort(&mut all);
        let live: Vec<BlogEntry> = all.iter().filter(|e| e.is_live()).cloned().collect();

        self.remove_stale_posts()?;

        let mut report = BuildReport {
            assets: self.copy_public_assets()?,
            ..BuildReport::default()
        };

        let site = SiteData::from_config(&self.folio.config);

        self.generate_home(&live, &site)?;
        self.generate_blog_index(&live, &site)?;

        let pages = if self.render_drafts { &all } else { &live };
        for path in pages.iter().cloned().map(StaticPath::for_entry) {
            self.generate_post_page(&path, &site)?;
            report.pages += 1;
            if !path.props.entry.is_live() {
                report.drafts += 1;
            }
        }

        report.feed = self.generate_feed(&live)?;

        tracing::info!(
            "Generated {} post pages ({} drafts), feed: {}",
            report.pages,
            report.drafts,
            report.feed
        );

        Ok(report)
    }

    /// Home page with the most recent posts
    fn generate_home(&self, live: &[BlogEntry], site: &SiteData) -> Result<()> {
        let recent = &live[..live.len().min(self.folio.config.home_posts)];

        let mut context = self.renderer.base_context(site, &self.icons);
        context.insert("posts", recent);

        let html = self.renderer.render("home.html", &context)?;
        self.write_page("", &html)
    }

    /// Listing of every live post
    fn generate_blog_index(&self, live: &[BlogEntry], site: &SiteData) -> Result<()> {
        let mut context = self.renderer.base_context(site, &self.icons);
        context.insert("posts", live);

        let html = self.renderer.render("blog.html", &context)?;
        self.write_page("blog/", &html)
    }

    /// One post page at `/blog/{slug}/`
    fn generate_post_page(&self, path: &StaticPath, site: &SiteData) -> Result<()> {
        let entry = &path.props.entry;
        let content = self.markdown.render(&entry.body);

        let mut context = self.renderer.base_context(site, &self.icons);
        context.insert("post", entry);
        context.insert("content", &content);

        let html = self
            .renderer
            .render("post.html", &context)
            .with_context(|| format!("Failed to render post {:?}", entry.id))?;
        self.write_page(&path.route(), &html)
    }

    /// Write rss.xml; skipped with a warning when no site url is configured
    fn generate_feed(&self, live: &[BlogEntry]) -> Result<bool> {
        match feed::render_feed(&self.folio.config, live) {
            Ok(xml) => {
                let output_path = self.folio.public_dir.join(FEED_PATH);
                fs::write(&output_path, xml)
                    .with_context(|| format!("Failed to write {:?}", output_path))?;
                tracing::info!("Generated {}", FEED_PATH);
                Ok(true)
            }
            Err(feed::FeedError::MissingSite) => {
                tracing::warn!("No `site` configured, skipping {}", FEED_PATH);
                let stale = self.folio.public_dir.join(FEED_PATH);
                if stale.exists() {
                    fs::remove_file(&stale)
                        .with_context(|| format!("Failed to remove {:?}", stale))?;
                }
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Drop post pages of an earlier build; posts may have become drafts
    /// or changed slug since
    fn remove_stale_posts(&self) -> Result<()> {
        let posts_dir = self.folio.public_dir.join(BLOG_COLLECTION);
        if posts_dir.exists() {
            fs::remove_dir_all(&posts_dir)
                .with_context(|| format!("Failed to remove {:?}", posts_dir))?;
            tracing::debug!("Removed {:?}", posts_dir);
        }
        Ok(())
    }

    /// Write `html` to `<public_dir>/<route>/index.html`
    fn write_page(&self, route: &str, html: &str) -> Result<()> {
        // Strip leading slash from route to avoid creating absolute paths
        let clean_route = route.trim_start_matches('/');
        if Path::new(clean_route)
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            anyhow::bail!("Refusing to write outside the public directory: {:?}", route);
        }
        let output_path = self
            .folio
            .public_dir
            .join(clean_route)
            .join("index.html");
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, html)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy the public assets directory verbatim
    fn copy_public_assets(&self) -> Result<usize> {
        let assets_dir = &self.folio.assets_dir;
        if !assets_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(assets_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = path.strip_prefix(assets_dir)?;
            let dest = self.folio.public_dir.join(relative);
            copy_file(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} assets from {:?}", copied, assets_dir);
        Ok(copied)
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{BlogData, ContentError, MemoryStore};
    use crate::helpers::ICONS;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Counts collection reads
    struct CountingStore {
        inner: MemoryStore,
        reads: Cell<usize>,
    }

    impl ContentStore for CountingStore {
        fn get_collection(&self, collection: &str) -> Result<Vec<BlogEntry>, ContentError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.get_collection(collection)
        }
    }

    fn entry(slug: &str, day: u32, draft: Option<bool>) -> BlogEntry {
        BlogEntry {
            id: format!("{}.md", slug),
            slug: slug.to_string(),
            collection: BLOG_COLLECTION.to_string(),
            data: BlogData {
                title: slug.to_string(),
                description: None,
                publish_date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
                draft,
                tags: Vec::new(),
            },
            body: "Body".to_string(),
        }
    }

    fn folio(tmp: &TempDir) -> Folio {
        let config = SiteConfig {
            site: Some("https://example.com/".to_string()),
            ..SiteConfig::default()
        };
        let folio = Folio::with_config(tmp.path().to_path_buf(), config);
        for (_, file) in ICONS {
            let path = folio.icons_dir.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "<svg></svg>").unwrap();
        }
        folio
    }

    #[test]
    fn test_collection_read_once_per_build() {
        let tmp = TempDir::new().unwrap();
        let folio = folio(&tmp);
        let store = CountingStore {
            inner: MemoryStore::with_collection(
                BLOG_COLLECTION,
                vec![entry("old", 1, None), entry("new", 2, None), entry("wip", 3, Some(true))],
            ),
            reads: Cell::new(0),
        };

        let report = Generator::new(&folio).unwrap().generate(&store).unwrap();
        assert_eq!(store.reads.get(), 1);
        assert_eq!(report.pages, 2);
        assert!(report.feed);

        let feed = fs::read_to_string(folio.public_dir.join(FEED_PATH)).unwrap();
        assert_eq!(feed.matches("<item>").count(), 2);
        assert!(feed.find("blog/new/").unwrap() < feed.find("blog/old/").unwrap());
    }

    #[test]
    fn test_write_page_stays_in_public_dir() {
        let tmp = TempDir::new().unwrap();
        let folio = folio(&tmp);
        let generator = Generator::new(&folio).unwrap();

        assert!(generator.write_page("blog/../../x/", "<p></p>").is_err());
        assert!(generator.write_page("/etc/", "<p></p>").is_ok());
        assert!(folio.public_dir.join("etc/index.html").exists());
        assert!(!tmp.path().join("x").exists());
    }
}
