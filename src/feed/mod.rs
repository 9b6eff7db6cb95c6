//! RSS 2.0 feed
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0">
//!   <channel>
//!     <title>Blog</title>
//!     <description>Blog posts</description>
//!     <link>https://example.com/</link>
//!     <language>en-gb</language>
//!     <item>
//!       <title>Hello</title>
//!       <link>https://example.com/blog/hello/</link>
//!       <guid isPermaLink="true">https://example.com/blog/hello/</guid>
//!       <description>First post</description>
//!       <pubDate>Wed, 03 Jan 2024 00:00:00 GMT</pubDate>
//!     </item>
//!   </channel>
//! </rss>
//! ```

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;

use crate::blog;
use crate::config::SiteConfig;
use crate::content::{BlogEntry, ContentError, ContentStore};
use crate::helpers::{date_rfc822, post_link};

/// Output path of the feed, relative to the site root
pub const FEED_PATH: &str = "rss.xml";

/// Content type served for the feed
pub const FEED_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("the feed needs an absolute site url; set `site` in _config.yml")]
    MissingSite,

    #[error("failed to write feed: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to write feed: {0}")]
    Io(#[from] std::io::Error),

    #[error("feed is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Channel metadata of the feed
#[derive(Debug, Clone)]
pub struct RssChannel<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Site root in href form
    pub site: &'a str,
    pub language: &'a str,
}

impl<'a> RssChannel<'a> {
    /// Channel for the configured site; the site url is mandatory
    pub fn new(config: &'a SiteConfig, site: &'a str) -> Self {
        Self {
            title: &config.title,
            description: &config.description,
            site,
            language: &config.language,
        }
    }

    /// Render the channel with one `<item>` per entry, in the given order
    pub fn render(&self, entries: &[BlogEntry]) -> Result<String, FeedError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut rss = BytesStart::new("rss");
        rss.push_attribute(("version", "2.0"));
        writer.write_event(Event::Start(rss))?;
        writer.write_event(Event::Start(BytesStart::new("channel")))?;

        push_text(&mut writer, "title", self.title)?;
        push_text(&mut writer, "description", self.description)?;
        push_text(&mut writer, "link", self.site)?;
        push_text(&mut writer, "language", self.language)?;

        for entry in entries {
            writer.write_event(Event::Start(BytesStart::new("item")))?;

            push_text(&mut writer, "title", &entry.data.title)?;

            let link = post_link(self.site, &entry.slug);
            push_text(&mut writer, "link", &link)?;

            let mut guid = BytesStart::new("guid");
            guid.push_attribute(("isPermaLink", "true"));
            writer.write_event(Event::Start(guid))?;
            writer.write_event(Event::Text(BytesText::new(&link)))?;
            writer.write_event(Event::End(BytesEnd::new("guid")))?;

            if let Some(description) = &entry.data.description {
                push_text(&mut writer, "description", description)?;
            }

            push_text(
                &mut writer,
                "pubDate",
                &date_rfc822(&entry.data.publish_date),
            )?;

            writer.write_event(Event::End(BytesEnd::new("item")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("channel")))?;
        writer.write_event(Event::End(BytesEnd::new("rss")))?;

        Ok(String::from_utf8(writer.into_inner().into_inner())?)
    }
}

/// Build the site feed from the live blog entries, newest first
pub fn build_feed<S>(config: &SiteConfig, store: &S) -> Result<String, FeedError>
where
    S: ContentStore + ?Sized,
{
    if config.site.is_none() {
        return Err(FeedError::MissingSite);
    }

    let mut entries = blog::get_live_blog_entries(store)?;
    blog::sort(&mut entries);

    render_feed(config, &entries)
}

/// Render already loaded entries for the configured site, in the given order
pub fn render_feed(config: &SiteConfig, entries: &[BlogEntry]) -> Result<String, FeedError> {
    let site = config.site_href().ok_or(FeedError::MissingSite)?;
    RssChannel::new(config, &site).render(entries)
}

fn push_text(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    tag: &str,
    text: &str,
) -> quick_xml::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
