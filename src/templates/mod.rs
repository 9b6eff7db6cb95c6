//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Presentation helpers are exposed to
//! them as filters (`format_date`, `date_iso`) and as the `url_to(path=...)`
//! function.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{date_iso, format_date, url_to, IconSet};

/// Site-wide values available to every template as `site`
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    /// Whether an RSS feed is published
    pub has_feed: bool,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            has_feed: config.site.is_some(),
        }
    }
}

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Rendered post HTML and icon SVG are inserted verbatim; user text
        // is escaped explicitly in the templates.
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("blog.html", include_str!("site/blog.html")),
            ("post.html", include_str!("site/post.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/post_list.html",
                include_str!("site/partials/post_list.html"),
            ),
        ])?;

        tera.register_filter("format_date", format_date_filter);
        tera.register_filter("date_iso", date_iso_filter);

        let url_config = config.clone();
        tera.register_function(
            "url_to",
            move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
                let path = match args.get("path") {
                    Some(val) => tera::try_get_value!("url_to", "path", String, val),
                    None => String::new(),
                };
                Ok(tera::Value::String(url_to(&url_config, &path)))
            },
        );

        Ok(Self { tera })
    }

    /// Context holding `site` and `icons`
    pub fn base_context(&self, site: &SiteData, icons: &IconSet) -> Context {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("icons", icons);
        context
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

fn parse_date_value(filter: &str, value: &tera::Value) -> tera::Result<DateTime<Utc>> {
    let s = tera::try_get_value!(filter, "value", String, value);
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| tera::Error::msg(format!("Filter `{}`: invalid date {:?}: {}", filter, s, e)))
}

/// Tera filter: long UK date, e.g. "3 January 2024"
fn format_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let date = parse_date_value("format_date", value)?;
    Ok(tera::Value::String(format_date(&date)))
}

/// Tera filter: ISO calendar date, e.g. "2024-01-03"
fn date_iso_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let date = parse_date_value("date_iso", value)?;
    Ok(tera::Value::String(date_iso(&date)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BlogData, BlogEntry};
    use chrono::TimeZone;

    fn post() -> BlogEntry {
        BlogEntry {
            id: "hello.md".to_string(),
            slug: "hello".to_string(),
            collection: "blog".to_string(),
            data: BlogData {
                title: "Fish & Chips".to_string(),
                description: Some("A short post".to_string()),
                publish_date: Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
                draft: None,
                tags: vec!["food".to_string()],
            },
            body: String::new(),
        }
    }

    fn config() -> SiteConfig {
        SiteConfig {
            title: "Test Blog".to_string(),
            site: Some("https://example.com/".to_string()),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_render_post_page() {
        let config = config();
        let renderer = TemplateRenderer::new(&config).unwrap();
        let mut context = renderer.base_context(&SiteData::from_config(&config), &IconSet::default());
        context.insert("post", &post());
        context.insert("content", "<p>Body</p>");

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<h1>Fish &amp; Chips</h1>"));
        assert!(html.contains(r#"<time datetime="2024-01-03">3 January 2024</time>"#));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<li>food</li>"));
        assert!(html.contains(r#"href="https://example.com/rss.xml""#));
    }

    #[test]
    fn test_render_listing_links() {
        let config = SiteConfig {
            site: None,
            ..config()
        };
        let renderer = TemplateRenderer::new(&config).unwrap();
        let mut context = renderer.base_context(&SiteData::from_config(&config), &IconSet::default());
        context.insert("posts", &vec![post()]);

        let html = renderer.render("blog.html", &context).unwrap();
        assert!(html.contains(r#"<a href="/blog/hello/">Fish &amp; Chips</a>"#));
        assert!(!html.contains("rss.xml"));
    }

    #[test]
    fn test_site_text_is_escaped() {
        let config = SiteConfig {
            title: "Tom & Jerry".to_string(),
            description: "Cats <and> mice".to_string(),
            ..config()
        };
        let renderer = TemplateRenderer::new(&config).unwrap();
        let mut context = renderer.base_context(&SiteData::from_config(&config), &IconSet::default());
        context.insert("posts", &vec![post()]);

        let html = renderer.render("home.html", &context).unwrap();
        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("<p>Cats &lt;and&gt; mice</p>"));
        assert!(html.contains("&copy; Tom &amp; Jerry"));
        assert!(!html.contains("Tom & Jerry"));
        assert!(!html.contains("<and>"));
    }

    #[test]
    fn test_format_date_filter_rejects_garbage() {
        let value = tera::Value::String("soon".to_string());
        assert!(format_date_filter(&value, &HashMap::new()).is_err());
    }
}
