//! Markdown rendering with syntax highlighting
//!
//! The renderer is configured from the site's `markdown` section. Plugin
//! names follow the remark/rehype ecosystem so that existing site configs
//! keep working; each recognised name switches on the equivalent
//! pulldown-cmark option or event rewrite.

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::{MarkdownConfig, PluginSpec};

const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Attributes added to external links
#[derive(Debug, Clone, PartialEq, Eq)]
struct ExternalLinks {
    target: Option<String>,
    rel: Option<String>,
}

impl ExternalLinks {
    fn from_plugin(plugin: &PluginSpec) -> Self {
        let target = plugin.option("target").map(str::to_string);
        let rel = plugin.option("rel").map(str::to_string).or_else(|| {
            target
                .as_ref()
                .map(|_| "nofollow noopener noreferrer".to_string())
        });
        Self { target, rel }
    }
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    options: Options,
    external_links: Option<ExternalLinks>,
}

impl MarkdownRenderer {
    /// Create a renderer with plain CommonMark and the default theme
    pub fn new() -> Self {
        Self::from_config(&MarkdownConfig::default())
    }

    /// Create a renderer from the site's markdown configuration
    pub fn from_config(config: &MarkdownConfig) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let theme_name = if theme_set.themes.contains_key(&config.theme) {
            config.theme.clone()
        } else {
            tracing::warn!(
                "Unknown highlight theme {:?}, falling back to {}",
                config.theme,
                DEFAULT_THEME
            );
            DEFAULT_THEME.to_string()
        };

        let mut options = Options::empty();
        for plugin in &config.remark_plugins {
            match plugin.name() {
                "remark-gfm" => {
                    options |= Options::ENABLE_TABLES
                        | Options::ENABLE_FOOTNOTES
                        | Options::ENABLE_STRIKETHROUGH
                        | Options::ENABLE_TASKLISTS
                        | Options::ENABLE_GFM;
                }
                "remark-smartypants" => options |= Options::ENABLE_SMART_PUNCTUATION,
                other => tracing::warn!("Ignoring unsupported remark plugin {:?}", other),
            }
        }

        let mut external_links = None;
        for plugin in &config.rehype_plugins {
            match plugin.name() {
                "rehype-external-links" => {
                    external_links = Some(ExternalLinks::from_plugin(plugin));
                }
                other => tracing::warn!("Ignoring unsupported rehype plugin {:?}", other),
            }
        }

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name,
            options,
            external_links,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            // Only the first word names the language (```rust title="x")
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    ..
                }) if link_type != LinkType::Email && is_external(&dest_url) => {
                    if let Some(attrs) = &self.external_links {
                        events.push(Event::InlineHtml(CowStr::from(external_anchor(
                            &dest_url, &title, attrs,
                        ))));
                    } else {
                        events.push(Event::Start(Tag::Link {
                            link_type,
                            dest_url,
                            title,
                            id: CowStr::Borrowed(""),
                        }));
                    }
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            });

        match highlighted {
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_external(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

fn external_anchor(href: &str, title: &str, attrs: &ExternalLinks) -> String {
    let mut anchor = format!(r#"<a href="{}""#, html_escape(href));
    if !title.is_empty() {
        anchor.push_str(&format!(r#" title="{}""#, html_escape(title)));
    }
    if let Some(target) = &attrs.target {
        anchor.push_str(&format!(r#" target="{}""#, html_escape(target)));
    }
    if let Some(rel) = &attrs.rel {
        anchor.push_str(&format!(r#" rel="{}""#, html_escape(rel)));
    }
    anchor.push('>');
    anchor
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
