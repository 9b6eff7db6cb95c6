//! URL helper functions

use crate::config::SiteConfig;

/// Prefix `path` with the site root, or `/` when no site is configured.
///
/// Plain concatenation: callers decide about leading slashes.
///
/// # Examples
/// ```ignore
/// url_to(&config, "blog/") // -> "https://example.com/blog/"
/// ```
pub fn url_to(config: &SiteConfig, path: &str) -> String {
    let root = config.site_href().unwrap_or_else(|| "/".to_string());
    format!("{}{}", root, path)
}

/// Site-relative path of a blog post page
pub fn post_path(slug: &str) -> String {
    format!("blog/{}/", slug)
}

/// Absolute link to a blog post: `{site}/blog/{slug}/`
pub fn post_link(site_href: &str, slug: &str) -> String {
    format!("{}/{}", site_href.trim_end_matches('/'), post_path(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_site(site: Option<&str>) -> SiteConfig {
        SiteConfig {
            site: site.map(str::to_string),
            ..SiteConfig::default()
        }
    }

    #[test]
    fn test_url_to_with_site() {
        let config = config_with_site(Some("https://example.com/"));
        assert_eq!(url_to(&config, "blog/"), "https://example.com/blog/");
    }

    #[test]
    fn test_url_to_bare_origin() {
        let config = config_with_site(Some("https://example.com"));
        assert_eq!(url_to(&config, "blog/"), "https://example.com/blog/");
    }

    #[test]
    fn test_url_to_without_site() {
        let config = config_with_site(None);
        assert_eq!(url_to(&config, "blog/"), "/blog/");
        assert_eq!(url_to(&config, ""), "/");
    }

    #[test]
    fn test_url_to_does_not_normalize() {
        let config = config_with_site(Some("https://example.com/"));
        assert_eq!(url_to(&config, "/blog/"), "https://example.com//blog/");
    }

    #[test]
    fn test_post_link() {
        assert_eq!(
            post_link("https://example.com/", "hello"),
            "https://example.com/blog/hello/"
        );
        assert_eq!(
            post_link("https://example.com", "2024/notes"),
            "https://example.com/blog/2024/notes/"
        );
    }
}
