//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::{HashMap, HashSet};

use crate::config::SiteConfig;

/// Bytes escaped in URL paths; the result is safe inside a quoted attribute
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// Absolute URLs (`https://...`, `//cdn...`) are returned unchanged.
///
/// # Examples
/// ```ignore
/// url_for(&config, "/css/style.css") // -> "/blog/css/style.css"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, encode_path(path))
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_absolute(path) {
        return path.to_string();
    }
    let base = config.url.trim_end_matches('/');
    format!("{}{}", base, url_for(config, path))
}

/// Percent-encode a URL path, keeping `/` separators
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH).to_string()
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("//") || path.contains("://")
}

/// URL-safe form of a tag
///
/// Non-latin tags are transliterated to ASCII.
pub fn tag_slug(tag: &str) -> String {
    let slug = slug::slugify(tag);
    if slug.is_empty() {
        "tag".to_string()
    } else {
        slug
    }
}

/// One distinct slug per tag
///
/// Tags that slugify alike (`C++` and `C#`, `Rust` and `rust`) keep their own
/// listing: the first keeps the plain slug, later ones get `-2`, `-3`, ...
#[derive(Debug, Clone, Default)]
pub struct TagSlugs {
    slugs: HashMap<String, String>,
}

impl TagSlugs {
    /// Assign slugs in the given tag order
    pub fn new(tags: &[String]) -> Self {
        let mut used = HashSet::new();
        let mut slugs = HashMap::new();

        for tag in tags {
            if slugs.contains_key(tag) {
                continue;
            }
            let base = tag_slug(tag);
            let mut slug = base.clone();
            let mut n = 2;
            while !used.insert(slug.clone()) {
                slug = format!("{}-{}", base, n);
                n += 1;
            }
            slugs.insert(tag.clone(), slug);
        }

        Self { slugs }
    }

    /// Slug of `tag`; tags not seen by `new` get their plain slug
    pub fn get(&self, tag: &str) -> String {
        self.slugs
            .get(tag)
            .cloned()
            .unwrap_or_else(|| tag_slug(tag))
    }
}

/// Site path of the article listing, e.g. `blog/`
pub fn blog_path(config: &SiteConfig) -> String {
    format!("{}/", config.blog_dir.trim_matches('/'))
}

/// Site path of an article detail page, e.g. `blog/hello/`
pub fn article_path(config: &SiteConfig, id: &str) -> String {
    format!("{}{}/", blog_path(config), id)
}

/// Site path of a tag listing, e.g. `blog/tag/rust/`
pub fn tag_path(config: &SiteConfig, slug: &str) -> String {
    format!(
        "{}{}/{}/",
        blog_path(config),
        config.tag_dir.trim_matches('/'),
        slug
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/site/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(url_for(&config, "/css/style.css"), "/site/css/style.css");
        assert_eq!(url_for(&config, "about/"), "/site/about/");
        assert_eq!(url_for(&config, ""), "/site/");
        assert_eq!(url_for(&SiteConfig::default(), "blog/"), "/blog/");
    }

    #[test]
    fn test_url_for_encodes_path() {
        let config = SiteConfig::default();
        assert_eq!(url_for(&config, "blog/my post/"), "/blog/my%20post/");
        assert_eq!(url_for(&config, "blog/a\"b/"), "/blog/a%22b/");
        assert_eq!(url_for(&config, "blog/заметки/"), "/blog/%D0%B7%D0%B0%D0%BC%D0%B5%D1%82%D0%BA%D0%B8/");
    }

    #[test]
    fn test_absolute_urls_pass_through() {
        let config = test_config();
        let cdn = "https://cdn.example.net/style.css";
        assert_eq!(url_for(&config, cdn), cdn);
        assert_eq!(url_for(&config, "//cdn.example.net/a.css"), "//cdn.example.net/a.css");
        assert_eq!(full_url_for(&config, cdn), cdn);
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/about/"),
            "https://example.com/site/about/"
        );
    }

    #[test]
    fn test_route_paths() {
        let config = SiteConfig::default();
        assert_eq!(blog_path(&config), "blog/");
        assert_eq!(article_path(&config, "hello-world"), "blog/hello-world/");
        assert_eq!(tag_path(&config, "rust-lang"), "blog/tag/rust-lang/");
    }

    #[test]
    fn test_tag_slug() {
        let slug = tag_slug("Путешествия");
        assert!(slug.starts_with("put"));
        assert!(slug.is_ascii());
        assert_eq!(tag_slug("C++"), "c");
        assert_eq!(tag_slug("!!!"), "tag");
    }

    #[test]
    fn test_tag_slugs_are_distinct() {
        let tags: Vec<String> = ["C++", "C#", "C", "c-2", "Rust", "rust"]
            .iter()
            .map(|t| t.to_string())
            .collect();
        let slugs = TagSlugs::new(&tags);

        assert_eq!(slugs.get("C++"), "c");
        assert_eq!(slugs.get("C#"), "c-2");
        assert_eq!(slugs.get("C"), "c-3");
        assert_eq!(slugs.get("c-2"), "c-2-2");
        assert_eq!(slugs.get("Rust"), "rust");
        assert_eq!(slugs.get("rust"), "rust-2");

        let unique: HashSet<String> = tags.iter().map(|t| slugs.get(t)).collect();
        assert_eq!(unique.len(), tags.len());

        assert_eq!(TagSlugs::default().get("Rust Lang"), "rust-lang");
    }
}
