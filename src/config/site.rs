//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::DEFAULT_THEME;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    /// `ru` or `en`; selects month names and interface strings
    pub language: String,

    // URL
    pub url: String,
    pub root: String,
    /// Route prefix of the article listing and detail pages
    pub blog_dir: String,
    /// Route segment of the per-tag listings, below `blog_dir`
    pub tag_dir: String,

    // Directory
    pub content_dir: String,
    pub about_file: String,
    pub public_dir: String,
    /// Copied verbatim into the public directory
    pub static_dir: String,
    pub languages_dir: String,

    /// Stylesheet paths linked from every page, relative to the root
    pub stylesheets: Vec<String>,

    // Home page
    pub recent_count: usize,

    pub menu: Vec<MenuItem>,

    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            language: "ru".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),
            blog_dir: "blog".to_string(),
            tag_dir: "tag".to_string(),

            content_dir: "content/blog".to_string(),
            about_file: "content/about.md".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            languages_dir: "languages".to_string(),

            stylesheets: Vec::new(),

            recent_count: 5,

            menu: vec![
                MenuItem {
                    name: "menu.blog".to_string(),
                    path: "blog/".to_string(),
                },
                MenuItem {
                    name: "menu.about".to_string(),
                    path: "about/".to_string(),
                },
            ],

            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }
}

/// Navigation entry; `name` may be an i18n key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_number: bool,
    /// Language for inline code spans without a `{.lang}` attribute
    pub inline_language: Option<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            line_number: true,
            inline_language: None,
        }
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass raw HTML in articles through; escape it when false
    pub raw_html: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            raw_html: true,
            smart_punctuation: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.language, "ru");
        assert_eq!(config.recent_count, 5);
        assert!(config.highlight.line_number);
        assert!(config.markdown.raw_html);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Olga Letova
author: Olga
language: en
recent_count: 3
highlight:
  theme: InspiredGitHub
  inline_language: rust
markdown:
  raw_html: false
menu:
  - name: Articles
    path: /blog/
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Olga Letova");
        assert_eq!(config.language, "en");
        assert_eq!(config.recent_count, 3);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(config.highlight.line_number);
        assert_eq!(config.highlight.inline_language.as_deref(), Some("rust"));
        assert!(!config.markdown.raw_html);
        assert_eq!(config.menu.len(), 1);
        assert_eq!(config.blog_dir, "blog");
    }
}
