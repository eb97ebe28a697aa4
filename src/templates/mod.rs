//! Built-in blog templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{Article, ArticleMetadata};
use crate::helpers::{self, url_for, TagSlugs};

/// Template renderer with the embedded blog theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    ///
    /// `language` selects the month names used by the `date_format` filter.
    pub fn new(language: &str) -> Result<Self> {
        let mut tera = Tera::default();

        // Article HTML is inserted verbatim; text goes through `| escape`,
        // links are encoded by `url_for` and printed as-is
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("macros.html", include_str!("blog/macros.html")),
            ("index.html", include_str!("blog/index.html")),
            ("blog.html", include_str!("blog/blog.html")),
            ("article.html", include_str!("blog/article.html")),
            ("about.html", include_str!("blog/about.html")),
            ("404.html", include_str!("blog/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
        ])?;

        let language = language.to_string();
        tera.register_filter(
            "date_format",
            move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
                let s = tera::try_get_value!("date_format", "value", String, value);
                // Anything that is not a date is passed through untouched
                Ok(tera::Value::String(
                    helpers::format_date_str(&s, &language).unwrap_or(s),
                ))
            },
        );

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub stylesheets: Vec<String>,
}

impl ConfigData {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: url_for(config, ""),
            stylesheets: config
                .stylesheets
                .iter()
                .map(|s| url_for(config, s))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuItemData {
    pub name: String,
    pub path: String,
    pub active: bool,
}

/// Article as shown in previews
#[derive(Debug, Clone, Serialize)]
pub struct ArticleData {
    pub id: String,
    pub title: String,
    /// ISO date, formatted in templates with `date_format`
    pub date: String,
    pub description: String,
    pub tag: Option<String>,
    pub path: String,
    pub tag_path: Option<String>,
}

impl ArticleData {
    pub fn new(config: &SiteConfig, slugs: &TagSlugs, article: &ArticleMetadata) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            date: helpers::date_xml(&article.date),
            description: article.description.clone(),
            tag: article.tag.clone(),
            path: url_for(config, &helpers::article_path(config, &article.id)),
            tag_path: article
                .tag
                .as_ref()
                .map(|tag| url_for(config, &helpers::tag_path(config, &slugs.get(tag)))),
        }
    }
}

/// Article detail page data
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePageData {
    #[serde(flatten)]
    pub article: ArticleData,
    /// Rendered HTML content
    pub content: String,
}

impl ArticlePageData {
    pub fn new(config: &SiteConfig, slugs: &TagSlugs, article: &Article) -> Self {
        Self {
            article: ArticleData::new(config, slugs, &article.metadata),
            content: article.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagData {
    pub name: String,
    pub path: String,
    pub active: bool,
}

impl TagData {
    pub fn new(config: &SiteConfig, slugs: &TagSlugs, name: &str, active: bool) -> Self {
        Self {
            name: name.to_string(),
            path: url_for(config, &helpers::tag_path(config, &slugs.get(name))),
            active,
        }
    }
}
