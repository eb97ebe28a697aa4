//! Article models

use chrono::NaiveDateTime;
use serde::Serialize;

use super::frontmatter::{iso_date, FrontMatter};

/// Metadata of a blog article, as listed on the home and blog pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleMetadata {
    /// File name without extension
    pub id: String,

    pub title: String,

    /// Publication date, normalized at parse time
    #[serde(serialize_with = "iso_date::serialize")]
    pub date: NaiveDateTime,

    pub description: String,

    /// Single category label
    pub tag: Option<String>,
}

impl ArticleMetadata {
    pub fn new(id: impl Into<String>, front_matter: FrontMatter) -> Self {
        Self {
            id: id.into(),
            title: front_matter.title,
            date: front_matter.date,
            description: front_matter.description,
            tag: front_matter.tag,
        }
    }
}

/// A full article with its rendered HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    #[serde(flatten)]
    pub metadata: ArticleMetadata,

    /// Rendered HTML content
    pub content: String,
}
