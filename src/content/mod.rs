//! Content module - article parsing, rendering and listing

mod article;
mod frontmatter;
mod markdown;
mod repository;
mod tags;

pub use article::{Article, ArticleMetadata};
pub use frontmatter::{parse_date_string, FrontMatter, FrontMatterError};
pub use markdown::{MarkdownError, MarkdownRenderer, DEFAULT_THEME};
pub use repository::{ArticleRepository, Result};
pub(crate) use repository::{is_valid_id, MARKDOWN_EXTENSIONS};
pub use tags::{filter_by_tag, unique_tags};
