//! Create a new article

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::content::{is_valid_id, FrontMatter, MARKDOWN_EXTENSIONS};
use crate::Blog;

/// Options of the `new` command
#[derive(Debug, Clone, Default)]
pub struct NewArticle {
    pub title: String,
    pub tag: Option<String>,
    pub description: Option<String>,
    /// File name without extension; derived from the title when absent
    pub id: Option<String>,
}

impl NewArticle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    fn article_id(&self) -> String {
        match &self.id {
            Some(id) => id.trim().to_string(),
            None => slug::slugify(&self.title),
        }
    }
}

/// Write a new article skeleton dated today and return its path
pub fn create_article(blog: &Blog, options: &NewArticle) -> Result<PathBuf> {
    let id = options.article_id();
    if !is_valid_id(&id) {
        bail!("Cannot derive an article id from {:?}; pass one with --id", options.title);
    }

    for extension in MARKDOWN_EXTENSIONS {
        let existing = blog.content_dir.join(format!("{}.{}", id, extension));
        if existing.exists() {
            bail!("Article already exists: {:?}", existing);
        }
    }

    let front_matter = FrontMatter {
        title: options.title.clone(),
        date: chrono::Local::now()
            .date_naive()
            .and_time(chrono::NaiveTime::default()),
        description: options.description.clone().unwrap_or_default(),
        tag: options.tag.clone().filter(|tag| !tag.trim().is_empty()),
    };

    fs::create_dir_all(&blog.content_dir)
        .with_context(|| format!("Failed to create {:?}", blog.content_dir))?;

    let file_path = blog.content_dir.join(format!("{}.md", id));
    let content = format!("{}\n", front_matter.to_block()?);
    fs::write(&file_path, content).with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
