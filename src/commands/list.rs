//! List site content

use anyhow::{bail, Result};

use crate::content::unique_tags;
use crate::Blog;

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    for line in lines(blog, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// Lines printed by `list`, one header followed by one line per entry
pub fn lines(blog: &Blog, content_type: &str) -> Result<Vec<String>> {
    let repository = blog.repository();
    let mut lines = Vec::new();

    match content_type {
        "post" | "posts" => {
            let articles = repository.list_articles()?;
            lines.push(format!("Articles ({}):", articles.len()));
            for article in articles {
                let tag = article
                    .tag
                    .as_deref()
                    .map(|tag| format!(" #{}", tag))
                    .unwrap_or_default();
                lines.push(format!(
                    "  {} - {} [{}]{}",
                    article.date.format("%Y-%m-%d"),
                    article.title,
                    article.id,
                    tag
                ));
            }
        }
        "tag" | "tags" => {
            let articles = repository.list_articles()?;
            let tags = unique_tags(&articles);
            lines.push(format!("Tags ({}):", tags.len()));
            for tag in tags {
                let count = articles
                    .iter()
                    .filter(|a| a.tag.as_deref() == Some(tag.as_str()))
                    .count();
                lines.push(format!("  {} ({})", tag, count));
            }
        }
        "id" | "ids" => {
            let ids = repository.list_article_ids()?;
            lines.push(format!("Ids ({}):", ids.len()));
            lines.extend(ids.into_iter().map(|id| format!("  {}", id)));
        }
        _ => {
            bail!("Unknown type: {}. Available: post, tag, id", content_type);
        }
    }

    Ok(lines)
}
