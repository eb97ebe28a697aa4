//! Article repository - reads articles from the content directory

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Article, ArticleMetadata, FrontMatter, MarkdownRenderer};
use crate::error::ContentError;
use crate::Blog;

/// Result type for content operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Extensions recognized as articles, in lookup order
pub(crate) const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// Reads articles from the content directory
///
/// Nothing is cached: every call goes back to the filesystem.
pub struct ArticleRepository {
    content_dir: PathBuf,
    renderer: MarkdownRenderer,
}

impl ArticleRepository {
    /// Create a repository for the blog's content directory
    pub fn new(blog: &Blog) -> Self {
        Self::with_renderer(&blog.content_dir, MarkdownRenderer::from_config(&blog.config))
    }

    /// Create a repository with a specific renderer
    pub fn with_renderer<P: AsRef<Path>>(content_dir: P, renderer: MarkdownRenderer) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
            renderer,
        }
    }

    /// Markdown renderer used for article bodies
    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Load the metadata of every article, newest first
    ///
    /// Articles sharing a date keep their file name order. Any file that
    /// fails to parse aborts the whole listing.
    pub fn list_articles(&self) -> Result<Vec<ArticleMetadata>> {
        let mut articles = Vec::new();

        for (id, path) in self.article_files()? {
            let raw = read_source(&path)?;
            let (front_matter, _) = FrontMatter::parse(&raw)
                .map_err(|e| ContentError::malformed(&path, e.to_string()))?;
            articles.push(ArticleMetadata::new(id, front_matter));
        }

        // Stable sort keeps enumeration order for equal dates
        articles.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!(
            "Listed {} articles from {:?}",
            articles.len(),
            self.content_dir
        );

        Ok(articles)
    }

    /// Identifiers of every article, one per detail page
    pub fn list_article_ids(&self) -> Result<BTreeSet<String>> {
        Ok(self
            .article_files()?
            .into_iter()
            .map(|(id, _)| id)
            .collect())
    }

    /// Load a single article and render its body
    pub fn get_article(&self, id: &str) -> Result<Article> {
        self.ensure_store()?;

        let path = self.find_article(id).ok_or_else(|| ContentError::NotFound {
            id: id.to_string(),
        })?;

        let raw = read_source(&path)?;
        let (front_matter, body) = FrontMatter::parse(&raw)
            .map_err(|e| ContentError::malformed(&path, e.to_string()))?;

        let content = self
            .renderer
            .render(body)
            .map_err(|e| ContentError::Render {
                path: path.clone(),
                message: e.to_string(),
            })?;

        tracing::debug!("Rendered article {} from {:?}", id, path);

        Ok(Article {
            metadata: ArticleMetadata::new(id, front_matter),
            content,
        })
    }

    fn ensure_store(&self) -> Result<()> {
        if self.content_dir.is_dir() {
            Ok(())
        } else {
            Err(ContentError::StoreUnavailable {
                path: self.content_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            })
        }
    }

    fn find_article(&self, id: &str) -> Option<PathBuf> {
        if !is_valid_id(id) {
            return None;
        }
        MARKDOWN_EXTENSIONS
            .iter()
            .map(|ext| self.content_dir.join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file())
    }

    /// Markdown files of the content directory as (id, path), sorted by file name
    fn article_files(&self) -> Result<Vec<(String, PathBuf)>> {
        self.ensure_store()?;

        let mut files: Vec<(String, PathBuf)> = Vec::new();

        for entry in WalkDir::new(&self.content_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ContentError::StoreUnavailable {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.content_dir.clone()),
                source: io::Error::from(e),
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(id) = article_id(path) else {
                tracing::warn!("Skipping non-article file {:?}", path);
                continue;
            };

            if let Some((_, first)) = files.iter().find(|(existing, _)| *existing == id) {
                return Err(ContentError::malformed(
                    path,
                    format!("duplicate article id `{}` (also defined by {:?})", id, first),
                ));
            }

            files.push((id, path.to_path_buf()));
        }

        Ok(files)
    }
}

/// Article id for a markdown file, if the file is an article
fn article_id(path: &Path) -> Option<String> {
    let extension = path.extension().and_then(|e| e.to_str())?;
    if !MARKDOWN_EXTENSIONS.contains(&extension) {
        return None;
    }
    let stem = path.file_stem().and_then(|s| s.to_str())?;
    is_valid_id(stem).then(|| stem.to_string())
}

/// Ids are plain file stems: no separators and no hidden files
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && !id.starts_with('.') && !id.contains(['/', '\\', '\0'])
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::InvalidData => ContentError::malformed(path, "file is not valid UTF-8"),
        _ => ContentError::StoreUnavailable {
            path: path.to_path_buf(),
            source: e,
        },
    })
}
