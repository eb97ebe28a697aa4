//! Errors raised while reading and rendering content

use std::path::PathBuf;
use thiserror::Error;

/// Content pipeline errors
///
/// Every variant names the file or id it concerns so a failed build
/// points straight at the offending article.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content store unavailable at {path:?}: {source}")]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content in {path:?}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("Article not found: {id}")]
    NotFound { id: String },

    #[error("Failed to render {path:?}: {message}")]
    Render { path: PathBuf, message: String },
}

impl ContentError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}
