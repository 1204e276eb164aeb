//! Content errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while splitting a front-matter block from its body
#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("opening `{0}` delimiter has no closing delimiter")]
    Unclosed(&'static str),

    #[error("invalid YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that abort content loading
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed front-matter in {}", path.display())]
    MalformedFrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("post name {} produces an empty slug", path.display())]
    EmptySlug { path: PathBuf },

    #[error("post {} has no usable date", path.display())]
    MissingDate { path: PathBuf },

    #[error("duplicate post slug `{slug}`: {} and {}", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("post directory {} contains {count} Markdown files, expected exactly one", path.display())]
    AmbiguousPostDir { path: PathBuf, count: usize },
}
