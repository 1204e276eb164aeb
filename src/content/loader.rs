//! Content loader - discovers posts and extracts their metadata

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::post::title_from_name;
use super::{ContentError, DateSource, FrontMatter, Post};
use crate::config::MissingDatePolicy;
use crate::Mdpress;

/// A discovered post before its metadata is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSource {
    /// Markdown file
    pub markdown: PathBuf,
    /// Containing directory for directory-style posts
    pub asset_dir: Option<PathBuf>,
    /// File stem or directory name; source of the slug and fallback title
    pub name: String,
}

/// Loads content from the posts directory
pub struct ContentLoader<'a> {
    app: &'a Mdpress,
    build_date: NaiveDate,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(app: &'a Mdpress) -> Self {
        Self {
            app,
            build_date: app.config.build_date(),
        }
    }

    /// The date substituted for missing post dates
    pub fn build_date(&self) -> NaiveDate {
        self.build_date
    }

    /// Load all posts, newest first
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let sources = self.discover()?;

        let mut posts: Vec<Post> = Vec::with_capacity(sources.len());
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for source in &sources {
            let Some(post) = self.load_post(source)? else {
                continue;
            };

            if let Some(first) = seen.get(&post.slug) {
                return Err(ContentError::DuplicateSlug {
                    slug: post.slug.clone(),
                    first: first.clone(),
                    second: post.source.clone(),
                }
                .into());
            }
            seen.insert(post.slug.clone(), post.source.clone());
            posts.push(post);
        }

        // Sort by date descending (newest first); stable, so discovery order breaks ties
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Enumerate post sources in file name order
    pub fn discover(&self) -> Result<Vec<PostSource>> {
        let posts_dir = &self.app.posts_dir;
        if !posts_dir.is_dir() {
            anyhow::bail!("Posts directory not found: {}", posts_dir.display());
        }

        let mut sources = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if is_hidden(path) {
                continue;
            }

            if entry.file_type().is_file() {
                if is_markdown_file(path) {
                    sources.push(PostSource {
                        markdown: path.to_path_buf(),
                        asset_dir: None,
                        name: file_stem(path),
                    });
                }
            } else if entry.file_type().is_dir() {
                match find_post_markdown(path)? {
                    Some(markdown) => sources.push(PostSource {
                        markdown,
                        asset_dir: Some(path.to_path_buf()),
                        name: file_name(path),
                    }),
                    None => tracing::warn!("Skipping {:?}: no Markdown file inside", path),
                }
            }
        }

        Ok(sources)
    }

    /// Load a single post. `None` when the post is skipped for lack of a date
    pub fn load_post(&self, source: &PostSource) -> Result<Option<Post>> {
        let path = &source.markdown;
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read post {}", path.display()))?;
        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::MalformedFrontMatter {
                path: path.clone(),
                source: e,
            })?;

        let (date, date_source) = match fm.parse_date() {
            Some(date) => (date, DateSource::FrontMatter),
            None => match self.app.config.missing_date {
                MissingDatePolicy::BuildDate => {
                    tracing::warn!(
                        "Post {:?} has no usable date, using build date {}",
                        path,
                        self.build_date
                    );
                    (self.build_date, DateSource::BuildDate)
                }
                MissingDatePolicy::Skip => {
                    tracing::warn!("Skipping post {:?}: no usable date", path);
                    return Ok(None);
                }
                MissingDatePolicy::Error => {
                    return Err(ContentError::MissingDate { path: path.clone() }.into());
                }
            },
        };

        // Get title from front-matter or the post name
        let title = fm.title.unwrap_or_else(|| title_from_name(&source.name));

        let slug = slug::slugify(&source.name);
        if slug.is_empty() {
            return Err(ContentError::EmptySlug { path: path.clone() }.into());
        }

        let mut post = Post::new(title, date, slug, path.clone());
        post.date_source = date_source;
        post.raw = body.to_string();
        post.asset_dir = source.asset_dir.clone();

        Ok(Some(post))
    }

    /// Read the about page body, front-matter removed. `None` when absent
    pub fn load_about(&self) -> Result<Option<String>> {
        let path = &self.app.about_path;
        if !path.is_file() {
            tracing::warn!("About file not found at {:?}", path);
            return Ok(None);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read about file {}", path.display()))?;
        let (_, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::MalformedFrontMatter {
                path: path.clone(),
                source: e,
            })?;

        Ok(Some(body.to_string()))
    }
}

/// Find the single Markdown file of a directory-style post
fn find_post_markdown(dir: &Path) -> Result<Option<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown_file(entry.path()) {
            found.push(entry.into_path());
        }
    }

    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        count => Err(ContentError::AmbiguousPostDir {
            path: dir.to_path_buf(),
            count,
        }
        .into()),
    }
}

/// Check if a file is a markdown file
pub(crate) fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "untitled".to_string())
}
