//! Post model

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Where a post's date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    /// Explicit `date` in the front-matter
    FrontMatter,
    /// Substituted build date
    BuildDate,
}

/// A blog post
#[derive(Debug, Clone)]
pub struct Post {
    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Whether the date was explicit or substituted
    pub date_source: DateSource,

    /// Raw markdown content (front-matter removed)
    pub raw: String,

    /// Rendered HTML content, filled in by the render pass
    pub content: Option<String>,

    /// Markdown source file
    pub source: PathBuf,

    /// Containing directory for directory-style posts (holds the post's assets)
    pub asset_dir: Option<PathBuf>,

    /// Slug (URL-friendly name)
    pub slug: String,

    /// URL path relative to the site root, e.g. `posts/hello-world/`
    pub path: String,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: String, date: NaiveDate, slug: String, source: PathBuf) -> Self {
        let path = format!("posts/{}/", slug);
        Self {
            title,
            date,
            date_source: DateSource::FrontMatter,
            raw: String::new(),
            content: None,
            source,
            asset_dir: None,
            slug,
            path,
        }
    }

    /// Date formatted for display
    pub fn date_string(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Directory this post is written to under an output root
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join("posts").join(&self.slug)
    }
}

/// Derive a display title from a file or directory name.
///
/// Hyphens become spaces; underscores are kept, so `hello-world_again`
/// becomes `Hello World_Again`.
pub fn title_from_name(name: &str) -> String {
    let spaced = name.replace('-', " ");

    let mut title = String::with_capacity(spaced.len());
    let mut prev_is_letter = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                title.extend(c.to_lowercase());
            } else {
                title.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            title.push(c);
            prev_is_letter = false;
        }
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_name() {
        assert_eq!(title_from_name("hello-world"), "Hello World");
        assert_eq!(title_from_name("hello-world_again"), "Hello World_Again");
        assert_eq!(title_from_name("hello_world"), "Hello_World");
        assert_eq!(title_from_name("RUST-tips"), "Rust Tips");
        assert_eq!(title_from_name("2024-recap"), "2024 Recap");
    }

    #[test]
    fn test_post_paths() {
        let post = Post::new(
            "Hello".to_string(),
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "hello".to_string(),
            PathBuf::from("published/hello.md"),
        );
        assert_eq!(post.path, "posts/hello/");
        assert_eq!(post.date_string(), "2024-01-05");
        assert_eq!(
            post.output_dir(Path::new("docs")),
            PathBuf::from("docs/posts/hello")
        );
        assert!(post.content.is_none());
    }
}
