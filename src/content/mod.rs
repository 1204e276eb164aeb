//! Content module - handles posts, front-matter and Markdown rendering

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::{ContentError, FrontMatterError};
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{title_from_name, DateSource, Post};
