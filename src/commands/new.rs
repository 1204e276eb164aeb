//! Create a new post

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Mdpress;

#[derive(Serialize)]
struct NewPostMeta<'a> {
    title: &'a str,
    date: String,
}

/// Create a new post under the posts directory.
///
/// With `as_dir`, the post gets its own directory (`<slug>/post.md`) so
/// assets can live next to it; otherwise a flat `<slug>.md` is written.
pub fn create_post(app: &Mdpress, title: &str, as_dir: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable slug", title);
    }

    let file_path = if as_dir {
        app.posts_dir.join(&slug).join("post.md")
    } else {
        app.posts_dir.join(format!("{}.md", slug))
    };

    // Check if the post already exists in either layout
    let flat = app.posts_dir.join(format!("{}.md", slug));
    let dir = app.posts_dir.join(&slug);
    if flat.exists() || dir.exists() {
        anyhow::bail!("A post with slug {:?} already exists", slug);
    }

    let meta = NewPostMeta {
        title,
        date: app.config.build_date().format("%Y-%m-%d").to_string(),
    };
    let content = format!("---\n{}---\n\n", serde_yaml::to_string(&meta)?);

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;
    use chrono::NaiveDate;

    fn app(dir: &std::path::Path) -> Mdpress {
        let config = SiteConfig {
            build_date: NaiveDate::from_ymd_opt(2024, 2, 29),
            ..Default::default()
        };
        Mdpress::with_config(dir, config)
    }

    #[test]
    fn test_create_flat_post_round_trips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let path = create_post(&app, "Notes: on Rust", false).unwrap();
        assert_eq!(path, app.posts_dir.join("notes-on-rust.md"));

        let posts = ContentLoader::new(&app).load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Notes: on Rust");
        assert_eq!(posts[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_create_directory_post() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(dir.path());

        let path = create_post(&app, "Trip Report", true).unwrap();
        assert_eq!(path, app.posts_dir.join("trip-report/post.md"));
        assert!(create_post(&app, "Trip Report", false).is_err());
    }
}
