//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::CONFIG_FILE;

/// Files written by `init`, relative to the site root
const SCAFFOLD: [(&str, &str); 6] = [
    (CONFIG_FILE, include_str!("scaffold/_config.yml")),
    ("templates/base.html", include_str!("scaffold/templates/base.html")),
    ("templates/post.html", include_str!("scaffold/templates/post.html")),
    ("templates/index.html", include_str!("scaffold/templates/index.html")),
    ("static/css/style.css", include_str!("scaffold/static/css/style.css")),
    ("about.md", include_str!("scaffold/about.md")),
];

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join(CONFIG_FILE).exists() {
        anyhow::bail!("{:?} already contains a {}", target_dir, CONFIG_FILE);
    }

    for (relative, content) in SCAFFOLD {
        let path = target_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        tracing::debug!("Created {:?}", path);
    }

    // Create a sample post
    let today = chrono::Local::now().date_naive();
    let sample_post = include_str!("scaffold/post.md")
        .replace("{{ date }}", &today.format("%Y-%m-%d").to_string());
    let post_dir = target_dir.join("published/hello-world");
    fs::create_dir_all(&post_dir)?;
    fs::write(post_dir.join("post.md"), sample_post)?;

    Ok(())
}
