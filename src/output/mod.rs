//! Output directory management
//!
//! A build never writes into the live output directory. Everything goes into
//! a sibling staging directory (`.docs.staging` for `docs/`), which replaces
//! the output directory only once the whole site has been written.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::content::Post;

/// The generated site's directory and its staging twin
pub struct OutputDir {
    /// Published output directory
    root: PathBuf,
    /// Directory the current build writes into
    staging: PathBuf,
}

impl OutputDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let name = root
            .file_name()
            .ok_or_else(|| anyhow!("Output directory has no name: {}", root.display()))?
            .to_string_lossy()
            .to_string();
        let staging = root.with_file_name(format!(".{}.staging", name));
        Ok(Self { root, staging })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the current build is written
    pub fn staging(&self) -> &Path {
        &self.staging
    }

    /// Wipe the staging directory and recreate it with an empty `posts/`
    pub fn reset(&self) -> Result<()> {
        remove_dir_if_exists(&self.staging)?;
        fs::create_dir_all(self.staging.join("posts"))
            .with_context(|| format!("Failed to create {}", self.staging.display()))?;
        tracing::debug!("Reset build directory {:?}", self.staging);
        Ok(())
    }

    /// Copy site-wide static assets into `static/`. A missing source is not fatal
    pub fn copy_static(&self, source_dir: &Path) -> Result<()> {
        if !source_dir.is_dir() {
            tracing::warn!("Static directory not found at {:?}", source_dir);
            return Ok(());
        }

        let count = copy_tree(source_dir, &self.staging.join("static"))?;
        tracing::info!("Copied {} static files from {:?}", count, source_dir);
        Ok(())
    }

    /// Replace the output directory with the finished build
    pub fn publish(&self) -> Result<()> {
        remove_dir_if_exists(&self.root)?;
        fs::rename(&self.staging, &self.root).with_context(|| {
            format!(
                "Failed to move {} to {}",
                self.staging.display(),
                self.root.display()
            )
        })?;
        Ok(())
    }

    /// Remove the output directory and any leftover staging directory
    pub fn clean(&self) -> Result<()> {
        for dir in [&self.root, &self.staging] {
            if dir.exists() {
                remove_dir_if_exists(dir)?;
                tracing::info!("Deleted: {:?}", dir);
            }
        }
        Ok(())
    }
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    Ok(())
}

/// Recursively copy `src` into `dest`, overwriting existing files.
/// Returns the number of files copied
pub fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    copy_tree_filtered(src, dest, |_| true)
}

/// Copy a directory post's assets (everything but its Markdown file)
/// into the post's output directory
pub fn copy_post_assets(post: &Post, post_output_dir: &Path) -> Result<usize> {
    let Some(asset_dir) = &post.asset_dir else {
        return Ok(0);
    };

    let count = copy_tree_filtered(asset_dir, post_output_dir, |path| path != post.source)?;
    if count > 0 {
        tracing::debug!("Copied {} assets for {}", count, post.slug);
    }
    Ok(count)
}

fn copy_tree_filtered<F>(src: &Path, dest: &Path, include: F) -> Result<usize>
where
    F: Fn(&Path) -> bool,
{
    fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;

    let mut count = 0;
    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if !include(path) {
            continue;
        }

        let relative = path.strip_prefix(src)?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target).with_context(|| {
                format!("Failed to copy {} to {}", path.display(), target.display())
            })?;
            tracing::debug!("Copied: {:?} -> {:?}", path, target);
            count += 1;
        }
    }

    Ok(count)
}
