//! mdpress: a small static blog generator
//!
//! Reads Markdown posts with front-matter from a posts directory, renders
//! them with syntax-highlighted code blocks through Tera templates, and
//! writes a site with one page per post plus a date-sorted index page.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod output;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main application: configuration plus resolved site paths
#[derive(Debug, Clone)]
pub struct Mdpress {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts directory
    pub posts_dir: PathBuf,
    /// Output directory
    pub output_dir: PathBuf,
    /// Template directory
    pub templates_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
    /// About page source
    pub about_path: PathBuf,
}

impl Mdpress {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config = config::SiteConfig::load_from_dir(base_dir.as_ref())?;
        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();

        Self {
            posts_dir: base_dir.join(&config.posts_dir),
            output_dir: base_dir.join(&config.output_dir),
            templates_dir: base_dir.join(&config.templates_dir),
            static_dir: base_dir.join(&config.static_dir),
            about_path: base_dir.join(&config.about_file),
            config,
            base_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::Site> {
        commands::generate::run(self)
    }

    /// Clean the output directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post
    pub fn new_post(&self, title: &str, as_dir: bool) -> Result<PathBuf> {
        commands::new::create_post(self, title, as_dir)
    }
}
