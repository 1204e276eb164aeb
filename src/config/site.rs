//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,

    // Directory
    pub posts_dir: String,
    pub output_dir: String,
    pub templates_dir: String,
    pub static_dir: String,
    pub about_file: String,

    // Writing
    pub missing_date: MissingDatePolicy,
    /// Fixed date used in place of "today" (reproducible builds)
    pub build_date: Option<NaiveDate>,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: String::new(),

            posts_dir: "published".to_string(),
            output_dir: "docs".to_string(),
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
            about_file: "about.md".to_string(),

            missing_date: MissingDatePolicy::default(),
            build_date: None,
            highlight: HighlightConfig::default(),
            markdown: MarkdownConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load `_config.yml` from a site root, falling back to defaults
    pub fn load_from_dir<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);
        if config_path.exists() {
            let config = Self::load(&config_path)?;
            tracing::debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// The date that stands in for "today" during this build
    pub fn build_date(&self) -> NaiveDate {
        self.build_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// What to do with a post whose front-matter carries no usable date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MissingDatePolicy {
    /// Use the build date and log a warning
    #[default]
    BuildDate,
    /// Leave the post out of the site and log a warning
    Skip,
    /// Abort the build
    Error,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme name
    pub theme: String,
    pub line_numbers: bool,
    /// Fence language emitted untouched for client-side diagram rendering
    pub diagram_language: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_numbers: false,
            diagram_language: "mermaid".to_string(),
        }
    }
}

/// Markdown rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Pass raw HTML in post bodies through unescaped.
    ///
    /// Only safe when every content author is trusted.
    pub raw_html: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self { raw_html: true }
    }
}
