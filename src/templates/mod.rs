//! Tera template loading and the data handed to templates
//!
//! Templates are read from the site's template directory. `post.html` and
//! `index.html` are required; anything else in the directory (base layouts,
//! partials) is available to `extends` and `include`.

use anyhow::{Context as _, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tera::{Context, Tera};
use walkdir::WalkDir;

use crate::config::SiteConfig;
use crate::content::Post;

/// Templates every site must provide
pub const REQUIRED_TEMPLATES: [&str; 2] = ["post.html", "index.html"];

/// Template renderer backed by the site's template directory
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Load every `*.html` template below `templates_dir`, named by its
    /// `/`-separated path relative to that directory
    pub fn load(templates_dir: &Path) -> Result<Self> {
        if !templates_dir.is_dir() {
            anyhow::bail!("Templates directory not found: {}", templates_dir.display());
        }

        // Walked rather than globbed, so the directory name is never a pattern
        let mut files = Vec::new();
        for entry in WalkDir::new(templates_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| {
                format!("Failed to read templates from {}", templates_dir.display())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("html")
            {
                continue;
            }
            let rel = path.strip_prefix(templates_dir)?;
            let name = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            files.push((path.to_path_buf(), Some(name)));
        }

        let mut tera = Tera::default();
        tera.add_template_files(files)
            .with_context(|| format!("Failed to load templates from {}", templates_dir.display()))?;

        for required in REQUIRED_TEMPLATES {
            if !tera.get_template_names().any(|name| name == required) {
                anyhow::bail!(
                    "Missing required template {}",
                    templates_dir.join(required).display()
                );
            }
        }

        // Register custom filters
        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render template {}", template_name))
    }
}

/// Tera filter: format a `YYYY-MM-DD` date string
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    // For "LL" format (like "May 30, 2023"), we parse and reformat
    if format == "LL" {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(tera::Value::String(date.format("%B %d, %Y").to_string()));
        }
    }

    // Default: return as-is (already YYYY-MM-DD)
    Ok(tera::Value::String(s))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
        }
    }
}

/// A post as listed on the index page and in site navigation
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    pub date: String,
    pub slug: String,
    /// Relative to the site root, e.g. `posts/hello/`
    pub url: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            date: post.date_string(),
            slug: post.slug.clone(),
            url: post.path.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

impl From<&PostSummary> for NavPost {
    fn from(summary: &PostSummary) -> Self {
        Self {
            title: summary.title.clone(),
            url: summary.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_templates(dir: &Path, names: &[(&str, &str)]) {
        for (name, body) in names {
            let path = dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, body).unwrap();
        }
    }

    #[test]
    fn test_load_and_render_with_inheritance() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(
            dir.path(),
            &[
                ("base.html", "<title>{{ title }}</title>{% block body %}{% endblock %}"),
                (
                    "post.html",
                    r#"{% extends "base.html" %}{% block body %}{{ content | safe }}{% endblock %}"#,
                ),
                ("index.html", "{{ posts | length }}"),
            ],
        );

        let renderer = TemplateRenderer::load(dir.path()).unwrap();
        let mut context = Context::new();
        context.insert("title", "<Tom & Jerry>");
        context.insert("content", "<p>hi</p>");
        let html = renderer.render("post.html", &context).unwrap();
        assert_eq!(html, "<title>&lt;Tom &amp; Jerry&gt;</title><p>hi</p>");
    }

    #[test]
    fn test_load_from_directory_with_pattern_characters() {
        let dir = tempfile::tempdir().unwrap();
        let templates = dir.path().join("site [x]*").join("templates");
        write_templates(
            &templates,
            &[
                ("layouts/base.html", "[{% block body %}{% endblock %}]"),
                (
                    "post.html",
                    r#"{% extends "layouts/base.html" %}{% block body %}{{ title }}{% endblock %}"#,
                ),
                ("index.html", "index"),
                ("notes.txt", "not a template"),
            ],
        );

        let renderer = TemplateRenderer::load(&templates).unwrap();
        let mut context = Context::new();
        context.insert("title", "Hi");
        assert_eq!(renderer.render("post.html", &context).unwrap(), "[Hi]");
        assert_eq!(renderer.render("index.html", &Context::new()).unwrap(), "index");
        assert!(renderer.render("notes.txt", &Context::new()).is_err());
    }

    #[test]
    fn test_missing_required_template() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(dir.path(), &[("post.html", "post")]);
        let err = TemplateRenderer::load(dir.path()).err().unwrap();
        assert!(err.to_string().contains("index.html"));
    }

    #[test]
    fn test_missing_templates_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TemplateRenderer::load(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_render_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_templates(
            dir.path(),
            &[("post.html", "{{ missing.field }}"), ("index.html", "")],
        );
        let renderer = TemplateRenderer::load(dir.path()).unwrap();
        assert!(renderer.render("post.html", &Context::new()).is_err());
    }

    #[test]
    fn test_date_format_filter() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), tera::Value::from("LL"));
        let out = date_format_filter(&tera::Value::from("2024-01-05"), &args).unwrap();
        assert_eq!(out, tera::Value::from("January 05, 2024"));

        let out = date_format_filter(&tera::Value::from("2024-01-05"), &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::from("2024-01-05"));
    }
}
