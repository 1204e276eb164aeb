//! Generator module - renders posts, the about section and the index page

use anyhow::{Context as _, Result};
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::Path;

use tera::Context;

use crate::content::{MarkdownRenderer, Post};
use crate::output::{self, OutputDir};
use crate::templates::{NavPost, PostSummary, SiteData, TemplateRenderer};
use crate::Mdpress;

/// Everything one build produced
#[derive(Debug)]
pub struct Site {
    /// Posts newest first, each with its rendered content
    pub posts: Vec<Post>,
    /// Rendered about section, if the about file exists
    pub about: Option<String>,
}

/// Static site generator using Tera templates
pub struct Generator<'a> {
    app: &'a Mdpress,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
    output: OutputDir,
    build_date: NaiveDate,
}

impl<'a> Generator<'a> {
    /// Create a new generator. Fails early if templates are missing or broken
    pub fn new(app: &'a Mdpress) -> Result<Self> {
        let templates = TemplateRenderer::load(&app.templates_dir)?;
        let markdown =
            MarkdownRenderer::with_options(&app.config.highlight, &app.config.markdown);
        let output = OutputDir::new(&app.output_dir)?;

        if app.config.markdown.raw_html {
            tracing::info!("Raw HTML in Markdown is trusted and emitted unescaped (markdown.raw_html)");
        }

        Ok(Self {
            app,
            templates,
            markdown,
            output,
            build_date: app.config.build_date(),
        })
    }

    /// Generate the entire site from posts sorted newest first.
    ///
    /// `about` is the raw Markdown of the about section.
    pub fn generate(&self, mut posts: Vec<Post>, about: Option<&str>) -> Result<Site> {
        self.output.reset()?;
        self.output.copy_static(&self.app.static_dir)?;

        let site_data = SiteData::from(&self.app.config);
        let summaries: Vec<PostSummary> = posts.iter().map(PostSummary::from).collect();

        for (i, post) in posts.iter_mut().enumerate() {
            let html = self
                .markdown
                .render(&post.raw)
                .with_context(|| format!("Failed to render {}", post.source.display()))?;
            post.content = Some(html);

            // Older post comes after in the list
            let prev = summaries.get(i + 1).map(NavPost::from);
            let next = i.checked_sub(1).and_then(|j| summaries.get(j)).map(NavPost::from);

            self.write_post(post, &summaries, prev, next, &site_data)?;
        }

        let about = about
            .map(|body| self.markdown.render(body))
            .transpose()
            .context("Failed to render about file")?;

        self.write_index(&summaries, about.as_deref(), &site_data)?;

        self.output.publish()?;
        tracing::info!("Published site to {:?}", self.output.root());

        Ok(Site { posts, about })
    }

    /// Create a base context with common variables
    fn create_base_context(&self, site_data: &SiteData, root_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", site_data);
        context.insert("root_path", root_path);
        context.insert("current_year", &self.build_date.year());
        context
    }

    /// Write `posts/<slug>/index.html` and copy the post's assets next to it
    fn write_post(
        &self,
        post: &Post,
        summaries: &[PostSummary],
        prev: Option<NavPost>,
        next: Option<NavPost>,
        site_data: &SiteData,
    ) -> Result<()> {
        let post_dir = post.output_dir(self.output.staging());
        fs::create_dir_all(&post_dir)
            .with_context(|| format!("Failed to create {}", post_dir.display()))?;

        output::copy_post_assets(post, &post_dir)?;

        let mut context = self.create_base_context(site_data, "../../");
        context.insert("title", &post.title);
        context.insert("date", &post.date_string());
        context.insert("content", post.content.as_deref().unwrap_or_default());
        context.insert("posts", summaries);
        context.insert("slug", &post.slug);
        context.insert("prev_post", &prev);
        context.insert("next_post", &next);

        let html = self.templates.render("post.html", &context)?;
        self.write_page(&post_dir.join("index.html"), &html)?;
        tracing::info!("Generated post: {}index.html", post.path);
        Ok(())
    }

    /// Write the root `index.html`
    fn write_index(
        &self,
        summaries: &[PostSummary],
        about: Option<&str>,
        site_data: &SiteData,
    ) -> Result<()> {
        let mut context = self.create_base_context(site_data, "./");
        context.insert("posts", summaries);
        context.insert("about_content", &about);

        let html = self.templates.render("index.html", &context)?;
        self.write_page(&self.output.staging().join("index.html"), &html)?;
        tracing::info!("Generated index page: index.html");
        Ok(())
    }

    fn write_page(&self, path: &Path, html: &str) -> Result<()> {
        fs::write(path, html).with_context(|| format!("Failed to write {}", path.display()))
    }
}
