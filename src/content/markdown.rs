//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{highlighted_html_for_string, styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::config::{HighlightConfig, MarkdownConfig};

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    diagram_language: String,
    raw_html: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer with default settings
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default(), &MarkdownConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(highlight: &HighlightConfig, markdown: &MarkdownConfig) -> Self {
        let theme_set = ThemeSet::load_defaults();
        if !theme_set.themes.contains_key(&highlight.theme) {
            tracing::warn!(
                "Unknown highlight theme {:?}, falling back to a bundled theme",
                highlight.theme
            );
        }

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_numbers,
            diagram_language: highlight.diagram_language.clone(),
            raw_html: markdown.raw_html,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before it gets here, so no metadata blocks
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, collected source) of the code block being read
        let mut code_block: Option<(String, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split_whitespace()
                            .next()
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang.unwrap_or_else(|| "text".to_string()), String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = code_block.take() {
                        let rendered = self.render_code_block(&code, &lang);
                        events.push(Event::Html(CowStr::from(rendered)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, code)) = code_block.as_mut() {
                        code.push_str(&text);
                    }
                }
                Event::Html(raw) | Event::InlineHtml(raw) if !self.raw_html => {
                    events.push(Event::Text(raw));
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Render one fenced or indented code block
    fn render_code_block(&self, code: &str, lang: &str) -> String {
        if lang.eq_ignore_ascii_case(&self.diagram_language) {
            // No highlighting; the client-side renderer reads the decoded text
            return format!(
                r#"<pre class="{}">{}</pre>"#,
                html_escape(&self.diagram_language),
                html_escape(code)
            );
        }
        self.highlight_code(code, lang)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self.find_syntax(lang);
        let lang_class = html_escape(lang);

        let Some(theme) = self.theme() else {
            return plain_code_block(code, &lang_class);
        };

        let highlighted = if self.line_numbers {
            self.highlight_lines(code, syntax, theme)
                .map(|lines| add_line_numbers(&lines, &lang_class))
        } else {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).map(|html| {
                format!(
                    r#"<div class="highlight language-{}">{}</div>"#,
                    lang_class, html
                )
            })
        };

        match highlighted {
            Ok(html) => html,
            Err(e) => {
                tracing::debug!("Highlighting {} block failed: {}", lang, e);
                plain_code_block(code, &lang_class)
            }
        }
    }

    /// Resolve a grammar by name or extension, plain text when unknown
    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| {
                tracing::debug!("Unknown code block language {:?}, using plain text", lang);
                self.syntax_set.find_syntax_plain_text()
            })
    }

    fn theme(&self) -> Option<&Theme> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight code one line at a time, without the surrounding `<pre>`
    fn highlight_lines(
        &self,
        code: &str,
        syntax: &SyntaxReference,
        theme: &Theme,
    ) -> Result<Vec<String>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            let regions = highlighter.highlight_line(line, &self.syntax_set)?;
            let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?;
            lines.push(html.trim_end_matches(['\n', '\r']).to_string());
        }
        Ok(lines)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay highlighted lines out next to a line-number gutter
fn add_line_numbers(lines: &[String], lang: &str) -> String {
    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

fn plain_code_block(code: &str, lang_class: &str) -> String {
    format!(
        r#"<div class="highlight"><pre><code class="language-{}">{}</code></pre></div>"#,
        lang_class,
        html_escape(code)
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
