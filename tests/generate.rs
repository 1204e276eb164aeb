//! End-to-end builds against a scaffolded site in a temp directory

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use mdpress::commands::init::init_site;
use mdpress::config::SiteConfig;
use mdpress::Mdpress;

/// A freshly initialized site with the sample post removed
fn new_site() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    init_site(dir.path()).unwrap();
    fs::remove_dir_all(dir.path().join("published/hello-world")).unwrap();
    dir
}

fn app(dir: &Path) -> Mdpress {
    let config = SiteConfig {
        build_date: NaiveDate::from_ymd_opt(2030, 1, 1),
        ..SiteConfig::load_from_dir(dir).unwrap()
    };
    Mdpress::with_config(dir, config)
}

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join("published").join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(path: PathBuf) -> String {
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {:?}: {}", path, e))
}

/// Every file under `root` with its bytes, sorted by relative path
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_directory_post_scenario() {
    let dir = new_site();
    write(
        dir.path(),
        "hello/post.md",
        "---\ntitle: \"Hello\"\ndate: 2024-01-05\n---\n# Hi\n```python\nprint(1)\n```\n",
    );
    write(dir.path(), "hello/diagram.svg", "<svg/>");
    write(dir.path(), "older.md", "---\ndate: 2023-06-01\n---\nOlder post.\n");

    let site = app(dir.path()).generate().unwrap();
    assert_eq!(site.posts.len(), 2);
    assert!(site.posts.iter().all(|p| p.content.is_some()));

    let docs = dir.path().join("docs");
    let page = read(docs.join("posts/hello/index.html"));
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.trim_end().ends_with("</html>"));
    assert!(page.contains("<h1>Hi</h1>"));
    assert!(page.contains(r#"<div class="highlight language-python">"#));
    assert!(page.contains("print"));
    assert!(page.contains("January 05, 2024"));
    assert!(docs.join("posts/hello/diagram.svg").is_file());
    assert!(!docs.join("posts/hello/post.md").exists());

    // Newest first on the index
    let index = read(docs.join("index.html"));
    let hello = index.find("posts/hello/").unwrap();
    let older = index.find("posts/older/").unwrap();
    assert!(hello < older);
    assert!(index.contains("Older"));

    assert!(docs.join("static/css/style.css").is_file());
    assert!(!dir.path().join(".docs.staging").exists());
}

#[test]
fn test_about_content_on_index() {
    let dir = new_site();
    fs::write(dir.path().join("about.md"), "I write about **Rust**.").unwrap();
    write(dir.path(), "a.md", "---\ndate: 2024-01-01\n---\nA\n");

    let site = app(dir.path()).generate().unwrap();
    assert_eq!(site.about.as_deref(), Some("<p>I write about <strong>Rust</strong>.</p>\n"));

    let index = read(dir.path().join("docs/index.html"));
    assert!(index.contains("<strong>Rust</strong>"));
}

#[test]
fn test_missing_about_and_static_are_not_fatal() {
    let dir = new_site();
    fs::remove_file(dir.path().join("about.md")).unwrap();
    fs::remove_dir_all(dir.path().join("static")).unwrap();
    write(dir.path(), "a.md", "---\ndate: 2024-01-01\n---\nA\n");

    let site = app(dir.path()).generate().unwrap();
    assert!(site.about.is_none());

    let docs = dir.path().join("docs");
    assert!(docs.join("index.html").is_file());
    assert!(docs.join("posts/a/index.html").is_file());
    assert!(!docs.join("static").exists());
}

#[test]
fn test_undated_post_is_included() {
    let dir = new_site();
    write(dir.path(), "someday.md", "---\ndate: not a date\n---\nStill here.\n");
    write(dir.path(), "dated.md", "---\ndate: 2024-01-01\n---\nDated.\n");

    let site = app(dir.path()).generate().unwrap();
    let slugs: Vec<_> = site.posts.iter().map(|p| p.slug.as_str()).collect();
    // Build date 2030-01-01 is newer than any real post
    assert_eq!(slugs, vec!["someday", "dated"]);

    let index = read(dir.path().join("docs/index.html"));
    assert!(index.contains("Someday"));
    assert!(index.contains("2030-01-01"));
}

#[test]
fn test_unknown_language_does_not_abort() {
    let dir = new_site();
    write(
        dir.path(),
        "weird.md",
        "---\ndate: 2024-01-01\n---\n```klingon\nQapla'\n```\n\n```mermaid\ngraph TD\n  A-->B\n```\n",
    );

    app(dir.path()).generate().unwrap();
    let page = read(dir.path().join("docs/posts/weird/index.html"));
    assert!(page.contains("language-klingon"));
    assert!(page.contains("<pre class=\"mermaid\">graph TD\n  A--&gt;B\n</pre>"));
}

#[test]
fn test_rebuild_is_byte_identical() {
    let dir = new_site();
    write(dir.path(), "one.md", "---\ndate: 2024-01-01\n---\n```rust\nfn main() {}\n```\n");
    write(dir.path(), "two/post.md", "No front-matter.\n");
    write(dir.path(), "two/img.png", "png");

    let app = app(dir.path());
    app.generate().unwrap();
    let first = snapshot(&app.output_dir);
    app.generate().unwrap();
    let second = snapshot(&app.output_dir);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_failed_build_keeps_previous_output() {
    let dir = new_site();
    write(dir.path(), "good.md", "---\ndate: 2024-01-01\n---\nGood.\n");

    let app = app(dir.path());
    app.generate().unwrap();
    let before = snapshot(&app.output_dir);

    write(dir.path(), "bad.md", "---\ntitle: never closed\n");
    assert!(app.generate().is_err());

    assert_eq!(snapshot(&app.output_dir), before);
}

#[test]
fn test_template_error_aborts_before_touching_output() {
    let dir = new_site();
    write(dir.path(), "good.md", "---\ndate: 2024-01-01\n---\nGood.\n");

    let app = app(dir.path());
    app.generate().unwrap();

    fs::remove_file(app.templates_dir.join("index.html")).unwrap();
    let err = app.generate().unwrap_err();
    assert!(format!("{:#}", err).contains("index.html"));
    assert!(app.output_dir.join("posts/good/index.html").is_file());
}

#[test]
fn test_clean_removes_output() {
    let dir = new_site();
    write(dir.path(), "a.md", "---\ndate: 2024-01-01\n---\nA\n");

    let app = app(dir.path());
    app.generate().unwrap();
    assert!(app.output_dir.exists());

    app.clean().unwrap();
    assert!(!app.output_dir.exists());
}
