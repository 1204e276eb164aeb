//! Generate static files

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::generator::{Generator, Site};
use crate::Mdpress;

/// Generate the static site
pub fn run(app: &Mdpress) -> Result<Site> {
    let start = std::time::Instant::now();

    // Templates are checked before anything on disk is touched
    let generator = Generator::new(app)?;

    // Load content
    let loader = ContentLoader::new(app);
    let posts = loader.load_posts()?;
    let about = loader.load_about()?;

    tracing::info!(
        "Loaded {} posts (build date {})",
        posts.len(),
        loader.build_date()
    );

    let site = generator.generate(posts, about.as_deref())?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts in {:.2}s",
        site.posts.len(),
        duration.as_secs_f64()
    );

    Ok(site)
}
