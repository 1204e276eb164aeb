//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::DateSource;
use crate::Mdpress;

/// List posts in the order the index page shows them
pub fn run(app: &Mdpress) -> Result<()> {
    let loader = ContentLoader::new(app);
    let posts = loader.load_posts()?;

    println!("Posts ({}):", posts.len());
    for post in posts {
        let marker = match post.date_source {
            DateSource::FrontMatter => "",
            DateSource::BuildDate => " (no date)",
        };
        println!(
            "  {}{} - {} -> {} [{}]",
            post.date_string(),
            marker,
            post.title,
            post.path,
            post.source.display()
        );
    }

    Ok(())
}
