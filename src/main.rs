//! CLI entry point for mdpress

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mdpress::config::{MissingDatePolicy, SiteConfig};
use mdpress::Mdpress;

#[derive(Parser)]
#[command(name = "mdpress")]
#[command(version)]
#[command(about = "Turn a directory of Markdown posts into a static blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Give the post its own directory so it can carry assets
        #[arg(long)]
        dir: bool,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Date used in place of today (YYYY-MM-DD), for reproducible builds
        #[arg(long)]
        build_date: Option<NaiveDate>,

        /// What to do with posts that have no usable date
        #[arg(long, value_enum)]
        missing_date: Option<MissingDatePolicy>,

        /// Output directory, overriding `output_dir` in _config.yml
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Remove the output directory
    Clean,

    /// List posts in index order
    List,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "mdpress=debug,info"
    } else {
        "mdpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            mdpress::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { title, dir } => {
            let app = Mdpress::new(&base_dir)?;
            let path = app.new_post(&title, dir)?;
            println!("Created: {:?}", path);
        }

        Commands::Generate {
            build_date,
            missing_date,
            output,
        } => {
            let mut config = SiteConfig::load_from_dir(&base_dir)?;
            if let Some(date) = build_date {
                config.build_date = Some(date);
            }
            if let Some(policy) = missing_date {
                config.missing_date = policy;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }

            let app = Mdpress::with_config(&base_dir, config);
            tracing::info!("Generating static files...");
            app.generate()?;
            println!("Generated successfully!");
        }

        Commands::Clean => {
            let app = Mdpress::new(&base_dir)?;
            tracing::info!("Cleaning output folder...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let app = Mdpress::new(&base_dir)?;
            mdpress::commands::list::run(&app)?;
        }
    }

    Ok(())
}
