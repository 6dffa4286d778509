mod scrape;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::scrape::WalkOverrides;

#[derive(Debug, Parser)]
#[command(name = "fdscrape")]
#[command(about = "Extract product listings from a paginated eyeglasses catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk the live catalog in Chromium and save every product found
    Walk {
        /// Catalog URL to start from (overrides FDSCRAPE_START_URL)
        #[arg(long)]
        url: Option<String>,

        /// Directory for the CSV and JSON files (overrides FDSCRAPE_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Stop after this many pages (overrides FDSCRAPE_MAX_PAGES)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_pages: Option<u64>,

        /// Show the browser window
        #[arg(long)]
        headful: bool,
    },
    /// Walk previously saved catalog pages instead of a live browser
    Replay {
        /// Directory of rendered HTML pages, replayed in file-name order
        dir: PathBuf,

        /// Directory for the CSV and JSON files (overrides FDSCRAPE_OUTPUT_DIR)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the effective extraction rules as YAML
    Rules,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = fdscrape_core::load_app_config().context("failed to load configuration")?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::debug!(?config, "configuration loaded");

    let rules = scrape::load_effective_rules(&config)?;

    match cli.command {
        Commands::Walk {
            url,
            output_dir,
            max_pages,
            headful,
        } => {
            let overrides = WalkOverrides {
                url,
                output_dir,
                max_pages: max_pages.map(usize::try_from).transpose()?,
                headful,
            };
            overrides.apply(&mut config);
            scrape::run_walk(&config, &rules).await?;
        }
        Commands::Replay { dir, output_dir } => {
            if let Some(output_dir) = output_dir {
                config.output_dir = output_dir;
            }
            scrape::run_replay(&config, &rules, &dir).await?;
        }
        Commands::Rules => print!("{}", scrape::render_rules(&rules)?),
    }

    Ok(())
}
