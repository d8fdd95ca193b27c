//! gdpchart CLI
//!
//! Command-line interface for offline chart operations:
//! - Render the chart to an SVG file
//! - Fetch and summarize the dataset
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use gdpchart::chart::{render_svg, Viewport};
use gdpchart::config::{generate_default_config, Config};
use gdpchart::source::{DataSource, FileSource, HttpSource};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gdpchart-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Render the U.S. GDP bar chart without a browser")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Dataset URL (overrides config)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Read the dataset from a local JSON file instead of the URL
    #[arg(short, long, global = true)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the chart as SVG
    Render {
        /// Viewport width in pixels
        #[arg(long, default_value = "1280")]
        width: f64,
        /// Viewport height in pixels
        #[arg(long, default_value = "800")]
        height: f64,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch the dataset and print a summary
    Fetch,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.url {
        config.source.url = url.clone();
    }

    gdpchart::logging::init(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Render {
            width,
            height,
            output,
        } => {
            let source = build_source(&cli.input, &config)?;
            let dataset = source.fetch().await?;
            let svg = render_svg(&dataset, &config.chart, Viewport::new(width, height))?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &svg)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), points = dataset.len(), "Chart written");
                }
                None => println!("{}", svg),
            }
        }

        Commands::Fetch => {
            let source = build_source(&cli.input, &config)?;
            let dataset = source.fetch().await?;

            println!("Source:  {}", source.describe());
            println!("Points:  {}", dataset.len());
            println!("Range:   {} .. {}", dataset.first_date(), dataset.last_date());
            println!(
                "Values:  {} .. {} (billions)",
                dataset.min_value(),
                dataset.max_value()
            );
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn build_source(input: &Option<PathBuf>, config: &Config) -> anyhow::Result<Box<dyn DataSource>> {
    Ok(match input {
        Some(path) => Box::new(FileSource::new(path.clone(), config.source.order_policy)),
        None => Box::new(HttpSource::new(config.source.clone())?),
    })
}
