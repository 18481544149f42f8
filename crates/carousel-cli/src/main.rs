use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carousel_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(author, version, about = "Turn a table-like markup block into an interactive carousel")]
struct Cli {
    /// Configuration file (defaults to ~/.config/carousel/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the carousel in the terminal
    Run {
        /// Markup file containing the carousel block
        file: PathBuf,
    },
    /// Print the decorated block markup
    Render {
        /// Markup file containing the carousel block
        file: PathBuf,
        /// Show this slide (1-based) instead of the first
        #[arg(short = 'g', long = "goto")]
        goto: Option<usize>,
        /// Print the carousel state as JSON instead of the markup
        #[arg(short = 's', long = "state")]
        state: bool,
    },
    /// List the slides extracted from the block as JSON
    Slides {
        /// Markup file containing the carousel block
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging; keep the full-screen UI quiet unless asked
    let default_level = match cli.command {
        Commands::Run { .. } => "error".to_string(),
        _ => config.general.log_level.clone(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or(default_level),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Run { file } => commands::run::run(config, &file).await,
        Commands::Render { file, goto, state } => {
            commands::render::run(&config, &file, goto, state)
        }
        Commands::Slides { file } => commands::slides::run(&config, &file),
    }
}
