//! regionlink - point site links at the visitor's locale and region.

mod cli;
mod config;
mod context;
mod core;
mod locale;
mod localize;
mod logger;
mod regionalize;
mod sitemap;
mod storage;
mod utils;

use anyhow::{Context as _, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::Config;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = Config::load(&cli)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(run(&cli, &config))
}

async fn run(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Commands::Localize { paths, visit, dry } => {
            cli::localize::run(config, paths, visit, *dry).await
        }
        Commands::Detect { visit } => cli::detect::run(config, visit),
        Commands::Index { refresh } => cli::index::run(config, *refresh).await,
        Commands::Href { href, visit } => cli::href::run(config, href, visit).await,
        Commands::Watch { visit } => cli::watch::run(config, visit).await,
    }
}
