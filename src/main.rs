// Copyright 2026 Postcomb Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::Parser;
use postcomb::auth::Credentials;
use postcomb::browser::chromium::ChromiumEngine;
use postcomb::browser::BrowserEngine;
use postcomb::config::{self, ScrapeConfig};
use postcomb::scrape::{self, ScrapeOptions};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "postcomb",
    about = "Scrape commenter details from a LinkedIn post into CSV",
    version
)]
struct Cli {
    /// LinkedIn post URL (prompted on stdin when omitted)
    url: Option<String>,

    /// Load all replies to comments
    #[arg(long = "show-replies", short = 'r')]
    show_replies: bool,

    /// Output CSV file name, without extension
    #[arg(long, short)]
    output: Option<String>,

    /// Selector configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Run Chromium with a visible window
    #[arg(long)]
    headed: bool,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!("starting LinkedIn scraping tool");

    let config_path = config::resolve_config_path(&cli.config);
    let config = ScrapeConfig::load(&config_path)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;
    let credentials =
        Credentials::from_env().context("LinkedIn credentials not set in environment variables")?;

    let url = match cli.url {
        Some(url) => url,
        None => prompt_url()?,
    };

    let engine = ChromiumEngine::launch(cli.headed).await?;
    let options = ScrapeOptions {
        show_replies: cli.show_replies,
        output: cli.output,
        ..Default::default()
    };
    scrape::scrape_post(&engine, &config, &credentials, url.trim(), &options).await;
    engine.shutdown().await?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "postcomb=debug" } else { "postcomb=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn prompt_url() -> Result<String> {
    print!("Enter LinkedIn post URL: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read URL from stdin")?;
    Ok(line.trim().to_string())
}
