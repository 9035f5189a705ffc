use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use veille::api::ApiClient;
use veille::app::{App, AppEvent};
use veille::config::Config;
use veille::filter::FilterState;
use veille::ui;

/// Get the config directory path (~/.config/veille/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("veille"))
}

#[derive(Parser, Debug)]
#[command(name = "veille", about = "Terminal client for a feed aggregation backend")]
struct Args {
    /// Base URL of the backend API (overrides the config file)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Articles per page (overrides the config file)
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Path to an alternate config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }

    let client = ApiClient::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .with_context(|| format!("Invalid API base URL: {}", config.api_url))?;
    let client = Arc::new(client);

    let mut app = App::new(FilterState::new(config.page_size));

    // Event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, client, event_tx, event_rx).await?;

    Ok(())
}
