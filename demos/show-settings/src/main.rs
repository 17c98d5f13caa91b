//! Loads the service settings and prints them as JSON.
//!
//! Fails with a non-zero exit status listing every missing or malformed
//! variable, the same way the service fails at startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xmind_config::{SettingsLoader, get_settings};

#[derive(Debug, Parser)]
#[command(about = "Validate and print the XMind assistant settings")]
struct Args {
    /// Env file to read defaults from instead of `./.env`.
    env_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let settings = match &args.env_file {
        Some(path) => SettingsLoader::new()
            .env_file(path)
            .load()
            .with_context(|| format!("loading settings with {}", path.display()))?,
        None => get_settings().context("loading settings")?.clone(),
    };

    info!(bind = %settings.api_bind_addr(), redis = %settings.redis_addr(), "settings valid");
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
