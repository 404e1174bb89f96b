//! Resumable upload CLI for the drive service.

mod browse;
mod client;
mod error;
mod uploader;

use anyhow::{Context, Result};
use clap::Parser;
use client::UploadClient;
use drivectl_core::{ClientConfig, Credentials};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::path::{Path, PathBuf};
use uploader::Uploader;

#[derive(Parser)]
#[command(name = "drivectl")]
#[command(about = "Resumable chunked uploads to the drive service")]
#[command(version)]
struct Cli {
    /// File to upload; an interactive browser opens when omitted
    file: Option<PathBuf>,

    /// Config file path
    #[arg(long, env = "DRIVECTL_CONFIG")]
    config: Option<PathBuf>,

    /// Drive API base URL (overrides config)
    #[arg(long)]
    server: Option<String>,

    /// Key-service base URL (overrides config)
    #[arg(long)]
    kms: Option<String>,

    /// Token file path (overrides config)
    #[arg(long)]
    token_file: Option<PathBuf>,

    /// Destination folder ID (overrides config)
    #[arg(long)]
    parent: Option<String>,

    /// Chunk size in bytes (overrides config)
    #[arg(long)]
    chunk_size: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let path = match &cli.file {
        Some(path) => path.clone(),
        None => match browse::pick_file(&std::env::current_dir()?)? {
            Some(path) => path,
            None => {
                println!("No file selected.");
                return Ok(());
            }
        },
    };

    let credentials = load_credentials(&config.token_file).await?;
    let client = UploadClient::new(&config.api_url, &config.kms_url, credentials.access_token())?;
    let mut uploader = Uploader::new(client, config.chunk_size);

    let summary = uploader
        .run(&path, config.parent_id.as_deref(), |progress| {
            println!(
                "Uploaded {} of {} bytes ({:.2}%)",
                progress.bytes_sent,
                progress.total_size,
                progress.percent()
            );
        })
        .await
        .with_context(|| format!("upload of {} failed", path.display()))?;

    println!(
        "Upload completed: {} ({} bytes in {} chunks)",
        summary.filename, summary.bytes_sent, summary.chunks_sent
    );
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let path = config_path(cli.config.as_deref());
    let mut figment = Figment::new();

    if path.exists() {
        figment = figment.merge(Toml::file(&path));
    }
    figment = figment.merge(Env::prefixed("DRIVECTL_"));

    // Every field has a serde default, so an empty figment extracts fine;
    // any error here is a genuinely malformed file or env override.
    let mut config: ClientConfig = figment
        .extract()
        .map_err(|err| anyhow::anyhow!(err).context("failed to load client configuration"))?;

    if let Some(server) = &cli.server {
        config.api_url = server.clone();
    }
    if let Some(kms) = &cli.kms {
        config.kms_url = kms.clone();
    }
    if let Some(token_file) = &cli.token_file {
        config.token_file = token_file.clone();
    }
    if let Some(parent) = &cli.parent {
        config.parent_id = Some(parent.clone());
    }
    if let Some(chunk_size) = cli.chunk_size {
        config.chunk_size = chunk_size;
    }

    config.validate()?;
    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }

    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(path) => PathBuf::from(path),
        None => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".config"),
            None => return PathBuf::from("drivectl.toml"),
        },
    };

    base.join("drivectl").join("config.toml")
}

async fn load_credentials(path: &Path) -> Result<Credentials> {
    let contents = tokio::fs::read_to_string(path).await.with_context(|| {
        format!(
            "cannot read token file {} (expected JSON with access_token and refresh_token)",
            path.display()
        )
    })?;
    Ok(Credentials::from_json(&contents)?)
}
