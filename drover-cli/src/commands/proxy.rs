//! Proxy command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use drover_client::DroverClient;

use crate::config::Config;

/// Proxy subcommands
#[derive(Subcommand)]
pub enum ProxyCommands {
    /// Replace the pool with the proxies listed in a file (one per line)
    Load {
        /// Path to the proxy list
        file: String,
    },
    /// List the proxies currently loaded
    List,
}

pub async fn handle_proxy_command(command: ProxyCommands, config: &Config) -> Result<()> {
    let client = DroverClient::new(&config.server_url);

    match command {
        ProxyCommands::Load { file } => load_proxies(&client, &file).await,
        ProxyCommands::List => list_proxies(&client).await,
    }
}

async fn load_proxies(client: &DroverClient, file: &str) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read proxy list: {}", file))?;

    let count = client.load_proxies(raw).await?;

    println!(
        "{} Loaded {} proxies",
        "✓".green(),
        count.to_string().bold()
    );

    Ok(())
}

async fn list_proxies(client: &DroverClient) -> Result<()> {
    let proxies = client.list_proxies().await?;

    if proxies.is_empty() {
        println!("{}", "No proxies loaded.".yellow());
        return Ok(());
    }

    println!("{}", format!("{} proxies:", proxies.len()).bold());
    for proxy in proxies {
        println!(
            "  {} {}",
            format!("[{}]", proxy.slot).dimmed(),
            proxy.endpoint.cyan()
        );
    }

    Ok(())
}
