//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod notify;
mod proxy;

pub use job::JobCommands;
pub use notify::NotifyCommands;
pub use proxy::ProxyCommands;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use drover_client::DroverClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Proxy pool management
    Proxy {
        #[command(subcommand)]
        command: ProxyCommands,
    },
    /// Batch job control
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Notification sink checks
    Notify {
        #[command(subcommand)]
        command: NotifyCommands,
    },
    /// Check that the server is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Proxy { command } => proxy::handle_proxy_command(command, config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Notify { command } => notify::handle_notify_command(command, config).await,
        Commands::Health => check_health(config).await,
    }
}

async fn check_health(config: &Config) -> Result<()> {
    let client = DroverClient::new(&config.server_url);

    match client.health().await {
        Ok(()) => {
            println!("{} Server at {} is up", "✓".green(), client.base_url().cyan());
            Ok(())
        }
        Err(e) => {
            println!("{} Server at {} is unreachable", "✗".red(), client.base_url());
            Err(e.into())
        }
    }
}
