//! Notification command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use drover_client::DroverClient;

use crate::config::Config;

/// Notify subcommands
#[derive(Subcommand)]
pub enum NotifyCommands {
    /// Send a test message through the server's notification sink
    Test,
}

pub async fn handle_notify_command(command: NotifyCommands, config: &Config) -> Result<()> {
    let client = DroverClient::new(&config.server_url);

    match command {
        NotifyCommands::Test => send_test(&client).await,
    }
}

async fn send_test(client: &DroverClient) -> Result<()> {
    match client.test_notifier().await {
        Ok(resp) => {
            println!("{} {}", "✓".green(), resp.message);
            Ok(())
        }
        Err(drover_client::ClientError::ApiError {
            status: 502,
            message,
        }) => {
            println!("{} {}", "✗ Notification failed:".red(), message);
            println!(
                "  {}",
                "Check DROVER_TELEGRAM_BOT_TOKEN and DROVER_TELEGRAM_CHAT_ID on the server."
                    .dimmed()
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
