//! Drover HTTP Client
//!
//! A small, type-safe HTTP client for the Drover server API, used by the CLI.
//!
//! # Example
//!
//! ```no_run
//! use drover_client::DroverClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = DroverClient::new("http://localhost:8080");
//!
//!     let count = client.load_proxies("http://10.0.0.1:3128\n".to_string()).await?;
//!     println!("Loaded {} proxies", count);
//!
//!     let status = client.job_status().await?;
//!     println!("Processed {}/{}", status.processed, status.total);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;
mod proxies;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Drover server API
///
/// Methods are grouped by resource:
/// - Proxy pool (load, list)
/// - Batch job (submit, upload, status, pause/resume, reset, results)
/// - Notifications (test message)
#[derive(Debug, Clone)]
pub struct DroverClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    client: Client,
}

impl DroverClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use drover_client::DroverClient;
    ///
    /// let client = DroverClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check that the server is reachable
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.check_status(response).await.map(|_| ())
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        self.check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Turn a non-success status into a [`ClientError::ApiError`]
    async fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(
                status.as_u16(),
                error_message(&error_text),
            ));
        }

        Ok(response)
    }
}

/// Pull the message out of a `{"error": "..."}` body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
