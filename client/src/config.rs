//! Configuration for the HTTP collaborators.
//!
//! Loaded from environment variables with development defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Error constructing an HTTP collaborator
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the booking backend, without a trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    ///
    /// Doubles as the bound on an in-flight submission: when it elapses the
    /// gateway reports a timeout and the flow returns to its idle confirm
    /// state.
    pub request_timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `BOOKING_API_URL` | `http://localhost:3000` |
    /// | `BOOKING_API_TIMEOUT_SECS` | `10` |
    /// | `BOOKING_API_USER_AGENT` | `studio-booking/0.1` |
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("BOOKING_API_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            request_timeout_secs: env::var("BOOKING_API_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            user_agent: env::var("BOOKING_API_USER_AGENT")
                .unwrap_or_else(|_| "studio-booking/0.1".to_string()),
        }
    }

    /// The per-request timeout as a `Duration`
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Builds the shared `reqwest` client for this configuration
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, ClientError> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(self.user_agent.clone())
            .build()?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 10,
            user_agent: "studio-booking/0.1".to_string(),
        }
    }
}
