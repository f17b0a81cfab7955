//! Configuration for the model test console.
//!
//! The console talks to the gateway's admin API; everything it needs to know
//! is the API base URL, the admin user id it authenticates as, and transport
//! tuning. Values come from environment variables (a `.env` file is honored
//! by the binary before this is read).

use serde::{Deserialize, Serialize};

/// Console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Base URL of the gateway, e.g. `http://localhost:3000`
    pub api_base: String,

    /// Admin user id sent in the `New-Api-User` header
    pub user_id: String,

    /// Request timeout in seconds for test requests
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Whether to verify SSL certificates when talking to the gateway
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

fn default_request_timeout() -> u64 {
    300
}

fn default_verify_ssl() -> bool {
    true
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Required: `CONSOLE_API_BASE`, `CONSOLE_USER_ID`.
    /// Optional: `CONSOLE_REQUEST_TIMEOUT_SECS`, `CONSOLE_VERIFY_SSL`.
    pub fn from_env() -> anyhow::Result<Self> {
        let api_base = std::env::var("CONSOLE_API_BASE")
            .map_err(|_| anyhow::anyhow!("CONSOLE_API_BASE environment variable is required"))?;
        let user_id = std::env::var("CONSOLE_USER_ID")
            .map_err(|_| anyhow::anyhow!("CONSOLE_USER_ID environment variable is required"))?;
        let request_timeout_secs = std::env::var("CONSOLE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_request_timeout);
        let verify_ssl = std::env::var("CONSOLE_VERIFY_SSL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_verify_ssl);

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            user_id,
            request_timeout_secs,
            verify_ssl,
        })
    }

    /// Configuration pointing at a given base URL with defaults elsewhere.
    /// Used by the test suites against mock servers.
    pub fn for_base(api_base: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            user_id: user_id.into(),
            request_timeout_secs: default_request_timeout(),
            verify_ssl: false,
        }
    }
}
