//! Token and model directory client.
//!
//! The console needs two read-only lists from the gateway before a run can
//! start: the stored tokens a test may execute under, and the models the
//! current user can select. Both come wrapped in the gateway's standard
//! `{success, message, data}` envelope.

use crate::api::models::TestToken;
use crate::core::error::{Result, TestError};
use crate::core::ConsoleConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

/// Client for the gateway's token and model listing endpoints.
pub struct DirectoryClient {
    client: reqwest::Client,
    api_base: String,
    user_id: String,
}

impl DirectoryClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            user_id: config.user_id.clone(),
        })
    }

    async fn get_enveloped<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.api_base, path))
            .header("New-Api-User", &self.user_id)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.bytes().await.unwrap_or_default();
            return Err(TestError::from_status(
                status,
                crate::api::transport::error_message_from_body(status, &body),
            ));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        if !envelope.success {
            return Err(TestError::transport(if envelope.message.is_empty() {
                format!("{} request failed", path)
            } else {
                envelope.message
            }));
        }
        envelope
            .data
            .ok_or_else(|| TestError::transport(format!("{} returned no data", path)))
    }

    /// List the stored tokens available for test runs.
    pub async fn list_tokens(&self) -> Result<Vec<TestToken>> {
        self.get_enveloped("/api/model_test/tokens").await
    }

    /// List the models selectable by the current user.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        self.get_enveloped("/api/user/models").await
    }
}

/// Pick the token a fresh console selects by default: the first enabled one,
/// else the first listed.
pub fn preferred_token(tokens: &[TestToken]) -> Option<&TestToken> {
    tokens.iter().find(|t| t.is_enabled()).or_else(|| tokens.first())
}
