//! HTTP transport seam for test runs.
//!
//! The runner never touches `reqwest` directly; it talks to a [`Transport`],
//! which returns either a fully-buffered body or an incrementally-readable
//! byte stream. This keeps the decoding loop testable against fake stream
//! sources that yield chunks on demand.

use crate::core::error::{Result, TestError};
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::Value;
use std::time::Duration;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Response body, either buffered or streamed.
pub enum TransportBody {
    /// Complete body, for non-streamed runs
    Buffered(Bytes),
    /// Incrementally-readable byte stream, for streamed runs
    Stream(BoxStream<'static, Result<Bytes>>),
}

/// Response from a transport call.
pub struct TransportResponse {
    pub status: u16,
    pub body: TransportBody,
}

/// HTTP request/response facility consumed by the runner.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body to `path` (relative to the gateway base) and return
    /// the response. `streamed` selects whether the body should be consumed
    /// incrementally. Non-success statuses are returned, not mapped to
    /// errors; the runner decides how to surface them.
    async fn execute(&self, path: &str, body: &Value, streamed: bool) -> Result<TransportResponse>;
}

/// Real transport over a shared `reqwest` client.
pub struct HttpTransport {
    client: reqwest::Client,
    api_base: String,
    user_id: String,
}

impl HttpTransport {
    pub fn new(config: &crate::core::ConsoleConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            user_id: config.user_id.clone(),
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, path: &str, body: &Value, streamed: bool) -> Result<TransportResponse> {
        let response = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .header("New-Api-User", &self.user_id)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if streamed && (200..300).contains(&status) {
            let stream = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(TestError::from))
                .boxed();
            Ok(TransportResponse {
                status,
                body: TransportBody::Stream(stream),
            })
        } else {
            let bytes = response.bytes().await?;
            Ok(TransportResponse {
                status,
                body: TransportBody::Buffered(bytes),
            })
        }
    }
}

/// Derive a user-facing failure message from an error response body.
///
/// Prefers the gateway's `{"error": {"message": ...}}` / `{"message": ...}`
/// shapes; falls back to the raw text, truncated so a giant HTML error page
/// does not end up in the status line.
pub fn error_message_from_body(status: u16, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .or_else(|| v.get("message"))
                .and_then(|m| m.as_str().map(|s| s.to_string()))
        })
        .unwrap_or_else(|| text.trim().to_string());

    let message = if message.is_empty() {
        format!("HTTP {}", status)
    } else {
        message
    };

    if message.len() > MAX_ERROR_MESSAGE_LEN {
        let mut end = MAX_ERROR_MESSAGE_LEN;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &message[..end])
    } else {
        message
    }
}
