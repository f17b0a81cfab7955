//! Wire models for the model test console.
//!
//! This module defines the endpoint table, the test request, and the payload
//! construction for the three upstream-compatible protocols the console can
//! exercise.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Which upstream-compatible wire protocol a test run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// OpenAI Chat Completions (`/chat/completions`)
    Chat,
    /// OpenAI Responses (`/responses`)
    Responses,
    /// Anthropic Messages (`/messages`)
    Messages,
}

/// Static description of one target endpoint.
#[derive(Debug, Clone, Copy)]
pub struct EndpointDescriptor {
    /// Path suffix under the console proxy base
    pub request_path: &'static str,
    /// Field name carrying the token limit for this protocol
    pub max_tokens_field: &'static str,
}

impl EndpointKind {
    /// Read-only endpoint table. Paths live under `/api/model_test` on the
    /// gateway, which forwards them to the matching `/v1/*` relay route.
    pub fn descriptor(&self) -> EndpointDescriptor {
        match self {
            EndpointKind::Chat => EndpointDescriptor {
                request_path: "/api/model_test/chat/completions",
                max_tokens_field: "max_tokens",
            },
            EndpointKind::Responses => EndpointDescriptor {
                request_path: "/api/model_test/responses",
                max_tokens_field: "max_output_tokens",
            },
            EndpointKind::Messages => EndpointDescriptor {
                request_path: "/api/model_test/messages",
                max_tokens_field: "max_tokens",
            },
        }
    }

    /// Human-readable label, as shown in the console UI.
    pub fn label(&self) -> &'static str {
        match self {
            EndpointKind::Chat => "OpenAI Chat",
            EndpointKind::Responses => "OpenAI Responses",
            EndpointKind::Messages => "Claude Messages",
        }
    }
}

/// One test request. Immutable once constructed; built fresh per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    /// Target endpoint kind
    pub endpoint: EndpointKind,

    /// Model identifier
    pub model: String,

    /// User prompt
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Nucleus sampling parameter
    pub top_p: f64,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Whether to request a streamed response
    pub stream: bool,

    /// Optional group override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    /// Id of the stored gateway token the run executes under
    pub token_id: i64,
}

impl TestRequest {
    /// Build the exact protocol body the target endpoint expects.
    ///
    /// Pure transform, no validation: callers reject missing model/prompt/
    /// token before getting here.
    pub fn build_payload(&self) -> Value {
        let descriptor = self.endpoint.descriptor();
        let mut body = serde_json::Map::new();
        body.insert("model".to_string(), json!(self.model));
        body.insert("stream".to_string(), json!(self.stream));
        body.insert("temperature".to_string(), json!(self.temperature));
        body.insert("top_p".to_string(), json!(self.top_p));
        if let Some(group) = &self.group {
            body.insert("group".to_string(), json!(group));
        }
        match self.endpoint {
            EndpointKind::Responses => {
                body.insert("input".to_string(), json!(self.prompt));
            }
            EndpointKind::Chat | EndpointKind::Messages => {
                body.insert(
                    "messages".to_string(),
                    json!([{"role": "user", "content": self.prompt}]),
                );
            }
        }
        body.insert(descriptor.max_tokens_field.to_string(), json!(self.max_tokens));

        Value::Object(body)
    }

    /// Wrap the protocol payload in the console proxy envelope.
    pub fn build_envelope(&self) -> Value {
        json!({
            "token_id": self.token_id,
            "payload": self.build_payload(),
        })
    }
}

/// A selectable gateway token as listed by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestToken {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub group: String,
    pub status: i32,
    pub user_id: i64,
}

impl TestToken {
    /// Tokens in any status other than enabled cannot run tests.
    pub fn is_enabled(&self) -> bool {
        self.status == 1
    }
}
