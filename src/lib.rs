//! Model test console for a multi-provider LLM API gateway.
//!
//! This crate implements the console's ad-hoc model testing core: issue one
//! test request to a gateway endpoint compatible with OpenAI Chat
//! Completions, OpenAI Responses, or Anthropic Messages, optionally consume
//! the response as an incrementally-decoded SSE stream, and normalize the
//! heterogeneous payload shapes into a single running text output with
//! cooperative cancellation.
//!
//! # Architecture
//!
//! - [`core`]: configuration, error handling, cancellation, logging
//! - [`api`]: wire models, the HTTP transport seam, and the token/model
//!   directory client
//! - [`runner`]: the streaming test runner (SSE decoding, payload
//!   normalization, run state)
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use model_test_console::{
//!     ConsoleConfig, EndpointKind, HttpTransport, StreamingTestRunner, TestRequest,
//! };
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = ConsoleConfig::for_base("http://localhost:3000", "1");
//! let transport = Arc::new(HttpTransport::new(&config)?);
//! let runner = StreamingTestRunner::new(transport);
//!
//! let mut handle = runner.run_test(TestRequest {
//!     endpoint: EndpointKind::Chat,
//!     model: "gpt-4".to_string(),
//!     prompt: "Say hello".to_string(),
//!     temperature: 0.7,
//!     top_p: 1.0,
//!     max_tokens: 1024,
//!     stream: true,
//!     group: None,
//!     token_id: 1,
//! })?;
//!
//! let final_state = handle.wait().await;
//! println!("{}", final_state.output_text);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod core;
pub mod runner;

// Re-export commonly used types for convenience
pub use api::{
    preferred_token, DirectoryClient, EndpointDescriptor, EndpointKind, HttpTransport,
    TestRequest, TestToken, Transport, TransportBody, TransportResponse,
};
pub use core::{ConsoleConfig, Result, StopSignal, TestError};
pub use runner::state::{RunState, RunStatus};
pub use runner::{RunHandle, StreamingTestRunner};
