//! Core functionality for the model test console.
//!
//! This module contains fundamental components used throughout the crate:
//! - Configuration management
//! - Error handling
//! - Run cancellation
//! - Logging setup

pub mod cancel;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use cancel::StopSignal;
pub use config::ConsoleConfig;
pub use error::{Result, TestError};
pub use logging::{generate_run_id, init_logging};
