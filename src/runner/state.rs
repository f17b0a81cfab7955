//! Run state owned by a single test run.

use serde::{Deserialize, Serialize};

/// Lifecycle of a test run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Cancelled,
    Done,
    Failed,
}

impl RunStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Cancelled | RunStatus::Done | RunStatus::Failed)
    }
}

/// Mutable state of one run. A fresh value is created per run and mutated
/// only by the run task; observers see immutable snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub status: RunStatus,

    /// Accumulated display text. Append-only within a run.
    pub output_text: String,

    /// Raw decoded frames in byte-stream arrival order, each formatted as
    /// `[event] data` when an event name was active, else just `data`.
    pub raw_events: Vec<String>,

    /// Failure message when status is Failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunState {
    pub fn new() -> Self {
        Self {
            status: RunStatus::Idle,
            output_text: String::new(),
            raw_events: Vec::new(),
            error: None,
        }
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}
