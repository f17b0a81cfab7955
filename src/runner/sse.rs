//! Incremental SSE-style line decoder.
//!
//! Upstream-compatible endpoints frame streamed responses as `event:` /
//! `data:` lines. Chunk boundaries fall anywhere, so the decoder keeps a
//! growable text buffer and only parses lines once their terminating `\n`
//! has arrived; the trailing partial line waits for the next chunk.

/// Literal payload signaling end of stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded frame from the byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name from the most recent `event:` line, if any
    pub event: Option<String>,
    /// Payload of the `data:` line
    pub data: String,
}

impl SseFrame {
    /// Raw diagnostic form: `[event] data` when an event name is active,
    /// else just the data.
    pub fn raw(&self) -> String {
        match &self.event {
            Some(event) => format!("[{}] {}", event, self.data),
            None => self.data.clone(),
        }
    }
}

/// Item yielded by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseItem {
    Frame(SseFrame),
    /// The `[DONE]` sentinel; no further chunks should be read.
    Done,
}

/// Incremental decoder state.
///
/// The buffer holds raw bytes so that a multi-byte UTF-8 character split
/// across chunk boundaries reassembles correctly; text decoding happens per
/// complete line (a `\n` byte never occurs inside a multi-byte sequence).
pub struct SseDecoder {
    buffer: Vec<u8>,
    current_event: Option<String>,
    finished: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            current_event: None,
            finished: false,
        }
    }

    /// Whether the done sentinel has been seen.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one chunk of bytes and return the frames completed by it.
    ///
    /// Lines other than `event:` / `data:` are ignored; empty data lines are
    /// skipped. After the sentinel, remaining input is discarded.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseItem> {
        if self.finished {
            return vec![];
        }
        self.buffer.extend_from_slice(chunk);

        let mut items = vec![];
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line_bytes);
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix("event:") {
                self.current_event = Some(rest.trim_start().to_string());
                continue;
            }
            let Some(rest) = trimmed.strip_prefix("data:") else {
                continue;
            };
            let data = rest.trim_start();
            if data.is_empty() {
                continue;
            }
            if data == DONE_SENTINEL {
                self.finished = true;
                items.push(SseItem::Done);
                break;
            }
            items.push(SseItem::Frame(SseFrame {
                event: self.current_event.take(),
                data: data.to_string(),
            }));
        }
        items
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
