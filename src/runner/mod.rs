//! The streaming test runner.
//!
//! [`StreamingTestRunner`] issues one test request against the gateway,
//! consumes the response (buffered or as an incrementally-decoded SSE
//! stream), normalizes whatever payload shape comes back into a running text
//! output, and supports cooperative cancellation. At most one run is active
//! per runner instance; observers watch [`RunState`] snapshots through the
//! returned [`RunHandle`].

pub mod normalize;
pub mod sse;
pub mod state;

use crate::api::models::TestRequest;
use crate::api::transport::{
    error_message_from_body, Transport, TransportBody, TransportResponse,
};
use crate::core::cancel::StopSignal;
use crate::core::error::{Result, TestError};
use crate::core::logging::generate_run_id;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use normalize::{extract_response_text, extract_stream_text};
use sse::{SseDecoder, SseItem};
use state::{RunState, RunStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Handle to an in-progress (or finished) test run.
#[derive(Debug, Clone)]
pub struct RunHandle {
    receiver: watch::Receiver<RunState>,
    stop: StopSignal,
}

impl RunHandle {
    /// Snapshot of the current run state.
    pub fn state(&self) -> RunState {
        self.receiver.borrow().clone()
    }

    /// Receiver that observes every state update.
    pub fn subscribe(&self) -> watch::Receiver<RunState> {
        self.receiver.clone()
    }

    /// Signal cancellation. Idempotent; a no-op once the run has finished.
    pub fn cancel(&self) {
        self.stop.stop();
    }

    /// Clone of the underlying stop signal.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Wait until the run reaches a terminal status and return the final
    /// state.
    pub async fn wait(&mut self) -> RunState {
        loop {
            if self.receiver.borrow().status.is_terminal() {
                return self.receiver.borrow().clone();
            }
            if self.receiver.changed().await.is_err() {
                // Run task gone; whatever was last published is final.
                return self.receiver.borrow().clone();
            }
        }
    }
}

/// Issues test runs against a [`Transport`].
pub struct StreamingTestRunner {
    transport: Arc<dyn Transport>,
    in_flight: Arc<AtomicBool>,
}

impl StreamingTestRunner {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start one test run.
    ///
    /// Rejects invalid requests (`Validation`) and overlapping runs (`Busy`)
    /// before any network traffic. The run itself executes on a spawned
    /// task; progress is observed through the returned [`RunHandle`].
    pub fn run_test(&self, request: TestRequest) -> Result<RunHandle> {
        validate(&request)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(TestError::Busy);
        }
        let guard = InFlightGuard(self.in_flight.clone());

        let mut initial = RunState::new();
        initial.status = RunStatus::Running;
        let (tx, rx) = watch::channel(initial);
        let stop = StopSignal::new();

        let transport = self.transport.clone();
        let stop_for_task = stop.clone();
        tokio::spawn(async move {
            drive_run(transport, request, tx, stop_for_task, guard).await;
        });

        Ok(RunHandle { receiver: rx, stop })
    }
}

/// Clears the single-run flag on every exit path of the run task.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn validate(request: &TestRequest) -> Result<()> {
    if request.token_id <= 0 {
        return Err(TestError::Validation("no token selected".to_string()));
    }
    if request.model.trim().is_empty() {
        return Err(TestError::Validation("no model selected".to_string()));
    }
    if request.prompt.trim().is_empty() {
        return Err(TestError::Validation("prompt is empty".to_string()));
    }
    Ok(())
}

/// Per-run publisher: owns the state value and pushes snapshots to watchers.
struct RunPublisher {
    state: RunState,
    tx: watch::Sender<RunState>,
    guard: Option<InFlightGuard>,
}

impl RunPublisher {
    fn new(tx: watch::Sender<RunState>, guard: InFlightGuard) -> Self {
        let mut state = RunState::new();
        state.status = RunStatus::Running;
        Self {
            state,
            tx,
            guard: Some(guard),
        }
    }

    fn publish(&self) {
        let _ = self.tx.send(self.state.clone());
    }

    fn append_text(&mut self, fragment: &str) {
        self.state.output_text.push_str(fragment);
        self.publish();
    }

    fn log_raw(&mut self, raw: String) {
        self.state.raw_events.push(raw);
        self.publish();
    }

    fn finish(&mut self, status: RunStatus, error: Option<String>) {
        // Release the single-run slot before observers can see the terminal
        // state, so a follow-up run started right after wait() is accepted.
        self.guard.take();
        self.state.status = status;
        self.state.error = error;
        self.publish();
    }
}

async fn drive_run(
    transport: Arc<dyn Transport>,
    request: TestRequest,
    tx: watch::Sender<RunState>,
    stop: StopSignal,
    guard: InFlightGuard,
) {
    let run_id = generate_run_id();
    let path = request.endpoint.descriptor().request_path;
    let mut publisher = RunPublisher::new(tx, guard);

    tracing::info!(
        run_id = %run_id,
        endpoint = request.endpoint.label(),
        model = %request.model,
        stream = request.stream,
        "starting test run"
    );

    let envelope = request.build_envelope();

    // Cancellation must also interrupt the initial request, before the
    // first byte of the response arrives.
    let response = tokio::select! {
        _ = stop.stopped() => {
            tracing::info!(run_id = %run_id, "run cancelled before response");
            publisher.finish(RunStatus::Cancelled, None);
            return;
        }
        result = transport.execute(path, &envelope, request.stream) => result,
    };

    let response = match response {
        Ok(response) => response,
        Err(err) => {
            if stop.is_stopped() {
                publisher.finish(RunStatus::Cancelled, None);
            } else {
                tracing::warn!(run_id = %run_id, error = %err, "test request failed");
                publisher.finish(RunStatus::Failed, Some(err.to_string()));
            }
            return;
        }
    };

    if !(200..300).contains(&response.status) {
        let status = response.status;
        let message = match body_bytes(response).await {
            Ok(bytes) => error_message_from_body(status, &bytes),
            Err(_) => format!("HTTP {}", status),
        };
        tracing::warn!(run_id = %run_id, status, message = %message, "gateway returned error");
        publisher.finish(
            RunStatus::Failed,
            Some(TestError::from_status(status, message).to_string()),
        );
        return;
    }

    match response.body {
        TransportBody::Buffered(bytes) if !request.stream => {
            finish_buffered(&mut publisher, &bytes);
        }
        TransportBody::Buffered(_) => {
            // A streamed run must get a readable stream back.
            publisher.finish(
                RunStatus::Failed,
                Some(TestError::StreamUnavailable.to_string()),
            );
        }
        TransportBody::Stream(stream) => {
            consume_stream(&mut publisher, stream, &stop, &run_id).await;
        }
    }
}

/// Non-streamed completion: normalize the whole body, falling back to the
/// raw serialized response when no text field is recognized.
fn finish_buffered(publisher: &mut RunPublisher, bytes: &[u8]) {
    match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(body) => {
            let text = extract_response_text(&body);
            if text.is_empty() {
                let raw = serde_json::to_string_pretty(&body)
                    .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned());
                publisher.append_text(&raw);
            } else {
                publisher.append_text(&text);
            }
            publisher.finish(RunStatus::Done, None);
        }
        Err(_) => {
            publisher.append_text(&String::from_utf8_lossy(bytes));
            publisher.finish(RunStatus::Done, None);
        }
    }
}

async fn consume_stream(
    publisher: &mut RunPublisher,
    mut stream: BoxStream<'static, Result<Bytes>>,
    stop: &StopSignal,
    run_id: &str,
) {
    let mut decoder = SseDecoder::new();

    loop {
        let chunk = tokio::select! {
            _ = stop.stopped() => {
                tracing::info!(run_id = %run_id, "run cancelled mid-stream");
                publisher.finish(RunStatus::Cancelled, None);
                return;
            }
            chunk = stream.next() => chunk,
        };

        match chunk {
            None => {
                tracing::debug!(run_id = %run_id, "stream ended");
                publisher.finish(RunStatus::Done, None);
                return;
            }
            Some(Err(err)) => {
                // A cancel-triggered abort can surface as a read error
                // depending on timing; it is still a clean stop.
                if stop.is_stopped() {
                    publisher.finish(RunStatus::Cancelled, None);
                } else {
                    tracing::warn!(run_id = %run_id, error = %err, "stream read failed");
                    publisher.finish(RunStatus::Failed, Some(err.to_string()));
                }
                return;
            }
            Some(Ok(bytes)) => {
                for item in decoder.feed(&bytes) {
                    match item {
                        SseItem::Done => {
                            publisher.finish(RunStatus::Done, None);
                            return;
                        }
                        SseItem::Frame(frame) => {
                            // Log the raw frame before parsing so diagnostics
                            // survive malformed payloads.
                            publisher.log_raw(frame.raw());
                            match serde_json::from_str::<serde_json::Value>(&frame.data) {
                                Ok(payload) => {
                                    let fragment = extract_stream_text(&payload);
                                    if !fragment.is_empty() {
                                        publisher.append_text(&fragment);
                                    }
                                }
                                Err(_) => {
                                    // Best-effort stream: malformed frames
                                    // contribute nothing and are not errors.
                                    tracing::debug!(run_id = %run_id, "unparseable frame payload");
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Collect a transport body into bytes, draining a stream if necessary.
async fn body_bytes(response: TransportResponse) -> Result<Bytes> {
    match response.body {
        TransportBody::Buffered(bytes) => Ok(bytes),
        TransportBody::Stream(mut stream) => {
            let mut collected = Vec::new();
            while let Some(chunk) = stream.next().await {
                collected.extend_from_slice(&chunk?);
            }
            Ok(Bytes::from(collected))
        }
    }
}
