//! Model test console - command line entry point.
//!
//! Runs one test against the configured gateway and prints the streamed
//! output as it arrives. Configuration comes from the environment
//! (`CONSOLE_API_BASE`, `CONSOLE_USER_ID`, optionally `CONSOLE_MODEL`,
//! `CONSOLE_ENDPOINT`, `CONSOLE_STREAM`); the prompt is taken from the
//! command line arguments.

use anyhow::{anyhow, Result};
use model_test_console::{
    core::init_logging, preferred_token, ConsoleConfig, DirectoryClient, EndpointKind,
    HttpTransport, RunStatus, StreamingTestRunner, TestRequest,
};
use std::io::Write;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before reading any environment variables)
    dotenvy::dotenv().ok();
    init_logging();

    let prompt: String = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        return Err(anyhow!("usage: model-test-console <prompt>"));
    }

    let config = ConsoleConfig::from_env()?;
    let endpoint = match std::env::var("CONSOLE_ENDPOINT").as_deref() {
        Ok("responses") => EndpointKind::Responses,
        Ok("messages") => EndpointKind::Messages,
        _ => EndpointKind::Chat,
    };
    let stream = std::env::var("CONSOLE_STREAM")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(true);

    let directory = DirectoryClient::new(&config)?;
    let tokens = directory.list_tokens().await?;
    let token = preferred_token(&tokens)
        .ok_or_else(|| anyhow!("no tokens available on the gateway"))?;
    tracing::info!(token = %token.name, group = %token.group, "selected token");

    let model = match std::env::var("CONSOLE_MODEL") {
        Ok(model) => model,
        Err(_) => {
            let models = directory.list_models().await?;
            models
                .into_iter()
                .next()
                .ok_or_else(|| anyhow!("no models available for this user"))?
        }
    };

    let transport = Arc::new(HttpTransport::new(&config)?);
    let runner = StreamingTestRunner::new(transport);
    let mut handle = runner.run_test(TestRequest {
        endpoint,
        model,
        prompt,
        temperature: 0.7,
        top_p: 1.0,
        max_tokens: 1024,
        stream,
        group: (!token.group.is_empty()).then(|| token.group.clone()),
        token_id: token.id,
    })?;

    // Stop the run on Ctrl-C instead of killing the process.
    let stop = handle.stop_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    let mut rx = handle.subscribe();
    let mut printed = 0;
    loop {
        {
            let state = rx.borrow();
            let text = &state.output_text;
            if text.len() > printed {
                print!("{}", &text[printed..]);
                std::io::stdout().flush().ok();
                printed = text.len();
            }
            if state.status.is_terminal() {
                break;
            }
        }
        if rx.changed().await.is_err() {
            break;
        }
    }

    let final_state = handle.wait().await;
    println!();
    match final_state.status {
        RunStatus::Done => tracing::info!(
            events = final_state.raw_events.len(),
            "test run completed"
        ),
        RunStatus::Cancelled => tracing::info!("test run cancelled"),
        RunStatus::Failed => {
            return Err(anyhow!(
                final_state
                    .error
                    .unwrap_or_else(|| "test run failed".to_string())
            ));
        }
        _ => {}
    }
    Ok(())
}
