//! Streaming utilities for Server-Sent Events (SSE)
//!
//! Turns a studio run into an SSE stream of project snapshots.

use crate::error::AppError;
use crate::studio::{AutomationOrchestrator, RunOutcome, StudioUpdate};
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use futures_util::{stream::Stream, StreamExt};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinError;

/// SSE stream termination signal
pub const SSE_DONE_SIGNAL: &str = "[DONE]";

/// SSE error prefix
pub const SSE_ERROR_PREFIX: &str = "[ERROR]";

/// Wrap a stream of event payloads into an SSE HTTP response
///
/// Each item becomes one `data:` event. Errors are sent as
/// `data: [ERROR] <message>` and do not end the stream.
pub fn sse_response<S>(stream: S) -> Result<Response, AppError>
where
    S: Stream<Item = Result<String, AppError>> + Send + 'static,
{
    let sse_stream = stream.map(|event_result| {
        let sse_text = match event_result {
            Ok(data) => format!("data: {}\n\n", data),
            Err(e) => format!("data: {} {}\n\n", SSE_ERROR_PREFIX, e),
        };
        Ok::<_, std::io::Error>(sse_text)
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(sse_stream))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build SSE response: {}", e)))
}

enum RunStep {
    Update(StudioUpdate),
    Lagged(u64),
    Finished(Result<RunOutcome, JoinError>),
    Closed,
}

/// Start a run in the background and stream its updates
///
/// `updates` must be subscribed before the run is spawned so the first
/// snapshot is not missed. The run keeps going if the client disconnects.
pub fn run_stream(
    studio: Arc<AutomationOrchestrator>,
    mut updates: broadcast::Receiver<StudioUpdate>,
) -> impl Stream<Item = Result<String, AppError>> {
    use async_stream::stream;

    stream! {
        let mut run = tokio::spawn(async move { studio.run().await });

        loop {
            let step = tokio::select! {
                biased;
                update = updates.recv() => match update {
                    Ok(update) => RunStep::Update(update),
                    Err(RecvError::Lagged(skipped)) => RunStep::Lagged(skipped),
                    Err(RecvError::Closed) => RunStep::Closed,
                },
                outcome = &mut run => RunStep::Finished(outcome),
            };

            match step {
                RunStep::Update(update) => yield encode(&update),
                RunStep::Lagged(skipped) => {
                    tracing::warn!(skipped, "SSE subscriber lagged behind studio updates");
                }
                RunStep::Closed => break,
                RunStep::Finished(outcome) => {
                    // Everything the run published is already buffered.
                    loop {
                        match updates.try_recv() {
                            Ok(update) => yield encode(&update),
                            Err(TryRecvError::Lagged(_)) => continue,
                            Err(_) => break,
                        }
                    }
                    match outcome {
                        Ok(RunOutcome::Ignored) => {
                            yield Ok(json!({ "started": false }).to_string());
                        }
                        Ok(_) => {}
                        Err(e) => {
                            yield Err(AppError::Internal(anyhow::anyhow!("Run task failed: {}", e)));
                        }
                    }
                    break;
                }
            }
        }

        yield Ok(SSE_DONE_SIGNAL.to_string());
    }
}

fn encode(update: &StudioUpdate) -> Result<String, AppError> {
    serde_json::to_string(update)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode update: {}", e)))
}
