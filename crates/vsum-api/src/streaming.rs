//! NDJSON progress streaming for pipeline routes.

use std::convert::Infallible;
use std::future::Future;
use std::time::Instant;

use axum::body::{Body, Bytes};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use futures_util::stream;
use tokio::sync::mpsc;
use tracing::{error, info};

use vsum_models::{StreamEvent, StreamEventType, DEFAULT_ERROR_MESSAGE};
use vsum_summarizer::{progress_channel, ChannelProgressSink, DEFAULT_CHANNEL_CAPACITY};

use crate::metrics;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

/// Spawn a pipeline and stream its events as newline-delimited JSON.
///
/// The pipeline runs on its own task; the body ends when the task drops
/// its sink. A client disconnect does not cancel the pipeline.
pub fn ndjson_response<F, Fut>(pipeline: &'static str, run: F) -> Response
where
    F: FnOnce(ChannelProgressSink) -> Fut,
    Fut: Future<Output = StreamEventType> + Send + 'static,
{
    let (sink, rx) = progress_channel(DEFAULT_CHANNEL_CAPACITY);
    let task = run(sink);

    metrics::record_pipeline_started(pipeline);
    let start = Instant::now();
    tokio::spawn(async move {
        let outcome = task.await;
        let elapsed = start.elapsed().as_secs_f64();
        info!(pipeline, outcome = outcome.as_str(), duration_secs = elapsed, "Pipeline finished");
        metrics::record_pipeline_finished(pipeline, outcome, elapsed);
    });

    (
        [
            (header::CONTENT_TYPE, NDJSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(event_stream(rx)),
    )
        .into_response()
}

fn event_stream(
    rx: mpsc::Receiver<StreamEvent>,
) -> impl futures_util::Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        let line = event.to_ndjson_line().unwrap_or_else(|e| {
            error!(error = %e, "Failed to serialize progress event");
            fallback_line()
        });
        Some((Ok(Bytes::from(line)), rx))
    })
}

fn fallback_line() -> String {
    format!(
        "{{\"type\":\"error\",\"message\":\"{}\",\"progress\":0}}\n",
        DEFAULT_ERROR_MESSAGE
    )
}
