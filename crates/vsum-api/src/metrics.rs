//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

use vsum_models::StreamEventType;

/// Install the Prometheus recorder and return the handle that renders it.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vsum_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsum_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsum_http_requests_in_flight";

    // Pipeline metrics
    pub const PIPELINES_STARTED_TOTAL: &str = "vsum_pipelines_started_total";
    pub const PIPELINES_COMPLETED_TOTAL: &str = "vsum_pipelines_completed_total";
    pub const PIPELINES_FAILED_TOTAL: &str = "vsum_pipelines_failed_total";
    pub const PIPELINE_DURATION_SECONDS: &str = "vsum_pipeline_duration_seconds";

    // Chat metrics
    pub const CHAT_MESSAGES_TOTAL: &str = "vsum_chat_messages_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "vsum_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a pipeline starting.
pub fn record_pipeline_started(pipeline: &'static str) {
    counter!(names::PIPELINES_STARTED_TOTAL, "pipeline" => pipeline).increment(1);
}

/// Record how a pipeline finished, keyed by its terminal event.
pub fn record_pipeline_finished(pipeline: &'static str, outcome: StreamEventType, duration_secs: f64) {
    match outcome {
        StreamEventType::Error => counter!(names::PIPELINES_FAILED_TOTAL, "pipeline" => pipeline).increment(1),
        _ => counter!(names::PIPELINES_COMPLETED_TOTAL, "pipeline" => pipeline).increment(1),
    }
    histogram!(names::PIPELINE_DURATION_SECONDS, "pipeline" => pipeline).record(duration_secs);
}

/// Record an answered chat message.
pub fn record_chat_message() {
    counter!(names::CHAT_MESSAGES_TOTAL).increment(1);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}").unwrap()
});
static NUMERIC_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/[0-9]+(/|$)").unwrap());
static CHAT_ID_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/chat/(conversations?)/[^/]+").unwrap());

/// Sanitize path for metrics labels (replace ids with placeholders).
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, ":id");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/:id$1");
    let path = CHAT_ID_SEGMENT.replace_all(&path, "/chat/$1/:id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("/api/history/42"), "/api/history/:id");
        assert_eq!(
            sanitize_path("/api/chat/conversation/550e8400-e29b-41d4-a716-446655440000"),
            "/api/chat/conversation/:id"
        );
        assert_eq!(sanitize_path("/api/chat/conversations/17"), "/api/chat/conversations/:id");
        assert_eq!(sanitize_path("/api/summarize"), "/api/summarize");
    }
}
