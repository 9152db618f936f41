//! API routes.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::chat;
use crate::handlers::{
    create_presigned_upload, delete_summary, get_summary, health, list_history, process_s3_video, process_video,
    ready, root, summarize_status, summarize_video,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, rate_limit_middleware, request_id, request_logging, security_headers, RateLimiterCache};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let summarize_routes = Router::new()
        .route("/summarize", get(summarize_status).post(summarize_video))
        // Uploads are bounded by the outer body limit instead of axum's default
        .route(
            "/process-video",
            post(process_video).layer(DefaultBodyLimit::disable()),
        )
        .route("/process-s3-video", post(process_s3_video))
        .route("/upload/presigned", post(create_presigned_upload));

    let history_routes = Router::new()
        .route("/history", get(list_history))
        .route("/history/:id", get(get_summary).delete(delete_summary));

    let chat_routes = Router::new()
        .route("/chat/conversations", post(chat::create_conversation))
        .route("/chat/conversations/:summary_id", get(chat::list_conversations))
        .route(
            "/chat/conversation/:conversation_id",
            get(chat::get_conversation).delete(chat::delete_conversation),
        )
        .route("/chat/message", post(chat::send_message));

    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(summarize_routes)
        .merge(history_routes)
        .merge(chat_routes)
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let health_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = match metrics_handle {
        Some(handle) => Router::new().route("/metrics", get(move || async move { handle.render() })),
        None => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
