//! Router assembly: HTTP endpoints, static files, CORS, and HTTP tracing.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - JSON API under `/api/...`
/// - Static dashboard from `./static` with index fallback
/// - CORS (allow any origin/method/headers)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        .route("/api/health", get(http::http_health))
        // Progression
        .route("/api/stats", get(http::http_get_stats))
        .route("/api/stats/:kind", post(http::http_post_activity))
        .route("/api/achievements", get(http::http_get_achievements))
        // Quizzes
        .route("/api/quiz/generate", post(http::http_post_quiz_generate))
        .route("/api/quiz/:quiz_id/submit", post(http::http_post_quiz_submit))
        .route("/api/featured", get(http::http_get_featured))
        .route("/api/featured/:topic/quiz", post(http::http_post_featured_quiz))
        // Quest lines
        .route("/api/quests/generate", post(http::http_post_quests_generate))
        .route("/api/quests/:quest_line_id/complete", post(http::http_post_quest_complete))
        .route("/api/quests/:quest_line_id/progress", get(http::http_get_quest_progress))
        // Code arena
        .route("/api/challenges/topics", get(http::http_get_challenge_topics))
        .route("/api/challenges/generate", post(http::http_post_challenge_generate))
        .route("/api/challenges/:challenge_id/submit", post(http::http_post_challenge_submit))
        // State + CORS + HTTP tracing
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Frontend fallback
        .fallback_service(static_service)
}
