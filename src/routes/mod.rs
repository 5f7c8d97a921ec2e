//! Router assembly: HTTP endpoints, WebSocket upgrade, static files, CORS, and HTTP tracing.

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
pub mod ws;

/// Build the application router with:
/// - WebSocket at `/ws` (AI tutor chat)
/// - REST-ish API under `/api/v1/...`
/// - Static SPA from `./static` with index fallback
/// - CORS (allow any origin/method/headers) – adjust for production if needed
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    // Static files with SPA fallback
    let static_service = ServeDir::new("./static")
        .append_index_html_on_directories(true)
        .not_found_service(ServeFile::new("./static/index.html"));

    Router::new()
        // WebSocket
        .route("/ws", get(ws::ws_upgrade))
        // HTTP API
        .route("/api/v1/health", get(http::http_health))
        .route("/api/v1/auth/register", post(http::http_post_register))
        .route("/api/v1/auth/login", post(http::http_post_login))
        .route("/api/v1/auth/logout", post(http::http_post_logout))
        .route("/api/v1/session", get(http::http_get_session).post(http::http_post_session))
        .route("/api/v1/session/theme", post(http::http_post_theme))
        .route("/api/v1/users", get(http::http_get_users))
        .route("/api/v1/settings", get(http::http_get_settings))
        .route("/api/v1/content", get(http::http_get_content))
        .route("/api/v1/leaderboard", get(http::http_get_leaderboard))
        .route("/api/v1/messages", get(http::http_get_messages).post(http::http_post_message))
        .route("/api/v1/requests", get(http::http_get_requests).post(http::http_post_request))
        .route("/api/v1/requests/accept", post(http::http_post_request_accept))
        .route("/api/v1/requests/decline", post(http::http_post_request_decline))
        .route("/api/v1/quiz", post(http::http_post_quiz))
        .route("/api/v1/chat", post(http::http_post_chat))
        .route("/api/v1/image/edit", post(http::http_post_image_edit))
        // Admin draft (content tree editing; durable only on save)
        .route("/api/v1/admin/draft", get(http::http_get_draft))
        .route("/api/v1/admin/draft/save", post(http::http_post_draft_save))
        .route("/api/v1/admin/draft/discard", post(http::http_post_draft_discard))
        .route("/api/v1/admin/draft/subject", post(http::http_post_add_subject))
        .route("/api/v1/admin/draft/subject/delete", post(http::http_post_delete_subject))
        .route("/api/v1/admin/draft/chapter", post(http::http_post_add_chapter))
        .route("/api/v1/admin/draft/chapter/delete", post(http::http_post_delete_chapter))
        .route("/api/v1/admin/draft/lesson", post(http::http_post_add_lesson))
        .route("/api/v1/admin/draft/lesson/delete", post(http::http_post_delete_lesson))
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
