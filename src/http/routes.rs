use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Session summaries
        .route(
            "/api/notes/sessions",
            get(handlers::list_sessions).post(handlers::create_voice_note_session),
        )
        .route(
            "/api/notes/transcripts",
            post(handlers::create_transcript_session),
        )
        .route(
            "/api/notes/sessions/:session_id",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/notes/sessions/:session_id/regenerate",
            post(handlers::regenerate_session),
        )
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
