use super::auth::AuthenticatedUser;
use super::extract::{ApiJson, ApiPath};
use super::state::AppState;
use crate::error::NotesError;
use crate::store::SessionSummary;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateVoiceNoteRequest {
    /// Note text typed or dictated by the client
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTranscriptRequest {
    /// Full session transcript
    pub text: String,

    /// Object-storage key of the session audio, if it was uploaded
    pub audio_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryCreatedResponse {
    pub success: bool,
    #[serde(rename = "sessionSummaryId")]
    pub session_summary_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Map a pipeline error to a status code and JSON body
pub(super) fn error_response(action: &str, err: NotesError) -> Response {
    let status = match &err {
        NotesError::NotFound { .. } => StatusCode::NOT_FOUND,
        NotesError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Failed to {}: {}", action, err);
    } else {
        info!("Could not {}: {}", action, err);
    }

    (
        status,
        Json(ErrorResponse {
            error: format!("Failed to {}", action),
            details: Some(err.to_string()),
        }),
    )
        .into_response()
}

/// Load a summary and make sure the caller owns it. Other users' summaries
/// are reported as missing.
async fn owned_summary(
    state: &AppState,
    user: &AuthenticatedUser,
    session_id: Uuid,
) -> Result<SessionSummary, NotesError> {
    let summary = state.pipeline.get_session_summary(session_id).await?;
    if summary.user_id != user.user_id {
        return Err(NotesError::not_found("Session summary", session_id));
    }
    Ok(summary)
}

fn created(summary: &SessionSummary) -> Response {
    (
        StatusCode::OK,
        Json(SummaryCreatedResponse {
            success: true,
            session_summary_id: summary.id,
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/notes/sessions
/// List the caller's session summaries, newest first
pub async fn list_sessions(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    match state.pipeline.list_session_summaries(&user.user_id).await {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => error_response("fetch session summaries", e),
    }
}

/// POST /api/notes/sessions
/// Store a voice note and summarize it
pub async fn create_voice_note_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<CreateVoiceNoteRequest>,
) -> impl IntoResponse {
    info!("Creating voice-note session summary for {}", user.user_id);

    match state
        .pipeline
        .create_voice_note_summary(&user.user_id, &req.text)
        .await
    {
        Ok(summary) => created(&summary),
        Err(e) => error_response("create session summary", e),
    }
}

/// POST /api/notes/transcripts
/// Store a session transcript and summarize it
pub async fn create_transcript_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiJson(req): ApiJson<CreateTranscriptRequest>,
) -> impl IntoResponse {
    info!("Creating transcript session summary for {}", user.user_id);

    match state
        .pipeline
        .create_transcript_summary(&user.user_id, &req.text, req.audio_key)
        .await
    {
        Ok(summary) => created(&summary),
        Err(e) => error_response("create session summary", e),
    }
}

/// GET /api/notes/sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(session_id): ApiPath<Uuid>,
) -> impl IntoResponse {
    match owned_summary(&state, &user, session_id).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response("fetch session summary", e),
    }
}

/// POST /api/notes/sessions/:session_id/regenerate
/// Regenerate a summary from its original source text
pub async fn regenerate_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(session_id): ApiPath<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = owned_summary(&state, &user, session_id).await {
        return error_response("regenerate summary", e);
    }

    match state.pipeline.regenerate_session_summary(session_id).await {
        Ok(summary) => created(&summary),
        Err(e) => error_response("regenerate summary", e),
    }
}

/// DELETE /api/notes/sessions/:session_id
pub async fn delete_session(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ApiPath(session_id): ApiPath<Uuid>,
) -> impl IntoResponse {
    if let Err(e) = owned_summary(&state, &user, session_id).await {
        return error_response("delete session", e);
    }

    match state.pipeline.delete_session_summary(session_id).await {
        Ok(()) => (StatusCode::OK, Json(SuccessResponse { success: true })).into_response(),
        Err(e) => error_response("delete session", e),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
