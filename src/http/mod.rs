//! HTTP API for session summaries
//!
//! All `/api` routes require `Authorization: Bearer <token>`:
//! - GET /api/notes/sessions - List the caller's summaries
//! - POST /api/notes/sessions - Summarize a voice note
//! - POST /api/notes/transcripts - Summarize a session transcript
//! - GET /api/notes/sessions/:id - Fetch one summary
//! - POST /api/notes/sessions/:id/regenerate - Regenerate from the source text
//! - DELETE /api/notes/sessions/:id - Delete a summary
//! - GET /health - Health check
//!
//! Malformed bodies and path ids get the same `{error, details}` JSON as
//! other failures.

mod auth;
mod extract;
mod handlers;
mod routes;
mod state;

pub use auth::AuthenticatedUser;
pub use handlers::{ErrorResponse, SummaryCreatedResponse};
pub use routes::create_router;
pub use state::AppState;
