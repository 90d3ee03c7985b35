//! Persistence for session summaries and their source records
//!
//! - `MemoryStore`: process-local maps, used by tests and `--in-memory` runs
//! - `SqliteStore`: SQLite file via rusqlite

mod memory;
mod models;
mod sqlite;

pub use memory::MemoryStore;
pub use models::{
    NewSessionSummary, NewTranscription, SessionSummary, SummarySource, Transcription,
    TranscriptionStatus, VoiceNote,
};
pub use sqlite::SqliteStore;

use crate::error::Result;
use uuid::Uuid;

/// Storage backend for the summary pipeline
#[async_trait::async_trait]
pub trait NotesStore: Send + Sync {
    /// Insert a summary, assigning id and timestamps
    async fn create_session_summary(&self, record: NewSessionSummary) -> Result<SessionSummary>;

    async fn get_session_summary_by_id(&self, id: Uuid) -> Result<Option<SessionSummary>>;

    /// Fails with `NotFound` if no such row exists
    async fn delete_session_summary(&self, id: Uuid) -> Result<()>;

    /// All summaries owned by `user_id`, newest session first
    async fn list_session_summaries(&self, user_id: &str) -> Result<Vec<SessionSummary>>;

    async fn create_transcription(&self, record: NewTranscription) -> Result<Transcription>;

    async fn get_transcription_by_id(&self, id: Uuid) -> Result<Option<Transcription>>;

    /// Set a transcription's status; fails with `NotFound` if absent
    async fn update_transcription_status(
        &self,
        id: Uuid,
        status: TranscriptionStatus,
    ) -> Result<()>;

    /// Mark a transcription archived; fails with `NotFound` if absent
    async fn archive_transcription(&self, id: Uuid) -> Result<()> {
        self.update_transcription_status(id, TranscriptionStatus::Archived)
            .await
    }

    async fn create_voice_note(&self, user_id: &str, text: &str) -> Result<VoiceNote>;

    async fn get_voice_note_by_id(&self, id: Uuid) -> Result<Option<VoiceNote>>;
}
