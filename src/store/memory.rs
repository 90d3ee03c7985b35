use super::models::{
    NewSessionSummary, NewTranscription, SessionSummary, Transcription, TranscriptionStatus,
    VoiceNote,
};
use super::NotesStore;
use crate::error::{NotesError, Result};
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-process store backed by hash maps
#[derive(Default)]
pub struct MemoryStore {
    summaries: RwLock<HashMap<Uuid, SessionSummary>>,
    transcriptions: RwLock<HashMap<Uuid, Transcription>>,
    voice_notes: RwLock<HashMap<Uuid, VoiceNote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a transcription as-is (seeding fixtures)
    pub async fn put_transcription(&self, transcription: Transcription) {
        let mut transcriptions = self.transcriptions.write().await;
        transcriptions.insert(transcription.id, transcription);
    }

    /// Insert or replace a voice note as-is (seeding fixtures)
    pub async fn put_voice_note(&self, note: VoiceNote) {
        let mut notes = self.voice_notes.write().await;
        notes.insert(note.id, note);
    }

    /// All transcriptions owned by `user_id`, in no particular order
    pub async fn transcriptions_for(&self, user_id: &str) -> Vec<Transcription> {
        let transcriptions = self.transcriptions.read().await;
        transcriptions
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    pub async fn summary_count(&self) -> usize {
        self.summaries.read().await.len()
    }
}

#[async_trait::async_trait]
impl NotesStore for MemoryStore {
    async fn create_session_summary(&self, record: NewSessionSummary) -> Result<SessionSummary> {
        let now = Utc::now();
        let summary = SessionSummary {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            source: record.source,
            session_date: record.session_date,
            content: record.content,
            created_at: now,
            updated_at: now,
        };

        let mut summaries = self.summaries.write().await;
        summaries.insert(summary.id, summary.clone());
        Ok(summary)
    }

    async fn get_session_summary_by_id(&self, id: Uuid) -> Result<Option<SessionSummary>> {
        let summaries = self.summaries.read().await;
        Ok(summaries.get(&id).cloned())
    }

    async fn delete_session_summary(&self, id: Uuid) -> Result<()> {
        let mut summaries = self.summaries.write().await;
        summaries
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| NotesError::not_found("Session summary", id))
    }

    async fn list_session_summaries(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let summaries = self.summaries.read().await;
        let mut owned: Vec<SessionSummary> = summaries
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.session_date
                .cmp(&a.session_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(owned)
    }

    async fn create_transcription(&self, record: NewTranscription) -> Result<Transcription> {
        let transcription = Transcription {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            text: record.text,
            audio_key: record.audio_key,
            status: record.status,
            created_at: Utc::now(),
        };
        self.put_transcription(transcription.clone()).await;
        Ok(transcription)
    }

    async fn get_transcription_by_id(&self, id: Uuid) -> Result<Option<Transcription>> {
        let transcriptions = self.transcriptions.read().await;
        Ok(transcriptions.get(&id).cloned())
    }

    async fn update_transcription_status(
        &self,
        id: Uuid,
        status: TranscriptionStatus,
    ) -> Result<()> {
        let mut transcriptions = self.transcriptions.write().await;
        match transcriptions.get_mut(&id) {
            Some(t) => {
                t.status = status;
                Ok(())
            }
            None => Err(NotesError::not_found("Transcription", id)),
        }
    }

    async fn create_voice_note(&self, user_id: &str, text: &str) -> Result<VoiceNote> {
        let note = VoiceNote {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            text: Some(text.to_string()),
            created_at: Utc::now(),
        };
        self.put_voice_note(note.clone()).await;
        Ok(note)
    }

    async fn get_voice_note_by_id(&self, id: Uuid) -> Result<Option<VoiceNote>> {
        let notes = self.voice_notes.read().await;
        Ok(notes.get(&id).cloned())
    }
}
