use super::chunker::{self, DEFAULT_MAX_CHUNK_SIZE};
use super::schema::GeneratedSessionSummary;
use super::summarizer::{merge_summaries, summarize_chunk};
use crate::error::{NotesError, Result};
use crate::generation::StructuredGenerator;
use crate::objects::ObjectStore;
use crate::store::{
    NewSessionSummary, NewTranscription, NotesStore, SessionSummary, SummarySource,
    TranscriptionStatus,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Tuning for the summary pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Soft upper bound on chunk length, in characters
    pub max_chunk_size: usize,

    /// Pause between consecutive per-chunk generation calls (rate-limit throttle)
    pub inter_chunk_delay: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            inter_chunk_delay: Duration::from_secs(1),
        }
    }
}

/// Orchestrates summary creation, regeneration and deletion.
///
/// Transcripts go chunk → summarize each chunk in order → merge (only when
/// there is more than one chunk) → persist. Voice notes are summarized in a
/// single call. Nothing is persisted unless every generation call succeeds.
pub struct SummaryPipeline {
    config: PipelineConfig,
    generator: Arc<dyn StructuredGenerator>,
    store: Arc<dyn NotesStore>,
    objects: Arc<dyn ObjectStore>,
}

impl SummaryPipeline {
    pub fn new(
        config: PipelineConfig,
        generator: Arc<dyn StructuredGenerator>,
        store: Arc<dyn NotesStore>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            generator,
            store,
            objects,
        }
    }

    /// Summarize a session transcript and store the result.
    pub async fn summarize_from_transcript(
        &self,
        text: &str,
        transcription_id: Uuid,
        user_id: &str,
    ) -> Result<SessionSummary> {
        let chunks = chunker::split_into_chunks(text, self.config.max_chunk_size);
        if chunks.is_empty() {
            return Err(NotesError::InvalidInput {
                message: format!("transcription {} has no text to summarize", transcription_id),
            });
        }

        info!(
            "Summarizing transcription {} in {} chunk(s)",
            transcription_id,
            chunks.len()
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.config.inter_chunk_delay).await;
            }

            let partial = summarize_chunk(self.generator.as_ref(), chunk, false)
                .await
                .map_err(|e| {
                    error!(
                        "Chunk {}/{} of transcription {} failed: {}",
                        i + 1,
                        chunks.len(),
                        transcription_id,
                        e
                    );
                    e
                })?;
            partials.push(partial);
        }

        let content = self.combine(partials).await?;

        self.persist(user_id, SummarySource::Transcription(transcription_id), content)
            .await
    }

    /// Summarize a voice note (single call, no chunking) and store the result.
    pub async fn summarize_from_voice_note(
        &self,
        text: &str,
        voice_note_id: Uuid,
        user_id: &str,
    ) -> Result<SessionSummary> {
        if text.trim().is_empty() {
            return Err(NotesError::InvalidInput {
                message: format!("voice note {} is empty", voice_note_id),
            });
        }

        info!("Summarizing voice note {}", voice_note_id);

        let content = summarize_chunk(self.generator.as_ref(), text, true).await?;

        self.persist(user_id, SummarySource::VoiceNote(voice_note_id), content)
            .await
    }

    /// Store a voice note for `user_id`, then summarize it.
    pub async fn create_voice_note_summary(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<SessionSummary> {
        if text.trim().is_empty() {
            return Err(NotesError::InvalidInput {
                message: "text must not be empty".to_string(),
            });
        }

        let note = self.store.create_voice_note(user_id, text).await?;
        self.summarize_from_voice_note(text, note.id, user_id).await
    }

    /// Store a transcription for `user_id`, then summarize it.
    ///
    /// The transcription is `extracting_summary` while generation runs and
    /// ends up `completed` once the summary is stored, or `failed` otherwise.
    pub async fn create_transcript_summary(
        &self,
        user_id: &str,
        text: &str,
        audio_key: Option<String>,
    ) -> Result<SessionSummary> {
        if text.trim().is_empty() {
            return Err(NotesError::InvalidInput {
                message: "text must not be empty".to_string(),
            });
        }

        let transcription = self
            .store
            .create_transcription(NewTranscription {
                user_id: user_id.to_string(),
                text: Some(text.to_string()),
                audio_key,
                status: TranscriptionStatus::ExtractingSummary,
            })
            .await?;

        match self
            .summarize_from_transcript(text, transcription.id, user_id)
            .await
        {
            Ok(summary) => {
                self.store
                    .update_transcription_status(transcription.id, TranscriptionStatus::Completed)
                    .await?;
                Ok(summary)
            }
            Err(e) => {
                if let Err(status_err) = self
                    .store
                    .update_transcription_status(transcription.id, TranscriptionStatus::Failed)
                    .await
                {
                    warn!(
                        "Could not mark transcription {} failed: {}",
                        transcription.id, status_err
                    );
                }
                Err(e)
            }
        }
    }

    pub async fn get_session_summary(&self, session_id: Uuid) -> Result<SessionSummary> {
        self.store
            .get_session_summary_by_id(session_id)
            .await?
            .ok_or_else(|| NotesError::not_found("Session summary", session_id))
    }

    pub async fn list_session_summaries(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        self.store.list_session_summaries(user_id).await
    }

    /// Re-run the pipeline from the summary's original source text, then
    /// remove the old summary. The old row is only deleted once the new one
    /// has been stored.
    pub async fn regenerate_session_summary(&self, session_id: Uuid) -> Result<SessionSummary> {
        let existing = self.get_session_summary(session_id).await?;

        info!("Regenerating session summary {}", session_id);

        let regenerated = match existing.source {
            SummarySource::Transcription(transcription_id) => {
                let text = self
                    .store
                    .get_transcription_by_id(transcription_id)
                    .await?
                    .and_then(|t| t.text)
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| NotesError::not_found("Transcription text", transcription_id))?;

                self.summarize_from_transcript(&text, transcription_id, &existing.user_id)
                    .await?
            }
            SummarySource::VoiceNote(voice_note_id) => {
                let text = self
                    .store
                    .get_voice_note_by_id(voice_note_id)
                    .await?
                    .and_then(|n| n.text)
                    .filter(|t| !t.trim().is_empty())
                    .ok_or_else(|| NotesError::not_found("Voice note text", voice_note_id))?;

                self.summarize_from_voice_note(&text, voice_note_id, &existing.user_id)
                    .await?
            }
        };

        self.store.delete_session_summary(session_id).await.map_err(|e| {
            error!(
                "Stored regenerated summary {} but failed to delete old summary {}: {}",
                regenerated.id, session_id, e
            );
            e
        })?;

        info!(
            "Session summary {} replaced by {}",
            session_id, regenerated.id
        );

        Ok(regenerated)
    }

    /// Delete a summary. For transcript-derived summaries the session audio
    /// is removed from object storage and the transcription archived first.
    pub async fn delete_session_summary(&self, session_id: Uuid) -> Result<()> {
        let existing = self.get_session_summary(session_id).await?;

        if let SummarySource::Transcription(transcription_id) = existing.source {
            match self.store.get_transcription_by_id(transcription_id).await? {
                Some(transcription) => {
                    if let Some(key) = transcription.audio_key.as_deref() {
                        self.objects.delete_object(key).await.map_err(|e| {
                            error!("Failed to delete audio {} for {}: {}", key, session_id, e);
                            e
                        })?;
                    }
                    // A failure past this point leaves the audio deleted while
                    // the summary row survives; retrying the delete is safe.
                    self.store.archive_transcription(transcription_id).await?;
                }
                None => {
                    warn!(
                        "Transcription {} for summary {} no longer exists",
                        transcription_id, session_id
                    );
                }
            }
        }

        self.store.delete_session_summary(session_id).await?;

        info!("Deleted session summary {}", session_id);

        Ok(())
    }

    async fn combine(
        &self,
        mut partials: Vec<GeneratedSessionSummary>,
    ) -> Result<GeneratedSessionSummary> {
        if partials.len() == 1 {
            return Ok(partials.remove(0));
        }
        merge_summaries(self.generator.as_ref(), &partials).await
    }

    async fn persist(
        &self,
        user_id: &str,
        source: SummarySource,
        content: GeneratedSessionSummary,
    ) -> Result<SessionSummary> {
        let record = NewSessionSummary {
            user_id: user_id.to_string(),
            source,
            session_date: Utc::now(),
            content,
        };

        let stored = self.store.create_session_summary(record).await.map_err(|e| {
            error!("Failed to store session summary: {}", e);
            e
        })?;

        info!("Stored session summary {} for user {}", stored.id, user_id);

        Ok(stored)
    }
}
