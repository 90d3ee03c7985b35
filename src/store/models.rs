use crate::summary::GeneratedSessionSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a session summary came from.
///
/// Serialized inline as exactly one of `transcription_id` / `voice_note_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummarySource {
    #[serde(rename = "transcription_id")]
    Transcription(Uuid),
    #[serde(rename = "voice_note_id")]
    VoiceNote(Uuid),
}

impl SummarySource {
    pub fn transcription_id(&self) -> Option<Uuid> {
        match self {
            Self::Transcription(id) => Some(*id),
            Self::VoiceNote(_) => None,
        }
    }

    pub fn voice_note_id(&self) -> Option<Uuid> {
        match self {
            Self::VoiceNote(id) => Some(*id),
            Self::Transcription(_) => None,
        }
    }
}

/// A session summary ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSessionSummary {
    pub user_id: String,
    pub source: SummarySource,
    pub session_date: DateTime<Utc>,
    pub content: GeneratedSessionSummary,
}

/// A stored session summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub user_id: String,
    #[serde(flatten)]
    pub source: SummarySource,
    pub session_date: DateTime<Utc>,
    #[serde(flatten)]
    pub content: GeneratedSessionSummary,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionStatus {
    Pending,
    /// Text is stored and the summary is being generated
    ExtractingSummary,
    Completed,
    Failed,
    Archived,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::ExtractingSummary => "extracting_summary",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "extracting_summary" => Some(Self::ExtractingSummary),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A transcribed therapy-session recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcription {
    pub id: Uuid,
    pub user_id: String,
    pub text: Option<String>,

    /// Object-storage key of the uploaded audio
    pub audio_key: Option<String>,

    pub status: TranscriptionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranscription {
    pub user_id: String,
    pub text: Option<String>,
    pub audio_key: Option<String>,
    pub status: TranscriptionStatus,
}

/// A typed or dictated note the client wrote about a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceNote {
    pub id: Uuid,
    pub user_id: String,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}
