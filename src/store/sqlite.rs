//! SQLite storage: `session_summaries`, `transcriptions`, `voice_notes`.
//!
//! Summary content (title, recap, insight lists) lives in one JSON column;
//! provenance is two nullable columns with a CHECK that exactly one is set.
//! Timestamps are stored as Unix milliseconds.

use super::models::{
    NewSessionSummary, NewTranscription, SessionSummary, SummarySource, Transcription,
    TranscriptionStatus, VoiceNote,
};
use super::NotesStore;
use crate::error::{NotesError, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

const SUMMARY_COLUMNS: &str = "id, user_id, transcription_id, voice_note_id, session_date_ms, \
     content, created_at_ms, updated_at_ms";

/// Current time truncated to the stored precision
fn now_ms() -> DateTime<Utc> {
    from_ms(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}

fn from_ms(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(ms)
}

fn ts(ms: i64, column: &str) -> Result<DateTime<Utc>> {
    from_ms(ms).ok_or_else(|| NotesError::persistence(format!("{} out of range: {}", column, ms)))
}

fn parse_uuid(s: &str, column: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| NotesError::persistence(format!("bad {} {}: {}", column, s, e)))
}

/// Raw `session_summaries` row before decoding
struct SummaryRow {
    id: String,
    user_id: String,
    transcription_id: Option<String>,
    voice_note_id: Option<String>,
    session_date_ms: i64,
    content: String,
    created_at_ms: i64,
    updated_at_ms: i64,
}

impl SummaryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            transcription_id: row.get(2)?,
            voice_note_id: row.get(3)?,
            session_date_ms: row.get(4)?,
            content: row.get(5)?,
            created_at_ms: row.get(6)?,
            updated_at_ms: row.get(7)?,
        })
    }

    fn decode(self) -> Result<SessionSummary> {
        let source = match (self.transcription_id, self.voice_note_id) {
            (Some(t), None) => SummarySource::Transcription(parse_uuid(&t, "transcription_id")?),
            (None, Some(v)) => SummarySource::VoiceNote(parse_uuid(&v, "voice_note_id")?),
            _ => {
                return Err(NotesError::persistence(format!(
                    "session summary {} has invalid provenance",
                    self.id
                )))
            }
        };

        Ok(SessionSummary {
            id: parse_uuid(&self.id, "id")?,
            user_id: self.user_id,
            source,
            session_date: ts(self.session_date_ms, "session_date_ms")?,
            content: serde_json::from_str(&self.content)?,
            created_at: ts(self.created_at_ms, "created_at_ms")?,
            updated_at: ts(self.updated_at_ms, "updated_at_ms")?,
        })
    }
}

struct TranscriptionRow {
    id: String,
    user_id: String,
    text: Option<String>,
    audio_key: Option<String>,
    status: String,
    created_at_ms: i64,
}

impl TranscriptionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            text: row.get(2)?,
            audio_key: row.get(3)?,
            status: row.get(4)?,
            created_at_ms: row.get(5)?,
        })
    }

    fn decode(self) -> Result<Transcription> {
        let status = TranscriptionStatus::parse(&self.status).ok_or_else(|| {
            NotesError::persistence(format!("unknown transcription status {}", self.status))
        })?;
        Ok(Transcription {
            id: parse_uuid(&self.id, "id")?,
            user_id: self.user_id,
            text: self.text,
            audio_key: self.audio_key,
            status,
            created_at: ts(self.created_at_ms, "created_at_ms")?,
        })
    }
}

/// Session-notes storage in a single SQLite file
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the database and ensure tables exist.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let this = Self {
            db_path: db_path.into(),
        };
        this.init()?;
        info!("SQLite store ready at {}", this.db_path.display());
        Ok(this)
    }

    fn open(path: &Path) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(conn)
    }

    fn init(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    NotesError::persistence(format!("create {}: {}", parent.display(), e))
                })?;
            }
        }
        let conn = Self::open(&self.db_path)?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS transcriptions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                text TEXT NULL,
                audio_key TEXT NULL,
                status TEXT NOT NULL,
                created_at_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_transcriptions_user_id ON transcriptions(user_id);

            CREATE TABLE IF NOT EXISTS voice_notes (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                text TEXT NULL,
                created_at_ms INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_voice_notes_user_id ON voice_notes(user_id);

            CREATE TABLE IF NOT EXISTS session_summaries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                transcription_id TEXT NULL,
                voice_note_id TEXT NULL,
                session_date_ms INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at_ms INTEGER NOT NULL,
                updated_at_ms INTEGER NOT NULL,
                CHECK ((transcription_id IS NULL) <> (voice_note_id IS NULL))
            );
            CREATE INDEX IF NOT EXISTS idx_session_summaries_user_id ON session_summaries(user_id);
            "#,
        )?;
        Ok(())
    }

    /// Run `f` against a fresh connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Self::open(&path)?;
            f(&conn)
        })
        .await
        .map_err(|e| NotesError::persistence(format!("blocking task failed: {}", e)))?
    }
}

#[async_trait::async_trait]
impl NotesStore for SqliteStore {
    async fn create_session_summary(&self, record: NewSessionSummary) -> Result<SessionSummary> {
        let now = now_ms();
        let summary = SessionSummary {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            source: record.source,
            session_date: ts(record.session_date.timestamp_millis(), "session_date_ms")?,
            content: record.content,
            created_at: now,
            updated_at: now,
        };
        let content = serde_json::to_string(&summary.content)?;

        let stored = summary.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"
                INSERT INTO session_summaries
                    (id, user_id, transcription_id, voice_note_id, session_date_ms,
                     content, created_at_ms, updated_at_ms)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    stored.id.to_string(),
                    stored.user_id,
                    stored.source.transcription_id().map(|id| id.to_string()),
                    stored.source.voice_note_id().map(|id| id.to_string()),
                    stored.session_date.timestamp_millis(),
                    content,
                    stored.created_at.timestamp_millis(),
                    stored.updated_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(summary)
    }

    async fn get_session_summary_by_id(&self, id: Uuid) -> Result<Option<SessionSummary>> {
        let row = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        &format!("SELECT {} FROM session_summaries WHERE id = ?1", SUMMARY_COLUMNS),
                        params![id.to_string()],
                        SummaryRow::from_row,
                    )
                    .optional()?)
            })
            .await?;
        row.map(SummaryRow::decode).transpose()
    }

    async fn delete_session_summary(&self, id: Uuid) -> Result<()> {
        let deleted = self
            .with_conn(move |conn| {
                Ok(conn.execute(
                    "DELETE FROM session_summaries WHERE id = ?1",
                    params![id.to_string()],
                )?)
            })
            .await?;
        if deleted == 0 {
            return Err(NotesError::not_found("Session summary", id));
        }
        Ok(())
    }

    async fn list_session_summaries(&self, user_id: &str) -> Result<Vec<SessionSummary>> {
        let user_id = user_id.to_string();
        let rows = self
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM session_summaries WHERE user_id = ?1 \
                     ORDER BY session_date_ms DESC, created_at_ms DESC",
                    SUMMARY_COLUMNS
                ))?;
                let rows = stmt
                    .query_map(params![user_id], SummaryRow::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        rows.into_iter().map(SummaryRow::decode).collect()
    }

    async fn create_transcription(&self, record: NewTranscription) -> Result<Transcription> {
        let transcription = Transcription {
            id: Uuid::new_v4(),
            user_id: record.user_id,
            text: record.text,
            audio_key: record.audio_key,
            status: record.status,
            created_at: now_ms(),
        };

        let stored = transcription.clone();
        self.with_conn(move |conn| {
            conn.execute(
                r#"
                INSERT INTO transcriptions (id, user_id, text, audio_key, status, created_at_ms)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    stored.id.to_string(),
                    stored.user_id,
                    stored.text,
                    stored.audio_key,
                    stored.status.as_str(),
                    stored.created_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(transcription)
    }

    async fn get_transcription_by_id(&self, id: Uuid) -> Result<Option<Transcription>> {
        let row = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, user_id, text, audio_key, status, created_at_ms \
                         FROM transcriptions WHERE id = ?1",
                        params![id.to_string()],
                        TranscriptionRow::from_row,
                    )
                    .optional()?)
            })
            .await?;
        row.map(TranscriptionRow::decode).transpose()
    }

    async fn update_transcription_status(
        &self,
        id: Uuid,
        status: TranscriptionStatus,
    ) -> Result<()> {
        let updated = self
            .with_conn(move |conn| {
                Ok(conn.execute(
                    "UPDATE transcriptions SET status = ?1 WHERE id = ?2",
                    params![status.as_str(), id.to_string()],
                )?)
            })
            .await?;
        if updated == 0 {
            return Err(NotesError::not_found("Transcription", id));
        }
        Ok(())
    }

    async fn create_voice_note(&self, user_id: &str, text: &str) -> Result<VoiceNote> {
        let note = VoiceNote {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            text: Some(text.to_string()),
            created_at: now_ms(),
        };

        let stored = note.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO voice_notes (id, user_id, text, created_at_ms) VALUES (?1, ?2, ?3, ?4)",
                params![
                    stored.id.to_string(),
                    stored.user_id,
                    stored.text,
                    stored.created_at.timestamp_millis(),
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(note)
    }

    async fn get_voice_note_by_id(&self, id: Uuid) -> Result<Option<VoiceNote>> {
        let row = self
            .with_conn(move |conn| {
                Ok(conn
                    .query_row(
                        "SELECT id, user_id, text, created_at_ms FROM voice_notes WHERE id = ?1",
                        params![id.to_string()],
                        |row| {
                            Ok((
                                row.get::<_, String>(0)?,
                                row.get::<_, String>(1)?,
                                row.get::<_, Option<String>>(2)?,
                                row.get::<_, i64>(3)?,
                            ))
                        },
                    )
                    .optional()?)
            })
            .await?;

        row.map(|(id, user_id, text, created_at_ms)| {
            Ok(VoiceNote {
                id: parse_uuid(&id, "id")?,
                user_id,
                text,
                created_at: ts(created_at_ms, "created_at_ms")?,
            })
        })
        .transpose()
    }
}
