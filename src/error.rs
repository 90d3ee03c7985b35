//! Error types for the session-notes pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotesError {
    /// The structured-generation call failed (transport, HTTP status, empty reply).
    #[error("Generation provider error: {message}")]
    Provider { message: String },

    /// The provider answered, but not with an object matching the schema.
    #[error("Generated output violates schema {schema}: {message}")]
    SchemaViolation { schema: String, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Object storage error for {key}: {message}")]
    ExternalStorage { key: String, message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl NotesError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn persistence(message: impl ToString) -> Self {
        Self::Persistence {
            message: message.to_string(),
        }
    }

    pub fn provider(message: impl ToString) -> Self {
        Self::Provider {
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<rusqlite::Error> for NotesError {
    fn from(err: rusqlite::Error) -> Self {
        Self::persistence(err)
    }
}

impl From<serde_json::Error> for NotesError {
    fn from(err: serde_json::Error) -> Self {
        Self::persistence(format!("JSON column: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, NotesError>;
