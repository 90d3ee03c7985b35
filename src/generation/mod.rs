//! Structured generation: free text in, schema-conformant JSON out.
//!
//! The pipeline only talks to the [`StructuredGenerator`] trait, so tests can
//! swap the live model for a deterministic fake.

mod openai;

pub use openai::OpenAiGenerator;

use crate::error::Result;
use serde::Serialize;

/// Name plus JSON Schema of the object a generator must return
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDescriptor {
    pub name: String,
    pub schema: serde_json::Value,
}

/// Maps a prompt to an object conforming to `schema`.
///
/// Implementations return `NotesError::Provider` when the call itself fails
/// and `NotesError::SchemaViolation` when the reply is not a JSON object.
#[async_trait::async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &SchemaDescriptor) -> Result<serde_json::Value>;
}
