pub mod config;
pub mod error;
pub mod generation;
pub mod http;
pub mod objects;
pub mod store;
pub mod summary;

pub use config::Config;
pub use error::{NotesError, Result};
pub use generation::{OpenAiGenerator, SchemaDescriptor, StructuredGenerator};
pub use http::{create_router, AppState};
pub use objects::{LocalObjectStore, ObjectStore};
pub use store::{
    MemoryStore, NewSessionSummary, NewTranscription, NotesStore, SessionSummary, SqliteStore,
    SummarySource, Transcription, TranscriptionStatus, VoiceNote,
};
pub use summary::{
    split_into_chunks, GeneratedSessionSummary, InsightItem, PipelineConfig, SummaryPipeline,
};
