//! Session summary generation
//!
//! - `chunker`: sentence-aligned splitting of long transcripts
//! - `summarizer`: one generation call per chunk, plus the merge call
//! - `pipeline`: create / regenerate / delete orchestration

pub mod chunker;
mod pipeline;
pub mod prompts;
mod schema;
mod summarizer;

pub use chunker::{split_into_chunks, split_sentences, DEFAULT_MAX_CHUNK_SIZE};
pub use pipeline::{PipelineConfig, SummaryPipeline};
pub use schema::{GeneratedSessionSummary, InsightItem, SCHEMA_NAME};
pub use summarizer::{merge_summaries, summarize_chunk};
