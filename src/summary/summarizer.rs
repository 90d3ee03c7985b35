use super::prompts;
use super::schema::GeneratedSessionSummary;
use crate::error::{NotesError, Result};
use crate::generation::StructuredGenerator;
use tracing::{debug, error};

/// Summarize one chunk of a transcript, or a whole voice note.
pub async fn summarize_chunk(
    generator: &dyn StructuredGenerator,
    chunk: &str,
    is_voice_note: bool,
) -> Result<GeneratedSessionSummary> {
    let prompt = prompts::summary_prompt(chunk, is_voice_note);
    let schema = GeneratedSessionSummary::schema();

    debug!(
        "Summarizing {} ({} chars)",
        if is_voice_note { "voice note" } else { "transcript chunk" },
        chunk.chars().count()
    );

    let value = generator.generate(&prompt, &schema).await.map_err(|e| {
        error!("Chunk summarization failed: {}", e);
        e
    })?;

    GeneratedSessionSummary::from_generated(value)
}

/// Combine partial summaries of one session into a single summary.
///
/// Partials are presented to the model together, in input order.
pub async fn merge_summaries(
    generator: &dyn StructuredGenerator,
    partials: &[GeneratedSessionSummary],
) -> Result<GeneratedSessionSummary> {
    if partials.is_empty() {
        return Err(NotesError::InvalidInput {
            message: "cannot merge zero partial summaries".to_string(),
        });
    }

    let serialized = partials
        .iter()
        .map(serde_json::to_string_pretty)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| NotesError::InvalidInput {
            message: format!("failed to serialize partial summary: {}", e),
        })?;

    debug!("Merging {} partial summaries", partials.len());

    let prompt = prompts::merge_prompt(&serialized);
    let value = generator
        .generate(&prompt, &GeneratedSessionSummary::schema())
        .await
        .map_err(|e| {
            error!("Summary merge failed: {}", e);
            e
        })?;

    GeneratedSessionSummary::from_generated(value)
}
