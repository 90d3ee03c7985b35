// Integration tests for the summary pipeline
//
// A scripted generator replaces the language model so that call counts,
// call spacing and stored records can be checked exactly.

mod common;

use anyhow::Result;
use common::{fast_harness, harness, summary_json, CallKind};
use session_notes::{
    GeneratedSessionSummary, NotesError, NotesStore, PipelineConfig, SummarySource,
    TranscriptionStatus,
};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_scenario_a_short_transcript_skips_merge() -> Result<()> {
    let h = fast_harness();
    let transcription_id = Uuid::new_v4();

    let summary = h
        .pipeline
        .summarize_from_transcript(
            "Client: I felt anxious. Therapist: Let's explore that.",
            transcription_id,
            "user-1",
        )
        .await?;

    assert_eq!(h.generator.count(CallKind::Summarize), 1);
    assert_eq!(h.generator.count(CallKind::Merge), 0);

    // Stored record is the sole partial plus metadata
    let expected = GeneratedSessionSummary::from_generated(summary_json("Partial 1"))?;
    assert_eq!(summary.content, expected);
    assert_eq!(summary.user_id, "user-1");
    assert_eq!(summary.source, SummarySource::Transcription(transcription_id));

    let json = serde_json::to_value(&summary)?;
    assert_eq!(json["transcription_id"], transcription_id.to_string());
    assert!(json.get("voice_note_id").is_none());

    let stored = h.store.get_session_summary_by_id(summary.id).await?;
    assert_eq!(stored, Some(summary));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_scenario_b_long_transcript_is_chunked_throttled_and_merged() -> Result<()> {
    let h = harness(PipelineConfig {
        max_chunk_size: 10_000,
        inter_chunk_delay: Duration::from_secs(1),
    });
    let text = common::sentences(248, 100);

    let summary = h
        .pipeline
        .summarize_from_transcript(&text, Uuid::new_v4(), "user-1")
        .await?;

    let calls = h.generator.calls();
    let kinds: Vec<CallKind> = calls.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            CallKind::Summarize,
            CallKind::Summarize,
            CallKind::Summarize,
            CallKind::Merge
        ]
    );

    // ~1 second between consecutive chunk summaries
    for pair in calls[..3].windows(2) {
        let gap = pair[1].at - pair[0].at;
        assert!(gap >= Duration::from_secs(1), "gap {:?}", gap);
        assert!(gap < Duration::from_millis(1100), "gap {:?}", gap);
    }

    // No delay before the merge
    let merge_gap = calls[3].at - calls[2].at;
    assert!(merge_gap < Duration::from_millis(100), "merge gap {:?}", merge_gap);

    // Merge prompt carries all three partials in order
    let merge_prompt = &calls[3].prompt;
    for i in 1..=3 {
        assert!(merge_prompt.contains(&format!("Part {} of 3", i)));
        assert!(merge_prompt.contains(&format!("Partial {}", i)));
    }

    assert_eq!(summary.content.title, "Merged session");
    assert_eq!(h.store.summary_count().await, 1);

    Ok(())
}

#[tokio::test]
async fn test_n_chunks_make_n_summaries_and_one_merge() -> Result<()> {
    let h = harness(PipelineConfig {
        max_chunk_size: 250,
        inter_chunk_delay: Duration::ZERO,
    });
    // 20 sentences of 100 chars; two per chunk
    let text = common::sentences(20, 100);

    h.pipeline
        .summarize_from_transcript(&text, Uuid::new_v4(), "user-1")
        .await?;

    assert_eq!(h.generator.count(CallKind::Summarize), 10);
    assert_eq!(h.generator.count(CallKind::Merge), 1);

    Ok(())
}

#[tokio::test]
async fn test_chunk_failure_aborts_without_persisting() {
    let h = harness(PipelineConfig {
        max_chunk_size: 150,
        inter_chunk_delay: Duration::ZERO,
    });
    h.generator.fail_on_call(1);
    let text = common::sentences(4, 100);

    let err = h
        .pipeline
        .summarize_from_transcript(&text, Uuid::new_v4(), "user-1")
        .await
        .unwrap_err();

    assert!(matches!(err, NotesError::Provider { .. }));
    // Chunks after the failing one are never attempted
    assert_eq!(h.generator.calls().len(), 2);
    assert_eq!(h.store.summary_count().await, 0);
}

#[tokio::test]
async fn test_merge_failure_aborts_without_persisting() {
    let h = harness(PipelineConfig {
        max_chunk_size: 150,
        inter_chunk_delay: Duration::ZERO,
    });
    // Two chunks, then the merge call fails
    h.generator.fail_on_call(2);
    let text = common::sentences(2, 100);

    let err = h
        .pipeline
        .summarize_from_transcript(&text, Uuid::new_v4(), "user-1")
        .await
        .unwrap_err();

    assert!(matches!(err, NotesError::Provider { .. }));
    assert_eq!(h.generator.count(CallKind::Merge), 1);
    assert_eq!(h.store.summary_count().await, 0);
}

#[tokio::test]
async fn test_empty_transcript_is_rejected() {
    let h = fast_harness();

    let err = h
        .pipeline
        .summarize_from_transcript("   ", Uuid::new_v4(), "user-1")
        .await
        .unwrap_err();

    assert!(matches!(err, NotesError::InvalidInput { .. }));
    assert!(h.generator.calls().is_empty());
}

#[tokio::test]
async fn test_voice_note_is_summarized_in_one_call() -> Result<()> {
    let h = harness(PipelineConfig {
        max_chunk_size: 50,
        inter_chunk_delay: Duration::ZERO,
    });
    let voice_note_id = Uuid::new_v4();
    // Longer than the chunk size, but voice notes are never chunked
    let text = common::sentences(5, 100);

    let summary = h
        .pipeline
        .summarize_from_voice_note(&text, voice_note_id, "user-2")
        .await?;

    let calls = h.generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, CallKind::Summarize);
    assert!(calls[0].prompt.contains("Note:"));
    assert_eq!(summary.source, SummarySource::VoiceNote(voice_note_id));

    let json = serde_json::to_value(&summary)?;
    assert!(json.get("transcription_id").is_none());
    assert_eq!(json["voice_note_id"], voice_note_id.to_string());

    Ok(())
}

#[tokio::test]
async fn test_create_transcript_summary_stores_source_record() -> Result<()> {
    let h = fast_harness();

    let summary = h
        .pipeline
        .create_transcript_summary(
            "user-1",
            "Client: I slept badly. Therapist: Tell me more.",
            Some("recordings/a.wav".to_string()),
        )
        .await?;

    let transcription_id = summary.source.transcription_id().expect("transcript provenance");
    let transcription = h
        .store
        .get_transcription_by_id(transcription_id)
        .await?
        .expect("transcription stored");
    assert_eq!(transcription.user_id, "user-1");
    assert_eq!(transcription.audio_key.as_deref(), Some("recordings/a.wav"));
    assert_eq!(transcription.status, TranscriptionStatus::Completed);

    let listed = h.pipeline.list_session_summaries("user-1").await?;
    assert_eq!(listed.len(), 1);
    assert!(h.pipeline.list_session_summaries("someone-else").await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_create_transcript_summary_marks_transcription_failed_on_error() {
    let h = fast_harness();
    h.generator.fail_on_call(0);

    let err = h
        .pipeline
        .create_transcript_summary("user-1", "Client: hi. Therapist: hello.", None)
        .await
        .unwrap_err();
    assert!(matches!(err, NotesError::Provider { .. }));
    assert_eq!(h.store.summary_count().await, 0);

    let transcriptions = h.store.transcriptions_for("user-1").await;
    assert_eq!(transcriptions.len(), 1);
    assert_eq!(transcriptions[0].status, TranscriptionStatus::Failed);
    assert_eq!(
        transcriptions[0].text.as_deref(),
        Some("Client: hi. Therapist: hello.")
    );
}

#[tokio::test]
async fn test_create_transcript_summary_marks_transcription_failed_on_merge_error() {
    let h = harness(PipelineConfig {
        max_chunk_size: 150,
        inter_chunk_delay: Duration::ZERO,
    });
    h.generator.fail_on_call(2);
    let text = common::sentences(2, 100);

    h.pipeline
        .create_transcript_summary("user-1", &text, None)
        .await
        .unwrap_err();

    let transcriptions = h.store.transcriptions_for("user-1").await;
    assert_eq!(transcriptions.len(), 1);
    assert_eq!(transcriptions[0].status, TranscriptionStatus::Failed);
}
