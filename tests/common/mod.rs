// Shared fakes for pipeline integration tests
//
// ScriptedGenerator stands in for the language model: it returns fixed,
// schema-conformant summaries and records every prompt with the (tokio) time
// it was received. RecordingObjectStore records deletions.

#![allow(dead_code)]

use serde_json::{json, Value};
use session_notes::summary::prompts::MERGE_PREAMBLE;
use session_notes::{
    MemoryStore, NotesError, ObjectStore, PipelineConfig, SchemaDescriptor, StructuredGenerator,
    SummaryPipeline,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Summarize,
    Merge,
}

#[derive(Debug, Clone)]
pub struct GeneratorCall {
    pub kind: CallKind,
    pub prompt: String,
    pub at: Instant,
}

#[derive(Default)]
pub struct ScriptedGenerator {
    calls: Mutex<Vec<GeneratorCall>>,
    /// Fail the call with this zero-based index
    fail_on_call: Mutex<Option<usize>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on_call(&self, index: usize) {
        *self.fail_on_call.lock().unwrap() = Some(index);
    }

    pub fn calls(&self) -> Vec<GeneratorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, kind: CallKind) -> usize {
        self.calls().iter().filter(|c| c.kind == kind).count()
    }
}

pub fn summary_json(title: &str) -> Value {
    let item = |label: &str| {
        json!({
            "summary": format!("{} point", label),
            "detail": format!("Why the {} point matters", label),
            "excerpt": format!("Client: '{}'", label),
        })
    };
    json!({
        "title": title,
        "one_line_summary": format!("{} in one line", title),
        "full_recap": format!("Recap of {}", title),
        "therapist_insights": [item("insight")],
        "client_learnings": [item("learning")],
        "recommendations": [item("recommendation")]
    })
}

#[async_trait::async_trait]
impl StructuredGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _schema: &SchemaDescriptor,
    ) -> session_notes::Result<Value> {
        let kind = if prompt.starts_with(MERGE_PREAMBLE) {
            CallKind::Merge
        } else {
            CallKind::Summarize
        };

        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(GeneratorCall {
                kind,
                prompt: prompt.to_string(),
                at: Instant::now(),
            });
            calls.len() - 1
        };

        if *self.fail_on_call.lock().unwrap() == Some(index) {
            return Err(NotesError::provider("scripted failure"));
        }

        let title = match kind {
            CallKind::Merge => "Merged session".to_string(),
            CallKind::Summarize => format!("Partial {}", index + 1),
        };
        Ok(summary_json(&title))
    }
}

#[derive(Default)]
pub struct RecordingObjectStore {
    deleted: Mutex<Vec<String>>,
    fail: Mutex<bool>,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn delete_object(&self, key: &str) -> session_notes::Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(NotesError::ExternalStorage {
                key: key.to_string(),
                message: "scripted failure".to_string(),
            });
        }
        self.deleted.lock().unwrap().push(key.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub pipeline: Arc<SummaryPipeline>,
    pub generator: Arc<ScriptedGenerator>,
    pub store: Arc<MemoryStore>,
    pub objects: Arc<RecordingObjectStore>,
}

pub fn harness(config: PipelineConfig) -> Harness {
    let generator = Arc::new(ScriptedGenerator::new());
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(RecordingObjectStore::new());
    let pipeline = Arc::new(SummaryPipeline::new(
        config,
        generator.clone(),
        store.clone(),
        objects.clone(),
    ));
    Harness {
        pipeline,
        generator,
        store,
        objects,
    }
}

/// Default chunk size, no inter-chunk delay
pub fn fast_harness() -> Harness {
    harness(PipelineConfig {
        inter_chunk_delay: Duration::ZERO,
        ..PipelineConfig::default()
    })
}

/// `count` sentences of exactly `len` characters each (including the period)
pub fn sentences(count: usize, len: usize) -> String {
    (0..count)
        .map(|i| {
            let body = format!("Sentence {}", i);
            format!("{}{}.", body, "x".repeat(len - 1 - body.len()))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
