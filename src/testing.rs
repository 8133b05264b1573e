//! In-process stand-ins for the remote providers and the persisted store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::errors::RagError;
use crate::llm::provider::{CompletionClient, EmbeddingClient};
use crate::llm::types::ChatRequest;
use crate::rag::store::{ChunkRecord, VectorStore};

/// Returns a fixed vector per known text and a default vector otherwise.
pub struct ScriptedEmbedder {
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    fail_on: Option<String>,
    no_vectors: bool,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedEmbedder {
    pub fn new(default: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            default,
            fail_on: None,
            no_vectors: false,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.fail_on = Some(text.to_string());
        self
    }

    /// Answers every call successfully but with an empty vector list.
    pub fn returning_no_vectors(mut self) -> Self {
        self.no_vectors = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingClient for ScriptedEmbedder {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn embed(&self, inputs: &[String], _model_id: &str) -> Result<Vec<Vec<f32>>, RagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if self.no_vectors {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Ok(Vec::new());
        }

        let result = inputs
            .iter()
            .map(|text| {
                if self.fail_on.as_deref() == Some(text.as_str()) {
                    return Err(RagError::EmbeddingProvider(format!(
                        "scripted failure for {:?}",
                        text
                    )));
                }
                Ok(self
                    .vectors
                    .get(text)
                    .cloned()
                    .unwrap_or_else(|| self.default.clone()))
            })
            .collect();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Records every request and answers with a fixed reply (or a failure).
pub struct RecordingCompleter {
    reply: Result<String, String>,
    requests: Mutex<Vec<(ChatRequest, String)>>,
}

impl RecordingCompleter {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(ChatRequest, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for RecordingCompleter {
    fn name(&self) -> &str {
        "recording"
    }

    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, RagError> {
        self.requests
            .lock()
            .unwrap()
            .push((request, model_id.to_string()));
        self.reply
            .clone()
            .map_err(RagError::CompletionProvider)
    }
}

/// Vector store kept in memory; `None` behaves like a missing file.
pub struct MemoryStore {
    records: Mutex<Option<Vec<ChunkRecord>>>,
}

impl MemoryStore {
    pub fn empty() -> Self {
        Self {
            records: Mutex::new(None),
        }
    }

    pub fn with_records(records: Vec<ChunkRecord>) -> Self {
        Self {
            records: Mutex::new(Some(records)),
        }
    }

    pub fn snapshot(&self) -> Option<Vec<ChunkRecord>> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn load(&self) -> Result<Vec<ChunkRecord>, RagError> {
        self.snapshot().ok_or_else(|| RagError::StoreUnavailable {
            path: "memory".into(),
            reason: "no records saved".to_string(),
        })
    }

    async fn save(&self, records: &[ChunkRecord]) -> Result<(), RagError> {
        *self.records.lock().unwrap() = Some(records.to_vec());
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.records.lock().unwrap().is_some()
    }
}
