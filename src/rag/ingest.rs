//! Corpus ingestion: split, embed each line, replace the vector store.
//!
//! One embedding call per line, run concurrently up to the configured limit.
//! A single failed call aborts the whole batch and nothing is persisted.

use std::path::Path;
use std::sync::Arc;

use futures_util::{stream, StreamExt, TryStreamExt};

use super::store::{ChunkRecord, VectorStore};
use crate::core::errors::RagError;
use crate::llm::provider::EmbeddingClient;

const PREVIEW_CHARS: usize = 40;

/// Lines of `raw` that carry text, in corpus order. Handles `\n` and `\r\n`.
pub fn split_corpus(raw: &str) -> Vec<String> {
    raw.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.to_string())
        .collect()
}

pub struct Ingestor {
    embedder: Arc<dyn EmbeddingClient>,
    store: Arc<dyn VectorStore>,
    model: String,
    concurrency: usize,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn EmbeddingClient>,
        store: Arc<dyn VectorStore>,
        model: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            model: model.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Embeds and persists `raw`, replacing any previous store content.
    pub async fn ingest(&self, raw: &str) -> Result<Vec<ChunkRecord>, RagError> {
        let records = self.embed_corpus(raw).await?;
        self.store.save(&records).await?;
        Ok(records)
    }

    /// Reads the corpus file at `path` and ingests it.
    pub async fn ingest_file(&self, path: &Path) -> Result<Vec<ChunkRecord>, RagError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RagError::CorpusUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        tracing::info!("Ingesting corpus from {}", path.display());
        self.ingest(&raw).await
    }

    /// Embeds every non-blank line without touching the store.
    pub async fn embed_corpus(&self, raw: &str) -> Result<Vec<ChunkRecord>, RagError> {
        let chunks = split_corpus(raw);
        tracing::info!(
            "Embedding {} chunks with {} (model {}, concurrency {})",
            chunks.len(),
            self.embedder.name(),
            self.model,
            self.concurrency
        );

        stream::iter(chunks.into_iter().enumerate())
            .map(|(index, text)| self.embed_chunk(index, text))
            .buffered(self.concurrency)
            .try_collect()
            .await
    }

    async fn embed_chunk(&self, index: usize, text: String) -> Result<ChunkRecord, RagError> {
        let inputs = [text];
        let result = self.embedder.embed(&inputs, &self.model).await;
        let [text] = inputs;

        let reason = match result {
            Ok(mut vectors) if !vectors.is_empty() => {
                let embedding = vectors.swap_remove(0);
                return Ok(ChunkRecord { text, embedding });
            }
            Ok(_) => "provider returned no embedding".to_string(),
            Err(err) => err.to_string(),
        };

        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        tracing::error!(
            "Embedding failed for chunk {} ({:?}): {}",
            index,
            preview,
            reason
        );
        Err(RagError::IngestionPartialFailure {
            index,
            preview,
            reason,
        })
    }
}
