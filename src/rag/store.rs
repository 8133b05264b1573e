//! VectorStore trait — storage abstraction for embedded chunks.
//!
//! The store is read and written wholesale: queries load every record, and
//! ingestion replaces the entire collection. The primary implementation is
//! `JsonFileStore` in the `json_store` module.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

/// A chunk of corpus text with its embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub text: String,
    pub embedding: Vec<f32>,
}

impl ChunkRecord {
    pub fn new(text: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            embedding,
        }
    }
}

/// A retrieved chunk and its similarity to the query (higher = better).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Read every record in stored order.
    ///
    /// A missing or unreadable store is an error, never an empty corpus.
    async fn load(&self) -> Result<Vec<ChunkRecord>, RagError>;

    /// Replace the stored collection with `records`.
    async fn save(&self, records: &[ChunkRecord]) -> Result<(), RagError>;

    /// Whether a persisted collection currently exists.
    async fn exists(&self) -> bool;
}
