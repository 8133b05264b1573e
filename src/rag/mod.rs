//! RAG (Retrieval-Augmented Generation) module.
//!
//! This module provides:
//! - `VectorStore` / `JsonFileStore`: wholesale load and atomic save of embedded chunks
//! - `rank`: linear-scan cosine top-k selection
//! - `ContextAssembler`: two-turn prompt construction from retrieved chunks
//! - `Ingestor`: corpus splitting and bounded-concurrency embedding
//! - `RagChatService`: the per-query orchestration

pub mod context_builder;
pub mod ingest;
pub mod json_store;
pub mod pipeline;
pub mod ranker;
pub mod store;

pub use context_builder::{ContextAssembler, PromptContext};
pub use ingest::{split_corpus, Ingestor};
pub use json_store::JsonFileStore;
pub use pipeline::{PipelineOptions, RagChatService};
pub use ranker::{cosine_similarity, rank};
pub use store::{ChunkRecord, ScoredChunk, VectorStore};
