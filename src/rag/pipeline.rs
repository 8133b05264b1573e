//! Query orchestration: load store → embed query → rank → assemble → complete.
//!
//! Every stage runs strictly in sequence for one query. Providers and the
//! store are injected so deployments and tests choose their own backends.

use std::sync::Arc;

use super::context_builder::{ContextAssembler, PromptContext};
use super::ranker::rank;
use super::store::VectorStore;
use crate::core::config::Settings;
use crate::core::errors::RagError;
use crate::llm::provider::{CompletionClient, EmbeddingClient};

/// Models and sampling knobs for one deployment.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub embedding_model: String,
    pub chat_model: String,
    pub top_k: usize,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl PipelineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            embedding_model: settings.llm.embedding_model.clone(),
            chat_model: settings.llm.chat_model.clone(),
            top_k: settings.rag.top_k,
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
        }
    }
}

pub struct RagChatService {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingClient>,
    completer: Arc<dyn CompletionClient>,
    assembler: ContextAssembler,
    options: PipelineOptions,
}

impl RagChatService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn EmbeddingClient>,
        completer: Arc<dyn CompletionClient>,
        assembler: ContextAssembler,
        options: PipelineOptions,
    ) -> Self {
        Self {
            store,
            embedder,
            completer,
            assembler,
            options,
        }
    }

    pub fn store(&self) -> &Arc<dyn VectorStore> {
        &self.store
    }

    /// Retrieval half of the pipeline: the prompt that would be sent for `query`.
    pub async fn prepare(&self, query: &str) -> Result<PromptContext, RagError> {
        let corpus = self.store.load().await?;
        tracing::debug!("Vector store loaded ({} records)", corpus.len());

        let query_embedding = self.embed_query(query).await?;

        let top_chunks = rank(&query_embedding, &corpus, self.options.top_k)?;
        for (position, chunk) in top_chunks.iter().enumerate() {
            tracing::debug!("Retrieved #{} score={:.4}", position + 1, chunk.score);
        }

        Ok(self.assembler.assemble(&top_chunks, query))
    }

    /// Answers `query`; any stage failure ends the run with that stage's error.
    pub async fn reply(&self, query: &str) -> Result<String, RagError> {
        tracing::info!(
            "Query processing started ({} chars, completion via {})",
            query.chars().count(),
            self.completer.name()
        );

        let outcome = self.run(query).await;
        match &outcome {
            Ok(reply) => tracing::info!("Query replied ({} chars)", reply.chars().count()),
            Err(err) => tracing::error!("Query failed [{}]: {}", err.kind(), err),
        }
        outcome
    }

    async fn run(&self, query: &str) -> Result<String, RagError> {
        let prompt = self.prepare(query).await?;
        let request = prompt
            .into_request()
            .with_sampling(self.options.temperature, self.options.max_tokens);

        self.completer
            .chat(request, &self.options.chat_model)
            .await
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RagError> {
        let inputs = [query.to_string()];
        let mut vectors = self
            .embedder
            .embed(&inputs, &self.options.embedding_model)
            .await?;
        if vectors.is_empty() {
            return Err(RagError::EmbeddingProvider(
                "provider returned no embedding for the query".to_string(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }
}
