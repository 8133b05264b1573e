use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::RagError;

/// Remote service turning text into embedding vectors.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// provider name used in logs
    fn name(&self) -> &str;

    /// one vector per input, in input order
    async fn embed(&self, inputs: &[String], model_id: &str) -> Result<Vec<Vec<f32>>, RagError>;
}

/// Remote service generating a reply for a role-tagged conversation.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest, model_id: &str) -> Result<String, RagError>;
}
