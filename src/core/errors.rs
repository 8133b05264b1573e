use std::path::PathBuf;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            ApiError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

/// Failures of the retrieval pipeline and the ingestion path.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("vector store unavailable at {}: {reason}", path.display())]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("corpus unavailable at {}: {reason}", path.display())]
    CorpusUnavailable { path: PathBuf, reason: String },

    #[error("embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("completion provider error: {0}")]
    CompletionProvider(String),

    #[error("embedding dimension mismatch at record {index}: query has {expected}, record has {found}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("ingestion aborted at chunk {index} ({preview:?}): {reason}")]
    IngestionPartialFailure {
        index: usize,
        preview: String,
        reason: String,
    },
}

impl RagError {
    /// Short label used in server-side logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RagError::StoreUnavailable { .. } => "store_unavailable",
            RagError::CorpusUnavailable { .. } => "corpus_unavailable",
            RagError::EmbeddingProvider(_) => "embedding_provider",
            RagError::CompletionProvider(_) => "completion_provider",
            RagError::DimensionMismatch { .. } => "dimension_mismatch",
            RagError::IngestionPartialFailure { .. } => "ingestion_partial_failure",
        }
    }
}

impl From<RagError> for ApiError {
    fn from(err: RagError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
