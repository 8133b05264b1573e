use std::sync::Arc;

use axum::extract::State;

use crate::core::errors::ApiError;
use crate::state::AppState;

/// `GET /embed`: rebuilds the vector store from the configured corpus file.
pub async fn embed(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    let corpus_path = &state.settings.rag.corpus_path;
    let records = state.ingestor.ingest_file(corpus_path).await?;
    tracing::info!(
        "Vector store rebuilt with {} records from {}",
        records.len(),
        corpus_path.display()
    );
    Ok("Embeddings saved.")
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Only GET allowed".to_string())
}
