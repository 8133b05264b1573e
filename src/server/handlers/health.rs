use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::state::AppState;

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let vector_store_present = state.chat.store().exists().await;
    Json(json!({
        "status": "ok",
        "started_at": state.started_at.to_rfc3339(),
        "vector_store_present": vector_store_present,
    }))
}
