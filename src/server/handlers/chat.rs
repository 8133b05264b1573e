use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::core::errors::ApiError;
use crate::state::AppState;

const SERVER_ERROR_REPLY: &str = "Server error.";

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

/// `POST /api/chat`: one retrieval-augmented answer per message.
///
/// Pipeline failures are logged by `RagChatService::reply` and surface to
/// the client only as a generic reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    validate_message(&body.message, state.settings.chat.max_input_length)?;

    match state.chat.reply(&body.message).await {
        Ok(reply) => Ok(Json(json!({ "reply": reply })).into_response()),
        Err(_) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "reply": SERVER_ERROR_REPLY })),
        )
            .into_response()),
    }
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Only POST allowed".to_string())
}

fn validate_message(message: &str, max_len: usize) -> Result<(), ApiError> {
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }
    let len = message.chars().count();
    if len > max_len {
        return Err(ApiError::BadRequest(format!(
            "message is too long ({} > {} characters)",
            len, max_len
        )));
    }
    Ok(())
}
