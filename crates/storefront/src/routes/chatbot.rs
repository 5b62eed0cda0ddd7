//! Chatbot route handler.

use axum::{Json, extract::State};
use tracing::instrument;

use super::ApiJson;
use crate::chatbot::{ChatReply, ChatRequest};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Answer the latest message of a conversation.
#[instrument(skip_all)]
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ChatRequest>,
) -> Result<Json<ChatReply>> {
    let messages = request.into_messages();
    if messages.is_empty() {
        return Err(AppError::BadRequest("Message is required".to_string()));
    }

    let reply = state.chatbot().reply(&messages).await;
    tracing::debug!(source = ?reply.source, turns = messages.len(), "Chatbot replied");
    Ok(Json(reply))
}
