//! Chat endpoint

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use super::ApiState;
use crate::conversation::ConversationState;
use crate::leads::UserData;

/// Build chat router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new().route("/chat", post(chat)).with_state(state)
}

/// Chat request; every field may be omitted
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub state: Option<i64>,
    #[serde(default)]
    pub user_data: Option<UserData>,
}

/// Chat response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub new_state: i64,
}

/// Advance the conversation by one message
///
/// Always answers 200; conversational failures are carried in `response`.
async fn chat(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let code = request.state.unwrap_or_default();
    let message = request.message.unwrap_or_default();
    let user_data = request.user_data.unwrap_or_default();

    let Some(current) = ConversationState::from_code(code) else {
        tracing::debug!(state = code, "unknown conversation state, echoing it back");
        return Json(ChatResponse {
            response: String::new(),
            new_state: code,
        });
    };

    let reply = state
        .conversation
        .respond(current, &message, &user_data)
        .await;

    tracing::debug!(
        from = current.code(),
        to = reply.next.code(),
        "conversation transition"
    );

    Json(ChatResponse {
        response: reply.response,
        new_state: reply.next.code(),
    })
}
