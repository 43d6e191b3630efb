use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::services::{Assistant, ChatMessage};

/// Request body for image analysis
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Image as a data URI or bare base64
    pub image: String,
    pub prompt: String,
}

/// Request body for chat
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    #[serde(default)]
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Assistant reply. Failures are reported as fallback text.
#[derive(Debug, Serialize, ToSchema)]
pub struct AssistantReply {
    pub text: String,
}

/// Analyze an image
#[utoipa::path(
    post,
    path = "/api/assistant/analyze",
    request_body = AnalyzeRequest,
    responses((status = 200, description = "Analysis text", body = AssistantReply)),
    tag = "Assistant"
)]
pub async fn handle_analyze(
    State(assistant): State<Arc<dyn Assistant>>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AssistantReply> {
    let text = assistant
        .analyze(request.image.as_bytes(), &request.prompt)
        .await;
    Json(AssistantReply { text })
}

/// Chat with the assistant
#[utoipa::path(
    post,
    path = "/api/assistant/chat",
    request_body = ChatRequest,
    responses((status = 200, description = "Reply text", body = AssistantReply)),
    tag = "Assistant"
)]
pub async fn handle_chat(
    State(assistant): State<Arc<dyn Assistant>>,
    Json(request): Json<ChatRequest>,
) -> Json<AssistantReply> {
    let text = assistant.chat(&request.history, &request.message).await;
    Json(AssistantReply { text })
}
