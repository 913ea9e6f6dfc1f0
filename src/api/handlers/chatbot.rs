//! Advice chatbot handler

use axum::{Json, body::Bytes};
use serde::{Deserialize, Serialize};

use crate::api::{AppError, parse_body};
use crate::core::advice;

/// Request body for the chatbot
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Chatbot answer
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

/// POST /chatbot/ - Keyword-matched advice
pub async fn chat(body: Bytes) -> Result<Json<ChatReply>, AppError> {
    let req: ChatRequest = parse_body(&body)?;
    if req.message.trim().is_empty() {
        return Err(AppError::bad_request("message cannot be empty"));
    }

    Ok(Json(ChatReply {
        reply: advice::reply_to(&req.message).to_string(),
    }))
}
