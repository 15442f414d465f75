//! REST API request handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chatbot::Chatbot;

/// Application state shared across handlers.
pub struct ApiState {
    /// Chatbot answering requests.
    pub chatbot: Arc<Chatbot>,
}

impl ApiState {
    /// Create new API state.
    pub fn new(chatbot: Arc<Chatbot>) -> Self {
        Self { chatbot }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Chat request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// Failure body shared by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Tables list response.
#[derive(Debug, Clone, Serialize)]
pub struct TablesResponse {
    pub success: bool,
    pub tables: Vec<String>,
}

/// Health response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database_connected: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/chat - Answer a chat message.
///
/// Only a missing or empty message is rejected; any other text, including
/// whitespace, goes to the chatbot unchanged.
pub async fn chat_handler(
    State(state): State<Arc<ApiState>>,
    payload: Option<Json<ChatRequest>>,
) -> impl IntoResponse {
    let message = payload
        .and_then(|Json(request)| request.message)
        .unwrap_or_default();

    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No message provided")),
        )
            .into_response();
    }

    let chatbot = state.chatbot.clone();
    match tokio::task::spawn_blocking(move || chatbot.process_message(&message)).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Chat task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(format!("Server error: {e}"))),
            )
                .into_response()
        }
    }
}

/// GET /api/tables - List database tables.
pub async fn tables_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    let chatbot = state.chatbot.clone();
    let result = tokio::task::spawn_blocking(move || chatbot.available_tables()).await;

    match result {
        Ok(Ok(tables)) => (
            StatusCode::OK,
            Json(TablesResponse {
                success: true,
                tables,
            }),
        )
            .into_response(),
        Ok(Err(e)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Server error: {e}"))),
        )
            .into_response(),
    }
}

/// GET /api/health - Liveness and database status.
pub async fn health_handler(State(state): State<Arc<ApiState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        database_connected: state.chatbot.is_connected(),
    })
}
