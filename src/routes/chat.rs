// ABOUTME: Chat route handlers for companion conversation management
// ABOUTME: Provides REST endpoints for sessions, message history, and gated sends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Chat routes for companion conversations
//!
//! Session creation and listing, message history, and sending. Sending
//! enforces the daily message gate and always produces exactly one assistant
//! reply (the fallback string when the LLM call fails).

use crate::{
    constants::limits,
    database::{
        chat::{ChatMessageRecord, ChatSessionRecord},
        ChatManager,
    },
    errors::AppError,
    rate_limiting::DailyQuota,
    resources::ServerResources,
    routes::authenticate,
    services,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request to create a new chat session
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Session title
    #[serde(default = "default_session_title")]
    pub title: String,
}

fn default_session_title() -> String {
    "New Chat".to_owned()
}

/// Request to send a message
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message content
    pub content: String,
}

/// Response for listing sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionListResponse {
    /// Sessions, most recently active first
    pub sessions: Vec<ChatSessionRecord>,
}

/// Response for the message history
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    /// Messages in chronological order
    pub messages: Vec<ChatMessageRecord>,
}

/// Response for one completed chat exchange
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// The persisted user message
    pub user_message: ChatMessageRecord,
    /// The persisted assistant reply
    pub assistant_message: ChatMessageRecord,
    /// Message quota after this send
    pub quota: DailyQuota,
}

/// Chat routes handler
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create all chat routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/chat/sessions", post(Self::create_session))
            .route("/api/chat/sessions", get(Self::list_sessions))
            .route("/api/chat/quota", get(Self::get_quota))
            .route(
                "/api/chat/sessions/:session_id/messages",
                get(Self::get_messages),
            )
            .route(
                "/api/chat/sessions/:session_id/messages",
                post(Self::send_message),
            )
            .with_state(resources)
    }

    /// Create a new chat session
    async fn create_session(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<CreateSessionRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let session = ChatManager::new(resources.database.pool().clone())
            .create_session(auth.user_id, &request.title)
            .await?;

        Ok((StatusCode::CREATED, Json(session)).into_response())
    }

    /// List the user's sessions
    async fn list_sessions(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let sessions = ChatManager::new(resources.database.pool().clone())
            .list_sessions(auth.user_id, limits::DASHBOARD_SESSION_LIMIT)
            .await?;

        Ok(Json(SessionListResponse { sessions }).into_response())
    }

    /// Current message quota state
    async fn get_quota(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let quota = services::companion::current_quota(&resources.database, auth.user_id).await?;
        Ok(Json(quota).into_response())
    }

    /// Get the message history for a session
    async fn get_messages(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let chat_manager = ChatManager::new(resources.database.pool().clone());
        chat_manager
            .get_session(&session_id, auth.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Chat session").with_resource_id(&session_id))?;

        let messages = chat_manager.get_messages(&session_id, auth.user_id).await?;
        Ok(Json(MessagesResponse { messages }).into_response())
    }

    /// Send a message and receive the companion's reply
    async fn send_message(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(session_id): Path<String>,
        Json(request): Json<SendMessageRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let content = request.content.trim();
        if content.is_empty() {
            return Err(AppError::invalid_input("Message content must not be empty"));
        }

        let result = services::companion::send_message(
            &resources.database,
            &resources.chat_provider,
            auth.user_id,
            &session_id,
            content,
        )
        .await?;

        Ok(Json(SendMessageResponse {
            user_message: result.user_message,
            assistant_message: result.assistant_message,
            quota: result.quota,
        })
        .into_response())
    }
}
