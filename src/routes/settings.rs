// ABOUTME: Settings route handlers for companion personality and UI preferences
// ABOUTME: Settings rows are created lazily with defaults on first fetch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Settings routes

use crate::{
    database::SettingsManager,
    errors::AppError,
    models::ChatPersonality,
    resources::ServerResources,
    routes::authenticate,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Partial settings update; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub chat_personality: Option<ChatPersonality>,
    pub daily_lesson_limit: Option<u32>,
    pub notifications_enabled: Option<bool>,
    pub theme: Option<String>,
}

/// Settings routes handler
pub struct SettingsRoutes;

impl SettingsRoutes {
    /// Create all settings routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/settings", get(Self::get_settings))
            .route("/api/settings", put(Self::update_settings))
            .with_state(resources)
    }

    /// Get the user's settings, creating defaults if absent
    async fn get_settings(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let settings = SettingsManager::new(resources.database.pool().clone())
            .get_or_create_settings(auth.user_id)
            .await?;

        Ok(Json(settings).into_response())
    }

    /// Apply a partial settings update
    async fn update_settings(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<UpdateSettingsRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let manager = SettingsManager::new(resources.database.pool().clone());
        let mut settings = manager.get_or_create_settings(auth.user_id).await?;

        if let Some(chat_personality) = request.chat_personality {
            settings.chat_personality = chat_personality;
        }
        if let Some(daily_lesson_limit) = request.daily_lesson_limit {
            settings.daily_lesson_limit = daily_lesson_limit;
        }
        if let Some(notifications_enabled) = request.notifications_enabled {
            settings.notifications_enabled = notifications_enabled;
        }
        if let Some(theme) = request.theme {
            if theme != "light" && theme != "dark" {
                return Err(AppError::invalid_input("theme must be 'light' or 'dark'"));
            }
            settings.theme = theme;
        }

        manager.update_settings(&settings).await?;
        let updated = manager.get_or_create_settings(auth.user_id).await?;

        Ok(Json(updated).into_response())
    }
}
