// ABOUTME: Lesson route handlers for queue listing, quota checks, and completion
// ABOUTME: Completion enforces the daily gate and returns updated streaks and quota
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Lesson routes
//!
//! Listing, quota inspection, and completion. Completing a lesson runs the
//! full accounting: lesson stamp, progress upsert, streak advance.

use crate::{
    constants::limits,
    database::LessonManager,
    errors::AppError,
    gamification::milestones_reached,
    models::{Lesson, UserProgress, UserStreaks},
    rate_limiting::DailyQuota,
    resources::ServerResources,
    routes::authenticate,
    services,
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Response for a successful lesson completion
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    /// The completed lesson
    pub lesson: Lesson,
    /// Updated streak record
    pub streaks: UserStreaks,
    /// Updated progress row for today
    pub progress: UserProgress,
    /// Lesson quota after this completion
    pub quota: DailyQuota,
    /// Flowers in bloom after this completion
    pub flowers: usize,
}

/// Response for the lesson list
#[derive(Debug, Serialize)]
pub struct LessonListResponse {
    /// Incomplete lessons in queue order
    pub lessons: Vec<Lesson>,
}

/// Lesson routes handler
pub struct LessonRoutes;

impl LessonRoutes {
    /// Create all lesson routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/lessons", get(Self::list_lessons))
            .route("/api/lessons/quota", get(Self::get_quota))
            .route("/api/lessons/:lesson_id/complete", post(Self::complete_lesson))
            .with_state(resources)
    }

    /// List the user's incomplete lessons
    async fn list_lessons(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let lessons = LessonManager::new(resources.database.pool().clone())
            .incomplete_lessons(auth.user_id, limits::DASHBOARD_LESSON_LIMIT)
            .await?;

        Ok(Json(LessonListResponse { lessons }).into_response())
    }

    /// Current lesson quota state
    async fn get_quota(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let quota = services::lessons::current_quota(&resources.database, auth.user_id).await?;
        Ok(Json(quota).into_response())
    }

    /// Complete a lesson
    async fn complete_lesson(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Path(lesson_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;
        let lesson_id = Uuid::parse_str(&lesson_id)
            .map_err(|_| AppError::invalid_input("Invalid lesson id"))?;

        let result =
            services::lessons::complete_lesson(&resources.database, auth.user_id, lesson_id)
                .await?;

        let flowers = milestones_reached(result.streaks.total_lessons_completed);

        Ok(Json(CompletionResponse {
            lesson: result.lesson,
            streaks: result.streaks,
            progress: result.progress,
            quota: result.quota,
            flowers,
        })
        .into_response())
    }
}
