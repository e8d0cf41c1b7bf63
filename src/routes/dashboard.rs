// ABOUTME: Dashboard route handler aggregating profile, streaks, lessons, and sessions
// ABOUTME: Lazily creates settings and streak rows and triggers lesson queue refills
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Dashboard aggregation route
//!
//! One fetch returns everything the dashboard renders. Store failures on the
//! list fetches degrade to empty lists rather than failing the request.

use crate::{
    database::{chat::ChatSessionRecord, ChatManager, LessonManager, ProfileManager,
        ProgressManager, SettingsManager},
    demo,
    errors::AppError,
    gamification::{milestones_reached, next_milestone},
    rate_limiting::utc_today,
    resources::ServerResources,
    routes::authenticate,
    services,
};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

use crate::constants::limits;
use crate::models::{Lesson, UserProfile, UserProgress, UserSettings, UserStreaks};
use crate::rate_limiting::DailyQuota;

/// Zen Garden summary derived from the streak record
#[derive(Debug, Serialize, Deserialize)]
pub struct ZenGardenSummary {
    /// Flowers currently in bloom
    pub flowers: usize,
    /// Next total-lessons threshold, if any remain
    pub next_milestone: Option<u32>,
    /// Accumulated points
    pub points: u32,
}

/// Aggregate dashboard response
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// User profile (created with defaults at registration)
    pub profile: UserProfile,
    /// User settings (lazily created)
    pub settings: UserSettings,
    /// Streak record (lazily created)
    pub streaks: UserStreaks,
    /// Incomplete lessons in queue order
    pub lessons: Vec<Lesson>,
    /// Recent chat sessions, most recently active first
    pub chat_sessions: Vec<ChatSessionRecord>,
    /// Today's progress row, if any activity happened
    pub today_progress: Option<UserProgress>,
    /// Daily lesson quota state
    pub lesson_quota: DailyQuota,
    /// Daily message quota state
    pub message_quota: DailyQuota,
    /// Zen Garden summary
    pub zen_garden: ZenGardenSummary,
}

/// Dashboard routes handler
pub struct DashboardRoutes;

impl DashboardRoutes {
    /// Create all dashboard routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/dashboard", get(Self::get_dashboard))
            .with_state(resources)
    }

    /// Aggregate everything the dashboard renders
    async fn get_dashboard(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if demo::is_demo_user(auth.user_id) {
            return Ok(Json(Self::demo_dashboard()).into_response());
        }

        let pool = resources.database.pool().clone();
        let user_id = auth.user_id;

        // Top up the queue before fetching; a failed generation only logs
        if let Err(e) =
            services::lessons::ensure_lesson_queue(&resources.database, &resources.chat_provider, user_id)
                .await
        {
            warn!("Lesson queue refill failed for {user_id}: {e}");
        }

        let profile = ProfileManager::new(pool.clone())
            .get_or_create_profile(user_id)
            .await?;
        let settings = SettingsManager::new(pool.clone())
            .get_or_create_settings(user_id)
            .await?;
        let streaks = ProgressManager::new(pool.clone())
            .get_or_create_streaks(user_id)
            .await?;

        // List fetches degrade to empty rather than failing the dashboard
        let lessons = LessonManager::new(pool.clone())
            .incomplete_lessons(user_id, limits::DASHBOARD_LESSON_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to fetch lessons for {user_id}: {e}");
                Vec::new()
            });
        let chat_sessions = ChatManager::new(pool.clone())
            .list_sessions(user_id, limits::DASHBOARD_SESSION_LIMIT)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to fetch chat sessions for {user_id}: {e}");
                Vec::new()
            });

        let today_progress = ProgressManager::new(pool)
            .get_progress(user_id, utc_today())
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to fetch today's progress for {user_id}: {e}");
                None
            });

        let lesson_quota = services::lessons::current_quota(&resources.database, user_id).await?;
        let message_quota =
            services::companion::current_quota(&resources.database, user_id).await?;

        let zen_garden = Self::zen_garden_summary(&streaks);

        Ok(Json(DashboardResponse {
            profile,
            settings,
            streaks,
            lessons,
            chat_sessions,
            today_progress,
            lesson_quota,
            message_quota,
            zen_garden,
        })
        .into_response())
    }

    /// Fixed dashboard served to the demo identity
    fn demo_dashboard() -> DashboardResponse {
        let streaks = demo::sample_streaks();
        let profile = demo::sample_profile();
        let tier = profile.subscription_type;
        let zen_garden = Self::zen_garden_summary(&streaks);

        DashboardResponse {
            profile,
            settings: demo::sample_settings(),
            lessons: demo::sample_lessons(),
            chat_sessions: demo::sample_chat_sessions(),
            today_progress: None,
            lesson_quota: crate::rate_limiting::lesson_quota(tier, 0),
            message_quota: crate::rate_limiting::message_quota(tier, 0),
            zen_garden,
            streaks,
        }
    }

    fn zen_garden_summary(streaks: &UserStreaks) -> ZenGardenSummary {
        ZenGardenSummary {
            flowers: milestones_reached(streaks.total_lessons_completed),
            next_milestone: next_milestone(streaks.total_lessons_completed),
            points: streaks.zen_garden_points,
        }
    }
}
