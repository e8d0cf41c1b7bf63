// ABOUTME: Profile route handlers covering edits, goals, recommendations, and metrics
// ABOUTME: Provides REST endpoints for onboarding data and wellbeing history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Profile, goal, recommendation, and health-metric routes

use crate::{
    database::ProfileManager,
    errors::AppError,
    models::{HealthMetrics, SubscriptionTier, UserGoal},
    resources::ServerResources,
    routes::authenticate,
    services,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub occupation: Option<String>,
    pub interests: Option<Vec<String>>,
    pub onboarding_completed: Option<bool>,
    pub subscription_type: Option<SubscriptionTier>,
}

/// Request to declare a wellness goal
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub goal_type: String,
    pub goal_description: Option<String>,
}

/// Response for the goal list
#[derive(Debug, Serialize)]
pub struct GoalListResponse {
    pub goals: Vec<UserGoal>,
}

/// Self-reported wellbeing readings
#[derive(Debug, Deserialize)]
pub struct RecordMetricsRequest {
    pub stress_level: Option<u8>,
    pub mood_score: Option<u8>,
    pub sleep_quality: Option<u8>,
    pub focus_level: Option<u8>,
    pub anxiety_level: Option<u8>,
    pub energy_level: Option<u8>,
}

/// Profile routes handler
pub struct ProfileRoutes;

impl ProfileRoutes {
    /// Create all profile routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/profile", get(Self::get_profile))
            .route("/api/profile", put(Self::update_profile))
            .route("/api/goals", get(Self::list_goals))
            .route("/api/goals", post(Self::create_goal))
            .route("/api/recommendations/today", get(Self::today_recommendation))
            .route(
                "/api/recommendations/today/complete",
                post(Self::complete_recommendation),
            )
            .route("/api/health-metrics", post(Self::record_metrics))
            .with_state(resources)
    }

    /// Get the user's profile, creating a default row if absent
    async fn get_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let profile = ProfileManager::new(resources.database.pool().clone())
            .get_or_create_profile(auth.user_id)
            .await?;

        Ok(Json(profile).into_response())
    }

    /// Apply a partial profile update
    async fn update_profile(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<UpdateProfileRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let manager = ProfileManager::new(resources.database.pool().clone());
        let mut profile = manager.get_or_create_profile(auth.user_id).await?;

        if let Some(full_name) = request.full_name {
            profile.full_name = Some(full_name);
        }
        if let Some(age) = request.age {
            profile.age = Some(age);
        }
        if let Some(gender) = request.gender {
            profile.gender = Some(gender);
        }
        if let Some(occupation) = request.occupation {
            profile.occupation = Some(occupation);
        }
        if let Some(interests) = request.interests {
            profile.interests = interests;
        }
        if let Some(onboarding_completed) = request.onboarding_completed {
            profile.onboarding_completed = onboarding_completed;
        }
        if let Some(subscription_type) = request.subscription_type {
            profile.subscription_type = subscription_type;
        }

        manager.upsert_profile(&profile).await?;
        let updated = manager.get_or_create_profile(auth.user_id).await?;

        Ok(Json(updated).into_response())
    }

    /// List the user's active goals
    async fn list_goals(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let goals = ProfileManager::new(resources.database.pool().clone())
            .active_goals(auth.user_id)
            .await?;

        Ok(Json(GoalListResponse { goals }).into_response())
    }

    /// Declare a new wellness goal
    async fn create_goal(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<CreateGoalRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        if request.goal_type.trim().is_empty() {
            return Err(AppError::invalid_input("goal_type must not be empty"));
        }

        let goal = ProfileManager::new(resources.database.pool().clone())
            .create_goal(
                auth.user_id,
                request.goal_type.trim(),
                request.goal_description.as_deref(),
            )
            .await?;

        Ok((StatusCode::CREATED, Json(goal)).into_response())
    }

    /// Today's recommendation, created on first request
    async fn today_recommendation(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let recommendation =
            services::recommendations::today_recommendation(&resources.database, auth.user_id)
                .await?;

        Ok(Json(recommendation).into_response())
    }

    /// Complete today's recommendation
    async fn complete_recommendation(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let (recommendation, progress) =
            services::recommendations::complete_today(&resources.database, auth.user_id).await?;

        Ok(Json(serde_json::json!({
            "recommendation": recommendation,
            "progress": progress,
        }))
        .into_response())
    }

    /// Record self-reported wellbeing readings
    async fn record_metrics(
        State(resources): State<Arc<ServerResources>>,
        headers: axum::http::HeaderMap,
        Json(request): Json<RecordMetricsRequest>,
    ) -> Result<Response, AppError> {
        let auth = authenticate(&headers, &resources)?;

        let now = chrono::Utc::now();
        let metrics = HealthMetrics {
            id: uuid::Uuid::new_v4(),
            user_id: auth.user_id,
            stress_level: request.stress_level,
            mood_score: request.mood_score,
            sleep_quality: request.sleep_quality,
            focus_level: request.focus_level,
            anxiety_level: request.anxiety_level,
            energy_level: request.energy_level,
            recorded_at: now,
            created_at: now,
        };

        ProfileManager::new(resources.database.pool().clone())
            .record_health_metrics(&metrics)
            .await?;

        Ok((StatusCode::CREATED, Json(metrics)).into_response())
    }
}
