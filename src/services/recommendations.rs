// ABOUTME: Daily recommendation selection and completion accounting
// ABOUTME: Picks one practice per user per day from a fixed catalogue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::database::{Database, ProfileManager, ProgressManager};
use crate::errors::{AppError, AppResult};
use crate::models::{DailyRecommendation, UserProgress};
use crate::rate_limiting::utc_today;
use rand::seq::SliceRandom;
use uuid::Uuid;

/// Fixed catalogue the daily pick is drawn from
const CATALOGUE: &[(&str, &str, &str)] = &[
    (
        "meditation",
        "Morning Mindfulness",
        "Start your day with a 5-minute guided meditation to center yourself.",
    ),
    (
        "cbt",
        "Thought Challenge",
        "Practice identifying and reframing negative thought patterns.",
    ),
    (
        "breathing",
        "Box Breathing",
        "Use the 4-4-4-4 breathing technique to reduce stress and anxiety.",
    ),
    (
        "gratitude",
        "Gratitude Practice",
        "Write down three things you're grateful for today.",
    ),
];

/// Today's recommendation for a user, creating one on first request
///
/// # Errors
///
/// Returns an error if the store is unreachable.
pub async fn today_recommendation(
    database: &Database,
    user_id: Uuid,
) -> AppResult<DailyRecommendation> {
    let profile_manager = ProfileManager::new(database.pool().clone());
    let today = utc_today();

    if let Some(existing) = profile_manager.get_recommendation(user_id, today).await? {
        return Ok(existing);
    }

    let (kind, title, description) = CATALOGUE
        .choose(&mut rand::thread_rng())
        .copied()
        .ok_or_else(|| AppError::internal("Recommendation catalogue is empty"))?;

    profile_manager
        .create_recommendation(user_id, today, kind, title, description)
        .await
}

/// Mark today's recommendation completed and count the session
///
/// A recommendation completion counts toward today's sessions and points but
/// does not advance the streak; only lessons do that.
///
/// # Errors
///
/// Returns `ResourceNotFound` when no recommendation exists for today, and
/// database errors on write failure.
pub async fn complete_today(
    database: &Database,
    user_id: Uuid,
) -> AppResult<(DailyRecommendation, UserProgress)> {
    let profile_manager = ProfileManager::new(database.pool().clone());
    let progress_manager = ProgressManager::new(database.pool().clone());
    let today = utc_today();

    if profile_manager
        .get_recommendation(user_id, today)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("Daily recommendation"));
    }

    let newly_completed = profile_manager
        .complete_recommendation(user_id, today)
        .await?;

    let progress = if newly_completed {
        progress_manager.record_completion(user_id, today).await?
    } else {
        progress_manager
            .get_progress(user_id, today)
            .await?
            .ok_or_else(|| AppError::database("Progress row missing for completed day"))?
    };

    let recommendation = profile_manager
        .get_recommendation(user_id, today)
        .await?
        .ok_or_else(|| AppError::database("Recommendation row vanished"))?;

    Ok((recommendation, progress))
}
