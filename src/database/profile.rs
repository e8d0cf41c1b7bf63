// ABOUTME: Database operations for profiles, goals, recommendations, and health metrics
// ABOUTME: Handles profile upserts, active goal listing, and insert-only metric history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::errors::{AppError, AppResult};
use crate::models::{DailyRecommendation, HealthMetrics, SubscriptionTier, UserGoal, UserProfile};
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_date, parse_timestamp};

/// Profile, goal, and wellbeing-history database operations manager
pub struct ProfileManager {
    pool: SqlitePool,
}

impl ProfileManager {
    /// Create a new profile manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Profile Operations
    // ========================================================================

    /// Get the profile for a user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query("SELECT * FROM user_profiles WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        row.map(|r| Self::row_to_profile(&r)).transpose()
    }

    /// Get the profile for a user, creating a default row if absent
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_or_create_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        if let Some(profile) = self.get_profile(user_id).await? {
            return Ok(profile);
        }

        let profile = UserProfile::new(user_id);
        self.upsert_profile(&profile).await?;
        Ok(profile)
    }

    /// Insert or replace the profile row for a user
    ///
    /// The original creation time is preserved across replacements.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<()> {
        let interests = serde_json::to_string(&profile.interests)
            .map_err(|e| AppError::database(format!("Failed to serialize interests: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT OR REPLACE INTO user_profiles (
                user_id, full_name, age, gender, occupation, interests,
                onboarding_completed, subscription_type, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                     COALESCE((SELECT created_at FROM user_profiles WHERE user_id = ?1), ?9), ?10)
            ",
        )
        .bind(profile.user_id.to_string())
        .bind(&profile.full_name)
        .bind(profile.age.map(i64::from))
        .bind(&profile.gender)
        .bind(&profile.occupation)
        .bind(&interests)
        .bind(profile.onboarding_completed)
        .bind(profile.subscription_type.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert profile: {e}")))?;

        Ok(())
    }

    /// Subscription tier for a user (absent profile means the free tier)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn subscription_tier(&self, user_id: Uuid) -> AppResult<SubscriptionTier> {
        Ok(self
            .get_profile(user_id)
            .await?
            .map(|p| p.subscription_type)
            .unwrap_or_default())
    }

    // ========================================================================
    // Goal Operations
    // ========================================================================

    /// Create a wellness goal for a user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_goal(
        &self,
        user_id: Uuid,
        goal_type: &str,
        goal_description: Option<&str>,
    ) -> AppResult<UserGoal> {
        let goal = UserGoal {
            id: Uuid::new_v4(),
            user_id,
            goal_type: goal_type.to_owned(),
            goal_description: goal_description.map(ToOwned::to_owned),
            is_active: true,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO user_goals (id, user_id, goal_type, goal_description, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, 1, ?5)
            ",
        )
        .bind(goal.id.to_string())
        .bind(user_id.to_string())
        .bind(goal_type)
        .bind(goal_description)
        .bind(goal.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create goal: {e}")))?;

        Ok(goal)
    }

    /// Active goals for a user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn active_goals(&self, user_id: Uuid) -> AppResult<Vec<UserGoal>> {
        let rows = sqlx::query(
            "SELECT * FROM user_goals WHERE user_id = ?1 AND is_active = 1 ORDER BY created_at ASC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list goals: {e}")))?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    // ========================================================================
    // Daily Recommendation Operations
    // ========================================================================

    /// Get the recommendation for a user and date, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_recommendation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailyRecommendation>> {
        let row =
            sqlx::query("SELECT * FROM daily_recommendations WHERE user_id = ?1 AND date = ?2")
                .bind(user_id.to_string())
                .bind(date.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Failed to get recommendation: {e}")))?;

        row.map(|r| Self::row_to_recommendation(&r)).transpose()
    }

    /// Insert the recommendation for a user and date
    ///
    /// The `(user_id, date)` uniqueness constraint makes a concurrent double
    /// insert a no-op rather than a duplicate.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_recommendation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        recommendation_type: &str,
        title: &str,
        description: &str,
    ) -> AppResult<DailyRecommendation> {
        sqlx::query(
            r"
            INSERT INTO daily_recommendations (id, user_id, date, recommendation_type, title, description, completed, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)
            ON CONFLICT (user_id, date) DO NOTHING
            ",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(date.to_string())
        .bind(recommendation_type)
        .bind(title)
        .bind(description)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create recommendation: {e}")))?;

        self.get_recommendation(user_id, date)
            .await?
            .ok_or_else(|| AppError::database("Recommendation row missing after insert"))
    }

    /// Mark a recommendation completed
    ///
    /// Returns false when it was already completed, so callers can avoid
    /// double-counting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn complete_recommendation(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE daily_recommendations
            SET completed = 1
            WHERE user_id = ?1 AND date = ?2 AND completed = 0
            ",
        )
        .bind(user_id.to_string())
        .bind(date.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to complete recommendation: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    // ========================================================================
    // Health Metric Operations
    // ========================================================================

    /// Record a set of self-reported wellbeing readings
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn record_health_metrics(&self, metrics: &HealthMetrics) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_health_metrics (id, user_id, stress_level, mood_score,
                sleep_quality, focus_level, anxiety_level, energy_level, recorded_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(metrics.id.to_string())
        .bind(metrics.user_id.to_string())
        .bind(metrics.stress_level.map(i64::from))
        .bind(metrics.mood_score.map(i64::from))
        .bind(metrics.sleep_quality.map(i64::from))
        .bind(metrics.focus_level.map(i64::from))
        .bind(metrics.anxiety_level.map(i64::from))
        .bind(metrics.energy_level.map(i64::from))
        .bind(metrics.recorded_at.to_rfc3339())
        .bind(metrics.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record health metrics: {e}")))?;

        Ok(())
    }

    /// Most recent wellbeing readings, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn recent_health_metrics(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<HealthMetrics>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM user_health_metrics
            WHERE user_id = ?1
            ORDER BY recorded_at DESC
            LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list health metrics: {e}")))?;

        rows.iter().map(Self::row_to_metrics).collect()
    }

    // ========================================================================
    // Row Conversion
    // ========================================================================

    fn row_to_profile(row: &sqlx::sqlite::SqliteRow) -> AppResult<UserProfile> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;
        let interests: String = row
            .try_get("interests")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;
        let tier: String = row
            .try_get("subscription_type")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;
        let age: Option<i64> = row
            .try_get("age")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?;

        Ok(UserProfile {
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in profile row: {e}")))?,
            full_name: row
                .try_get("full_name")
                .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?,
            age: age.and_then(|a| u32::try_from(a).ok()),
            gender: row
                .try_get("gender")
                .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?,
            occupation: row
                .try_get("occupation")
                .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?,
            interests: serde_json::from_str(&interests).unwrap_or_default(),
            onboarding_completed: row
                .try_get("onboarding_completed")
                .map_err(|e| AppError::database(format!("Bad profile row: {e}")))?,
            subscription_type: SubscriptionTier::from_str_or_default(&tier),
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
            updated_at: parse_timestamp(&updated_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn row_to_goal(row: &sqlx::sqlite::SqliteRow) -> AppResult<UserGoal> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?;

        Ok(UserGoal {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Bad id in goal row: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in goal row: {e}")))?,
            goal_type: row
                .try_get("goal_type")
                .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?,
            goal_description: row
                .try_get("goal_description")
                .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| AppError::database(format!("Bad goal row: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn row_to_recommendation(row: &sqlx::sqlite::SqliteRow) -> AppResult<DailyRecommendation> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?;
        let date: String = row
            .try_get("date")
            .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?;

        Ok(DailyRecommendation {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Bad id in recommendation row: {e}")))?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| {
                AppError::database(format!("Bad user id in recommendation row: {e}"))
            })?,
            date: parse_date(&date)
                .map_err(|e| AppError::database(format!("Bad date in recommendation row: {e}")))?,
            recommendation_type: row
                .try_get("recommendation_type")
                .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?,
            title: row
                .try_get("title")
                .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?,
            description: row
                .try_get("description")
                .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?,
            completed: row
                .try_get("completed")
                .map_err(|e| AppError::database(format!("Bad recommendation row: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn row_to_metrics(row: &sqlx::sqlite::SqliteRow) -> AppResult<HealthMetrics> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Bad metrics row: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad metrics row: {e}")))?;
        let recorded_at: String = row
            .try_get("recorded_at")
            .map_err(|e| AppError::database(format!("Bad metrics row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad metrics row: {e}")))?;

        Ok(HealthMetrics {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Bad id in metrics row: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in metrics row: {e}")))?,
            stress_level: Self::get_score(row, "stress_level")?,
            mood_score: Self::get_score(row, "mood_score")?,
            sleep_quality: Self::get_score(row, "sleep_quality")?,
            focus_level: Self::get_score(row, "focus_level")?,
            anxiety_level: Self::get_score(row, "anxiety_level")?,
            energy_level: Self::get_score(row, "energy_level")?,
            recorded_at: parse_timestamp(&recorded_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn get_score(row: &sqlx::sqlite::SqliteRow, column: &str) -> AppResult<Option<u8>> {
        let value: Option<i64> = row
            .try_get(column)
            .map_err(|e| AppError::database(format!("Bad column {column}: {e}")))?;
        Ok(value.and_then(|v| u8::try_from(v).ok()))
    }
}
