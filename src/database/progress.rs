// ABOUTME: Database operations for streak records and per-day progress counters
// ABOUTME: Handles lazy creation, atomic daily increments, and streak persistence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::constants::gamification::POINTS_PER_LESSON;
use crate::errors::{AppError, AppResult};
use crate::models::{UserProgress, UserStreaks};
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_date, parse_timestamp};

/// Streak and progress database operations manager
pub struct ProgressManager {
    pool: SqlitePool,
}

impl ProgressManager {
    /// Create a new progress manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Streak Operations
    // ========================================================================

    /// Get the streak record for a user
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_streaks(&self, user_id: Uuid) -> AppResult<Option<UserStreaks>> {
        let row = sqlx::query("SELECT * FROM user_streaks WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get streaks: {e}")))?;

        row.map(|r| Self::row_to_streaks(&r)).transpose()
    }

    /// Get the streak record for a user, creating a zeroed row if absent
    ///
    /// Streak rows are created lazily on first dashboard visit.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_or_create_streaks(&self, user_id: Uuid) -> AppResult<UserStreaks> {
        if let Some(streaks) = self.get_streaks(user_id).await? {
            return Ok(streaks);
        }

        let streaks = UserStreaks::new(user_id);
        sqlx::query(
            r"
            INSERT INTO user_streaks (user_id, current_streak, longest_streak,
                zen_garden_points, total_lessons_completed, last_activity_date,
                streak_freeze_used, created_at, updated_at)
            VALUES (?1, 0, 0, 0, 0, NULL, 0, ?2, ?2)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id.to_string())
        .bind(streaks.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create streaks: {e}")))?;

        Ok(streaks)
    }

    /// Persist an updated streak record
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn save_streaks(&self, streaks: &UserStreaks) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE user_streaks
            SET current_streak = ?1, longest_streak = ?2, zen_garden_points = ?3,
                total_lessons_completed = ?4, last_activity_date = ?5,
                streak_freeze_used = ?6, updated_at = ?7
            WHERE user_id = ?8
            ",
        )
        .bind(i64::from(streaks.current_streak))
        .bind(i64::from(streaks.longest_streak))
        .bind(i64::from(streaks.zen_garden_points))
        .bind(i64::from(streaks.total_lessons_completed))
        .bind(streaks.last_activity_date.map(|d| d.to_string()))
        .bind(streaks.streak_freeze_used)
        .bind(streaks.updated_at.to_rfc3339())
        .bind(streaks.user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to save streaks: {e}")))?;

        Ok(())
    }

    // ========================================================================
    // Daily Progress Operations
    // ========================================================================

    /// Get the progress row for a user and date, if one exists
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn get_progress(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<UserProgress>> {
        let row = sqlx::query("SELECT * FROM user_progress WHERE user_id = ?1 AND date = ?2")
            .bind(user_id.to_string())
            .bind(date.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get progress: {e}")))?;

        row.map(|r| Self::row_to_progress(&r)).transpose()
    }

    /// Sessions completed by a user on a given date (absent row counts as 0)
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn completed_sessions_on(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<u32> {
        Ok(self
            .get_progress(user_id, date)
            .await?
            .map_or(0, |p| p.completed_sessions))
    }

    /// Count one completed session for the given date
    ///
    /// The increment happens inside the upsert so two concurrent completions
    /// cannot lose a count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn record_completion(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<UserProgress> {
        let id = Uuid::new_v4();
        let now = chrono::Utc::now().to_rfc3339();
        let points = i64::from(POINTS_PER_LESSON);

        sqlx::query(
            r"
            INSERT INTO user_progress (id, user_id, date, completed_sessions, zen_garden_points, created_at)
            VALUES (?1, ?2, ?3, 1, ?4, ?5)
            ON CONFLICT (user_id, date) DO UPDATE SET
                completed_sessions = completed_sessions + 1,
                zen_garden_points = zen_garden_points + ?4
            ",
        )
        .bind(id.to_string())
        .bind(user_id.to_string())
        .bind(date.to_string())
        .bind(points)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to record completion: {e}")))?;

        self.get_progress(user_id, date)
            .await?
            .ok_or_else(|| AppError::database("Progress row missing after upsert"))
    }

    // ========================================================================
    // Row Conversion
    // ========================================================================

    fn row_to_streaks(row: &sqlx::sqlite::SqliteRow) -> AppResult<UserStreaks> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad streaks row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad streaks row: {e}")))?;
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Bad streaks row: {e}")))?;
        let last_activity: Option<String> = row
            .try_get("last_activity_date")
            .map_err(|e| AppError::database(format!("Bad streaks row: {e}")))?;

        Ok(UserStreaks {
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in streaks row: {e}")))?,
            current_streak: Self::get_counter(row, "current_streak")?,
            longest_streak: Self::get_counter(row, "longest_streak")?,
            zen_garden_points: Self::get_counter(row, "zen_garden_points")?,
            total_lessons_completed: Self::get_counter(row, "total_lessons_completed")?,
            last_activity_date: last_activity
                .map(|d| parse_date(&d))
                .transpose()
                .map_err(|e| AppError::database(format!("Bad activity date: {e}")))?,
            streak_freeze_used: row
                .try_get("streak_freeze_used")
                .map_err(|e| AppError::database(format!("Bad streaks row: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
            updated_at: parse_timestamp(&updated_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn row_to_progress(row: &sqlx::sqlite::SqliteRow) -> AppResult<UserProgress> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Bad progress row: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad progress row: {e}")))?;
        let date: String = row
            .try_get("date")
            .map_err(|e| AppError::database(format!("Bad progress row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad progress row: {e}")))?;

        Ok(UserProgress {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Bad id in progress row: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in progress row: {e}")))?,
            date: parse_date(&date)
                .map_err(|e| AppError::database(format!("Bad date in progress row: {e}")))?,
            completed_sessions: Self::get_counter(row, "completed_sessions")?,
            zen_garden_points: Self::get_counter(row, "zen_garden_points")?,
            stress_level: Self::get_score(row, "stress_level")?,
            mood_score: Self::get_score(row, "mood_score")?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }

    fn get_counter(row: &sqlx::sqlite::SqliteRow, column: &str) -> AppResult<u32> {
        let value: i64 = row
            .try_get(column)
            .map_err(|e| AppError::database(format!("Bad column {column}: {e}")))?;
        u32::try_from(value)
            .map_err(|_| AppError::database(format!("Negative counter in column {column}")))
    }

    fn get_score(row: &sqlx::sqlite::SqliteRow, column: &str) -> AppResult<Option<u8>> {
        let value: Option<i64> = row
            .try_get(column)
            .map_err(|e| AppError::database(format!("Bad column {column}: {e}")))?;
        Ok(value.and_then(|v| u8::try_from(v).ok()))
    }
}
