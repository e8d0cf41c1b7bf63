// ABOUTME: Database operations for per-user settings rows
// ABOUTME: Handles lazy default creation and preference updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::errors::{AppError, AppResult};
use crate::models::{ChatPersonality, UserSettings};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::parse_timestamp;

/// Settings database operations manager
pub struct SettingsManager {
    pool: SqlitePool,
}

impl SettingsManager {
    /// Create a new settings manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the settings row for a user
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_settings(&self, user_id: Uuid) -> AppResult<Option<UserSettings>> {
        let row = sqlx::query("SELECT * FROM user_settings WHERE user_id = ?1")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get settings: {e}")))?;

        row.map(|r| Self::row_to_settings(&r)).transpose()
    }

    /// Get the settings row for a user, creating defaults if absent
    ///
    /// Settings are created lazily on first dashboard visit with the
    /// friendly personality and light theme.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_or_create_settings(&self, user_id: Uuid) -> AppResult<UserSettings> {
        if let Some(settings) = self.get_settings(user_id).await? {
            return Ok(settings);
        }

        let settings = UserSettings::new(user_id);
        sqlx::query(
            r"
            INSERT INTO user_settings (user_id, chat_personality, daily_lesson_limit,
                notifications_enabled, theme, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT (user_id) DO NOTHING
            ",
        )
        .bind(user_id.to_string())
        .bind(settings.chat_personality.as_str())
        .bind(i64::from(settings.daily_lesson_limit))
        .bind(settings.notifications_enabled)
        .bind(&settings.theme)
        .bind(settings.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create settings: {e}")))?;

        Ok(settings)
    }

    /// Persist an updated settings row
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn update_settings(&self, settings: &UserSettings) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE user_settings
            SET chat_personality = ?1, daily_lesson_limit = ?2,
                notifications_enabled = ?3, theme = ?4, updated_at = ?5
            WHERE user_id = ?6
            ",
        )
        .bind(settings.chat_personality.as_str())
        .bind(i64::from(settings.daily_lesson_limit))
        .bind(settings.notifications_enabled)
        .bind(&settings.theme)
        .bind(Utc::now().to_rfc3339())
        .bind(settings.user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update settings: {e}")))?;

        Ok(())
    }

    fn row_to_settings(row: &sqlx::sqlite::SqliteRow) -> AppResult<UserSettings> {
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?;
        let personality: String = row
            .try_get("chat_personality")
            .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?;
        let limit: i64 = row
            .try_get("daily_lesson_limit")
            .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?;
        let updated_at: String = row
            .try_get("updated_at")
            .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?;

        Ok(UserSettings {
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in settings row: {e}")))?,
            chat_personality: ChatPersonality::from_str_or_default(&personality),
            daily_lesson_limit: u32::try_from(limit).unwrap_or(1),
            notifications_enabled: row
                .try_get("notifications_enabled")
                .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?,
            theme: row
                .try_get("theme")
                .map_err(|e| AppError::database(format!("Bad settings row: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
            updated_at: parse_timestamp(&updated_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }
}
