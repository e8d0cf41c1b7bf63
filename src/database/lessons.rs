// ABOUTME: Database operations for generated lesson storage and queue management
// ABOUTME: Handles batch inserts, incomplete-queue fetches, and completion stamping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::errors::{AppError, AppResult};
use crate::models::{DifficultyLevel, Lesson, LessonContent, LessonType};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::parse_timestamp;

/// Lesson fields produced by the generation step, before persistence
#[derive(Debug, Clone)]
pub struct NewLesson {
    /// Lesson title
    pub title: String,
    /// Short description
    pub description: Option<String>,
    /// Lesson category
    pub lesson_type: LessonType,
    /// Structured instructions, steps, and tips
    pub content: LessonContent,
    /// Estimated duration in minutes
    pub estimated_duration: u32,
    /// Difficulty grading
    pub difficulty_level: DifficultyLevel,
}

/// Lesson database operations manager
pub struct LessonManager {
    pool: SqlitePool,
}

impl LessonManager {
    /// Create a new lesson manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a generated batch, appending to the user's queue
    ///
    /// Queue positions continue after the user's current maximum so new
    /// lessons always sort behind whatever is still pending.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn insert_batch(&self, user_id: Uuid, batch: &[NewLesson]) -> AppResult<()> {
        let row = sqlx::query(
            "SELECT COALESCE(MAX(position_in_queue), 0) as max_pos FROM lessons WHERE user_id = ?1",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to read queue position: {e}")))?;
        let max_pos: i64 = row.get("max_pos");

        let now = Utc::now().to_rfc3339();
        for (i, lesson) in batch.iter().enumerate() {
            let content = serde_json::to_string(&lesson.content).map_err(|e| {
                AppError::database(format!("Failed to serialize lesson content: {e}"))
            })?;

            sqlx::query(
                r"
                INSERT INTO lessons (id, user_id, title, description, lesson_type, content,
                    estimated_duration, difficulty_level, position_in_queue, is_completed, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10)
                ",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id.to_string())
            .bind(&lesson.title)
            .bind(&lesson.description)
            .bind(lesson.lesson_type.as_str())
            .bind(&content)
            .bind(i64::from(lesson.estimated_duration))
            .bind(lesson.difficulty_level.as_str())
            .bind(max_pos + i64::try_from(i).unwrap_or(0) + 1)
            .bind(&now)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert lesson: {e}")))?;
        }

        Ok(())
    }

    /// Incomplete lessons for a user, ordered by queue position
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn incomplete_lessons(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<Lesson>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM lessons
            WHERE user_id = ?1 AND is_completed = 0
            ORDER BY position_in_queue ASC
            LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list lessons: {e}")))?;

        rows.iter().map(Self::row_to_lesson).collect()
    }

    /// Number of incomplete lessons in a user's queue
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn incomplete_count(&self, user_id: Uuid) -> AppResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM lessons WHERE user_id = ?1 AND is_completed = 0",
        )
        .bind(user_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count lessons: {e}")))?;

        Ok(row.get("count"))
    }

    /// Get a lesson by id, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_lesson(&self, lesson_id: Uuid, user_id: Uuid) -> AppResult<Option<Lesson>> {
        let row = sqlx::query("SELECT * FROM lessons WHERE id = ?1 AND user_id = ?2")
            .bind(lesson_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get lesson: {e}")))?;

        row.as_ref().map(Self::row_to_lesson).transpose()
    }

    /// Stamp a lesson completed, scoped to its owner
    ///
    /// Returns false when the lesson was already completed (or does not
    /// belong to the user), so callers can avoid double-counting.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn mark_completed(
        &self,
        lesson_id: Uuid,
        user_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE lessons
            SET is_completed = 1, completed_at = ?1
            WHERE id = ?2 AND user_id = ?3 AND is_completed = 0
            ",
        )
        .bind(completed_at.to_rfc3339())
        .bind(lesson_id.to_string())
        .bind(user_id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to mark lesson completed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    fn row_to_lesson(row: &sqlx::sqlite::SqliteRow) -> AppResult<Lesson> {
        let id: String = row
            .try_get("id")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let lesson_type: String = row
            .try_get("lesson_type")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let content: String = row
            .try_get("content")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let difficulty: String = row
            .try_get("difficulty_level")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let duration: i64 = row
            .try_get("estimated_duration")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let position: i64 = row
            .try_get("position_in_queue")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let completed_at: Option<String> = row
            .try_get("completed_at")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?;

        Ok(Lesson {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Bad id in lesson row: {e}")))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| AppError::database(format!("Bad user id in lesson row: {e}")))?,
            title: row
                .try_get("title")
                .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?,
            description: row
                .try_get("description")
                .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?,
            lesson_type: LessonType::from_str_or_default(&lesson_type),
            content: serde_json::from_str(&content)
                .map_err(|e| AppError::database(format!("Bad lesson content JSON: {e}")))?,
            estimated_duration: u32::try_from(duration).unwrap_or(5),
            difficulty_level: DifficultyLevel::from_str_or_default(&difficulty),
            position_in_queue: u32::try_from(position).unwrap_or(0),
            is_completed: row
                .try_get("is_completed")
                .map_err(|e| AppError::database(format!("Bad lesson row: {e}")))?,
            completed_at: completed_at
                .map(|t| parse_timestamp(&t))
                .transpose()
                .map_err(|e| AppError::database(format!("Bad completion timestamp: {e}")))?,
            created_at: parse_timestamp(&created_at)
                .map_err(|e| AppError::database(format!("Bad timestamp: {e}")))?,
        })
    }
}
