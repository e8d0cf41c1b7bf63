// ABOUTME: Database operations for AI companion chat sessions and messages
// ABOUTME: Handles session CRUD, append-only message history, and daily usage counting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::errors::{AppError, AppResult};
use crate::llm::MessageRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

// ============================================================================
// Database Record Types
// ============================================================================

/// Database representation of a chat session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionRecord {
    /// Unique session ID
    pub id: String,
    /// User ID who owns the session
    pub user_id: String,
    /// Session title (auto-generated or user-defined)
    pub title: String,
    /// Number of messages in the session
    pub message_count: i64,
    /// When the last message was appended (ISO 8601)
    pub last_message_at: String,
    /// When the session was created (ISO 8601)
    pub created_at: String,
    /// When the session was last updated (ISO 8601)
    pub updated_at: String,
}

/// Database representation of a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRecord {
    /// Unique message ID
    pub id: String,
    /// Session ID this message belongs to
    pub session_id: String,
    /// User ID who owns the session
    pub user_id: String,
    /// Role of the message sender (user or assistant)
    pub role: String,
    /// Message content
    pub content: String,
    /// When the message was created (ISO 8601)
    pub created_at: String,
}

// ============================================================================
// Chat Manager
// ============================================================================

/// Chat database operations manager
pub struct ChatManager {
    pool: SqlitePool,
}

impl ChatManager {
    /// Create a new chat manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ========================================================================
    // Session Operations
    // ========================================================================

    /// Create a new chat session
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn create_session(
        &self,
        user_id: Uuid,
        title: &str,
    ) -> AppResult<ChatSessionRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r"
            INSERT INTO chat_sessions (id, user_id, title, message_count, last_message_at, created_at, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4, ?4, ?4)
            ",
        )
        .bind(&id)
        .bind(user_id.to_string())
        .bind(title)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create chat session: {e}")))?;

        Ok(ChatSessionRecord {
            id,
            user_id: user_id.to_string(),
            title: title.to_owned(),
            message_count: 0,
            last_message_at: now.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a session by ID, scoped to its owner
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_session(
        &self,
        session_id: &str,
        user_id: Uuid,
    ) -> AppResult<Option<ChatSessionRecord>> {
        let row = sqlx::query("SELECT * FROM chat_sessions WHERE id = ?1 AND user_id = ?2")
            .bind(session_id)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get chat session: {e}")))?;

        Ok(row.map(|r| ChatSessionRecord {
            id: r.get("id"),
            user_id: r.get("user_id"),
            title: r.get("title"),
            message_count: r.get("message_count"),
            last_message_at: r.get("last_message_at"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    /// List a user's sessions, most recently active first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_sessions(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<ChatSessionRecord>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM chat_sessions
            WHERE user_id = ?1
            ORDER BY last_message_at DESC
            LIMIT ?2
            ",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list chat sessions: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|r| ChatSessionRecord {
                id: r.get("id"),
                user_id: r.get("user_id"),
                title: r.get("title"),
                message_count: r.get("message_count"),
                last_message_at: r.get("last_message_at"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    // ========================================================================
    // Message Operations
    // ========================================================================

    /// Append a message to a session
    ///
    /// Also bumps the session's message count and last-message timestamp.
    /// Messages are never edited or deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn add_message(
        &self,
        session_id: &str,
        user_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> AppResult<ChatMessageRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let role_str = role.as_str();

        sqlx::query(
            r"
            INSERT INTO chat_messages (id, session_id, user_id, role, content, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(&id)
        .bind(session_id)
        .bind(user_id.to_string())
        .bind(role_str)
        .bind(content)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to add message: {e}")))?;

        sqlx::query(
            r"
            UPDATE chat_sessions
            SET message_count = message_count + 1, last_message_at = ?1, updated_at = ?1
            WHERE id = ?2
            ",
        )
        .bind(&now)
        .bind(session_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update session timestamp: {e}")))?;

        Ok(ChatMessageRecord {
            id,
            session_id: session_id.to_owned(),
            user_id: user_id.to_string(),
            role: role_str.to_owned(),
            content: content.to_owned(),
            created_at: now,
        })
    }

    /// Get all messages for a session in chronological order
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_messages(
        &self,
        session_id: &str,
        user_id: Uuid,
    ) -> AppResult<Vec<ChatMessageRecord>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM chat_messages
            WHERE session_id = ?1 AND user_id = ?2
            ORDER BY created_at ASC
            ",
        )
        .bind(session_id)
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get messages: {e}")))?;

        Ok(rows.into_iter().map(|r| Self::row_to_message(&r)).collect())
    }

    /// Get the last N messages for a session (for the LLM context window)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn recent_messages(
        &self,
        session_id: &str,
        user_id: Uuid,
        limit: i64,
    ) -> AppResult<Vec<ChatMessageRecord>> {
        let rows = sqlx::query(
            r"
            SELECT * FROM chat_messages
            WHERE session_id = ?1 AND user_id = ?2
            ORDER BY created_at DESC
            LIMIT ?3
            ",
        )
        .bind(session_id)
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recent messages: {e}")))?;

        // Reverse to get chronological order
        let mut messages: Vec<ChatMessageRecord> =
            rows.into_iter().map(|r| Self::row_to_message(&r)).collect();
        messages.reverse();

        Ok(messages)
    }

    /// Count user-authored messages across all sessions in a UTC window
    ///
    /// Drives the daily message quota: the window is one UTC calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn count_user_messages_between(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<u32> {
        let row = sqlx::query(
            r"
            SELECT COUNT(*) as count FROM chat_messages
            WHERE user_id = ?1 AND role = 'user'
              AND created_at >= ?2 AND created_at < ?3
            ",
        )
        .bind(user_id.to_string())
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count messages: {e}")))?;

        let count: i64 = row.get("count");
        Ok(u32::try_from(count).unwrap_or(0))
    }

    fn row_to_message(row: &sqlx::sqlite::SqliteRow) -> ChatMessageRecord {
        ChatMessageRecord {
            id: row.get("id"),
            session_id: row.get("session_id"),
            user_id: row.get("user_id"),
            role: row.get("role"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        }
    }
}
