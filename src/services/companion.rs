// ABOUTME: Companion chat orchestration: quota gate, persistence, LLM dispatch, fallback
// ABOUTME: Guarantees exactly one assistant reply per accepted user message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::constants::{error_messages, limits, sampling};
use crate::database::{
    chat::ChatMessageRecord, ChatManager, Database, ProfileManager, SettingsManager,
};
use crate::errors::{AppError, AppResult};
use crate::llm::{prompts, ChatMessage, ChatProvider, ChatRequest, LlmProvider, MessageRole};
use crate::rate_limiting::{message_quota, utc_day_bounds, utc_today, DailyQuota};
use tracing::warn;
use uuid::Uuid;

/// Result of dispatching one companion message
pub struct SendMessageResult {
    /// The persisted user message
    pub user_message: ChatMessageRecord,
    /// The persisted assistant reply (real or fallback)
    pub assistant_message: ChatMessageRecord,
    /// Message quota after this send
    pub quota: DailyQuota,
}

/// Current message quota for a user
///
/// # Errors
///
/// Returns an error if the store is unreachable.
pub async fn current_quota(database: &Database, user_id: Uuid) -> AppResult<DailyQuota> {
    let tier = ProfileManager::new(database.pool().clone())
        .subscription_tier(user_id)
        .await?;
    let sent_today = sent_today(database, user_id).await?;

    Ok(message_quota(tier, sent_today))
}

/// Send a user message to the companion and persist the exchange
///
/// Business rules:
/// - The daily message gate is enforced before anything is written
/// - The user message is persisted before LLM dispatch (crash-safe)
/// - A provider failure is replaced by a fixed fallback reply; exactly one
///   assistant message is appended either way
///
/// # Errors
///
/// Returns `QuotaExceeded` when the daily gate is closed,
/// `ResourceNotFound` for a missing or foreign session, and database errors
/// on write failure. Provider failures do not surface as errors.
pub async fn send_message(
    database: &Database,
    provider: &ChatProvider,
    user_id: Uuid,
    session_id: &str,
    content: &str,
) -> AppResult<SendMessageResult> {
    let chat_manager = ChatManager::new(database.pool().clone());

    chat_manager
        .get_session(session_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Chat session").with_resource_id(session_id))?;

    let tier = ProfileManager::new(database.pool().clone())
        .subscription_tier(user_id)
        .await?;
    let already_sent = sent_today(database, user_id).await?;

    let quota = message_quota(tier, already_sent);
    if !quota.allows_action() {
        return Err(AppError::quota_exceeded(
            "Daily message limit reached. Upgrade to Zenith for unlimited chats.",
        )
        .with_user_id(user_id)
        .with_details(serde_json::json!({
            "limit": quota.limit,
            "reset_at": quota.reset_at,
        })));
    }

    // Context window comes from history before this message; the new user
    // turn is appended to the request explicitly below.
    let history = chat_manager
        .recent_messages(session_id, user_id, limits::CHAT_HISTORY_TURNS)
        .await?;

    let user_message = chat_manager
        .add_message(session_id, user_id, MessageRole::User, content)
        .await?;

    let personality = SettingsManager::new(database.pool().clone())
        .get_or_create_settings(user_id)
        .await?
        .chat_personality;

    let mut llm_messages = Vec::with_capacity(history.len() + 2);
    llm_messages.push(ChatMessage::system(prompts::companion_system_prompt(
        personality,
    )));
    for record in &history {
        let message = match record.role.as_str() {
            "user" => ChatMessage::user(&record.content),
            "assistant" => ChatMessage::assistant(&record.content),
            _ => continue,
        };
        llm_messages.push(message);
    }
    llm_messages.push(ChatMessage::user(content));

    let request = ChatRequest::new(llm_messages)
        .with_temperature(sampling::CHAT_TEMPERATURE)
        .with_max_tokens(sampling::CHAT_MAX_TOKENS);

    let reply = match provider.complete(&request).await {
        Ok(response) => response.content,
        Err(e) => {
            warn!("Companion LLM call failed, serving fallback reply: {e}");
            error_messages::COMPANION_FALLBACK.to_owned()
        }
    };

    let assistant_message = chat_manager
        .add_message(session_id, user_id, MessageRole::Assistant, &reply)
        .await?;

    Ok(SendMessageResult {
        user_message,
        assistant_message,
        quota: message_quota(tier, already_sent + 1),
    })
}

/// User-authored messages sent today (UTC day window)
async fn sent_today(database: &Database, user_id: Uuid) -> AppResult<u32> {
    let (start, end) = utc_day_bounds(utc_today());
    ChatManager::new(database.pool().clone())
        .count_user_messages_between(user_id, start, end)
        .await
}
