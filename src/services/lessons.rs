// ABOUTME: Lesson domain service for queue refill and completion accounting
// ABOUTME: Orchestrates quota checks, LLM batch generation, progress, and streak updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

use crate::constants::{limits, sampling};
use crate::database::{
    lessons::NewLesson, Database, LessonManager, ProfileManager, ProgressManager,
};
use crate::errors::{AppError, AppResult};
use crate::gamification::advance_streak;
use crate::llm::{prompts, ChatMessage, ChatProvider, ChatRequest, LlmProvider};
use crate::models::{
    DifficultyLevel, Lesson, LessonContent, LessonType, UserProgress, UserStreaks,
};
use crate::rate_limiting::{lesson_quota, utc_today, DailyQuota};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a successful lesson completion
#[derive(Debug)]
pub struct CompletionResult {
    /// The completed lesson
    pub lesson: Lesson,
    /// Updated streak record
    pub streaks: UserStreaks,
    /// Updated progress row for today
    pub progress: UserProgress,
    /// Lesson quota after this completion
    pub quota: DailyQuota,
}

/// Shape of one lesson in the model's JSON reply
#[derive(Debug, Deserialize)]
struct GeneratedLesson {
    title: String,
    #[serde(default)]
    description: Option<String>,
    lesson_type: String,
    content: LessonContent,
    #[serde(default)]
    estimated_duration: Option<u32>,
    #[serde(default)]
    difficulty_level: Option<String>,
}

/// Current lesson quota for a user
///
/// # Errors
///
/// Returns an error if the store is unreachable.
pub async fn current_quota(database: &Database, user_id: Uuid) -> AppResult<DailyQuota> {
    let tier = ProfileManager::new(database.pool().clone())
        .subscription_tier(user_id)
        .await?;
    let completed_today = ProgressManager::new(database.pool().clone())
        .completed_sessions_on(user_id, utc_today())
        .await?;

    Ok(lesson_quota(tier, completed_today))
}

/// Complete a lesson and apply the streak and progress accounting
///
/// Business rules:
/// - The daily lesson gate is enforced before anything is written
/// - The lesson must exist and belong to the user
/// - A lesson that is already completed is returned unchanged without
///   re-counting
///
/// # Errors
///
/// Returns `QuotaExceeded` when the daily gate is closed, `ResourceNotFound`
/// for a missing or foreign lesson, and database errors on write failure.
pub async fn complete_lesson(
    database: &Database,
    user_id: Uuid,
    lesson_id: Uuid,
) -> AppResult<CompletionResult> {
    let lesson_manager = LessonManager::new(database.pool().clone());
    let progress_manager = ProgressManager::new(database.pool().clone());
    let profile_manager = ProfileManager::new(database.pool().clone());

    let today = utc_today();
    let tier = profile_manager.subscription_tier(user_id).await?;
    let completed_today = progress_manager
        .completed_sessions_on(user_id, today)
        .await?;

    let quota = lesson_quota(tier, completed_today);
    if !quota.allows_action() {
        return Err(AppError::quota_exceeded("Daily lesson limit reached")
            .with_user_id(user_id)
            .with_details(serde_json::json!({
                "limit": quota.limit,
                "reset_at": quota.reset_at,
            })));
    }

    let newly_completed = lesson_manager
        .mark_completed(lesson_id, user_id, chrono::Utc::now())
        .await?;

    let lesson = lesson_manager
        .get_lesson(lesson_id, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Lesson").with_resource_id(lesson_id.to_string()))?;

    if !newly_completed {
        // Already completed earlier; return current state without re-counting
        let streaks = progress_manager.get_or_create_streaks(user_id).await?;
        let progress = progress_manager
            .get_progress(user_id, today)
            .await?
            .unwrap_or_else(|| empty_progress(user_id, today));
        return Ok(CompletionResult {
            lesson,
            streaks,
            progress,
            quota: lesson_quota(tier, completed_today),
        });
    }

    let progress = progress_manager.record_completion(user_id, today).await?;

    let streaks = progress_manager.get_or_create_streaks(user_id).await?;
    let streaks = advance_streak(&streaks, today);
    progress_manager.save_streaks(&streaks).await?;

    info!(
        "Lesson {} completed by {} (streak {}, total {})",
        lesson_id, user_id, streaks.current_streak, streaks.total_lessons_completed
    );

    Ok(CompletionResult {
        lesson,
        streaks,
        progress,
        quota: lesson_quota(tier, completed_today + 1),
    })
}

/// Top up the user's lesson queue when it runs low
///
/// Generates a batch of five lessons whenever fewer than two incomplete
/// lessons remain. Returns true when a batch was generated. A model reply
/// that cannot be parsed, or a failed provider call, falls back to a fixed
/// batch so the queue never stays empty.
///
/// # Errors
///
/// Returns an error if the store is unreachable.
pub async fn ensure_lesson_queue(
    database: &Database,
    provider: &ChatProvider,
    user_id: Uuid,
) -> AppResult<bool> {
    let lesson_manager = LessonManager::new(database.pool().clone());

    let incomplete = lesson_manager.incomplete_count(user_id).await?;
    if incomplete >= limits::LESSON_QUEUE_REFILL_THRESHOLD {
        return Ok(false);
    }

    info!("Lesson queue low for {} ({} left), generating", user_id, incomplete);

    let profile_manager = ProfileManager::new(database.pool().clone());
    let progress_manager = ProgressManager::new(database.pool().clone());

    let profile = profile_manager.get_profile(user_id).await?;
    let streaks = progress_manager.get_streaks(user_id).await?;
    let metrics = profile_manager.recent_health_metrics(user_id, 5).await?;

    let prompt = prompts::lesson_batch_prompt(profile.as_ref(), streaks.as_ref(), &metrics);
    let request = ChatRequest::new(vec![
        ChatMessage::system(prompts::lesson_system_prompt()),
        ChatMessage::user(prompt),
    ])
    .with_temperature(sampling::LESSON_TEMPERATURE)
    .with_max_tokens(sampling::LESSON_MAX_TOKENS);

    let batch = match provider.complete(&request).await {
        Ok(response) => parse_lesson_batch(&response.content).unwrap_or_else(|| {
            warn!("Generated lesson batch was not valid JSON, using fallback set");
            fallback_lessons()
        }),
        Err(e) => {
            warn!("Lesson generation call failed ({e}), using fallback set");
            fallback_lessons()
        }
    };

    lesson_manager.insert_batch(user_id, &batch).await?;
    Ok(true)
}

/// Zeroed progress row for days with no counted completions yet
fn empty_progress(user_id: Uuid, date: chrono::NaiveDate) -> UserProgress {
    UserProgress {
        id: Uuid::new_v4(),
        user_id,
        date,
        completed_sessions: 0,
        zen_garden_points: 0,
        stress_level: None,
        mood_score: None,
        created_at: chrono::Utc::now(),
    }
}

/// Parse the model's JSON reply into a lesson batch
///
/// Tolerates surrounding prose and markdown code fences by slicing from the
/// first `[` to the last `]`.
fn parse_lesson_batch(reply: &str) -> Option<Vec<NewLesson>> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end <= start {
        return None;
    }

    let generated: Vec<GeneratedLesson> = serde_json::from_str(&reply[start..=end]).ok()?;
    if generated.is_empty() {
        return None;
    }

    Some(
        generated
            .into_iter()
            .map(|g| NewLesson {
                estimated_duration: g.estimated_duration.unwrap_or(g.content.duration),
                title: g.title,
                description: g.description,
                lesson_type: LessonType::from_str_or_default(&g.lesson_type),
                difficulty_level: g
                    .difficulty_level
                    .as_deref()
                    .map(DifficultyLevel::from_str_or_default)
                    .unwrap_or_default(),
                content: g.content,
            })
            .collect(),
    )
}

/// Fixed lesson batch stored when generation fails
fn fallback_lessons() -> Vec<NewLesson> {
    vec![
        NewLesson {
            title: "Morning Meditation".to_owned(),
            description: Some("Start your day with a calming meditation.".to_owned()),
            lesson_type: LessonType::Meditation,
            content: LessonContent {
                instruction: "Find a quiet spot and sit comfortably.".to_owned(),
                steps: vec![
                    "Close your eyes".to_owned(),
                    "Breathe in and out deeply".to_owned(),
                    "Focus on your breath".to_owned(),
                ],
                duration: 5,
                tips: vec![
                    "Don't worry if your thoughts wander".to_owned(),
                    "Gently return to your breath".to_owned(),
                ],
            },
            estimated_duration: 5,
            difficulty_level: DifficultyLevel::Beginner,
        },
        NewLesson {
            title: "4-7-8 Breathing".to_owned(),
            description: Some("A simple breathing technique for relaxation.".to_owned()),
            lesson_type: LessonType::Breathing,
            content: LessonContent {
                instruction: "Breathe following the 4-7-8 rhythm.".to_owned(),
                steps: vec![
                    "Inhale for 4 seconds".to_owned(),
                    "Hold for 7 seconds".to_owned(),
                    "Exhale for 8 seconds".to_owned(),
                ],
                duration: 5,
                tips: vec![
                    "Repeat 4-5 cycles".to_owned(),
                    "Focus only on the counting".to_owned(),
                ],
            },
            estimated_duration: 5,
            difficulty_level: DifficultyLevel::Beginner,
        },
        NewLesson {
            title: "Thought Check".to_owned(),
            description: Some("Examine and question your thoughts.".to_owned()),
            lesson_type: LessonType::Cbt,
            content: LessonContent {
                instruction: "Identify one troubling thought.".to_owned(),
                steps: vec![
                    "Write the thought down".to_owned(),
                    "Ask: is it really true?".to_owned(),
                    "Find a more balanced perspective".to_owned(),
                ],
                duration: 10,
                tips: vec![
                    "Be patient with yourself".to_owned(),
                    "It is normal for this to take practice".to_owned(),
                ],
            },
            estimated_duration: 10,
            difficulty_level: DifficultyLevel::Intermediate,
        },
        NewLesson {
            title: "Mindful Walk".to_owned(),
            description: Some("Connect with the present moment while walking.".to_owned()),
            lesson_type: LessonType::Mindfulness,
            content: LessonContent {
                instruction: "Walk slowly and deliberately.".to_owned(),
                steps: vec![
                    "Feel your feet on the ground".to_owned(),
                    "Notice the sounds around you".to_owned(),
                    "Observe your surroundings".to_owned(),
                ],
                duration: 15,
                tips: vec![
                    "Have no destination".to_owned(),
                    "Simply be present".to_owned(),
                ],
            },
            estimated_duration: 15,
            difficulty_level: DifficultyLevel::Beginner,
        },
        NewLesson {
            title: "Digital Detox Challenge".to_owned(),
            description: Some("Reduce your screen time for better wellbeing.".to_owned()),
            lesson_type: LessonType::Challenge,
            content: LessonContent {
                instruction: "Avoid all screens for the next 2 hours.".to_owned(),
                steps: vec![
                    "Silence your phone".to_owned(),
                    "Do something else".to_owned(),
                    "Reflect on the experience".to_owned(),
                ],
                duration: 120,
                tips: vec![
                    "Prepare an alternative activity".to_owned(),
                    "Let others know you are offline".to_owned(),
                ],
            },
            estimated_duration: 120,
            difficulty_level: DifficultyLevel::Intermediate,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lesson_batch_plain_json() {
        let reply = r#"[{"title":"T","lesson_type":"breathing","content":{"instruction":"I","steps":["a"],"duration":5,"tips":[]},"estimated_duration":5,"difficulty_level":"beginner"}]"#;
        let batch = parse_lesson_batch(reply).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].lesson_type, LessonType::Breathing);
    }

    #[test]
    fn test_parse_lesson_batch_with_code_fence() {
        let reply = "Here you go:\n```json\n[{\"title\":\"T\",\"lesson_type\":\"cbt\",\"content\":{\"instruction\":\"I\",\"steps\":[],\"duration\":10,\"tips\":[]}}]\n```";
        let batch = parse_lesson_batch(reply).unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].lesson_type, LessonType::Cbt);
        // Missing estimated_duration falls back to the content duration
        assert_eq!(batch[0].estimated_duration, 10);
    }

    #[test]
    fn test_parse_lesson_batch_rejects_garbage() {
        assert!(parse_lesson_batch("no json here").is_none());
        assert!(parse_lesson_batch("[]").is_none());
        assert!(parse_lesson_batch("[{\"broken\": true}]").is_none());
    }

    #[test]
    fn test_fallback_batch_is_full_size() {
        let batch = fallback_lessons();
        assert_eq!(batch.len(), limits::LESSON_BATCH_SIZE);
        assert!(batch.iter().all(|l| !l.content.steps.is_empty()));
    }
}
