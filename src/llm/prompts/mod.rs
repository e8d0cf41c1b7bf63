// ABOUTME: System prompts for LLM interactions loaded at compile time
// ABOUTME: Provides the Zeno companion persona and the lesson generation prompt builder
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! # System Prompts
//!
//! This module provides system prompts for LLM interactions. The companion
//! persona is loaded at compile time from a markdown file for easy
//! maintenance; the lesson generation prompt is assembled from user data.

use crate::models::{ChatPersonality, HealthMetrics, UserProfile, UserStreaks};

/// Zeno wellness companion system prompt
///
/// Contains the persona, product knowledge, and communication style for the
/// AI companion.
pub const ZENO_SYSTEM_PROMPT: &str = include_str!("zeno_system.md");

/// System prompt for the companion, adjusted for the user's chosen voice
#[must_use]
pub fn companion_system_prompt(personality: ChatPersonality) -> String {
    let tone = match personality {
        ChatPersonality::Friendly => {
            "Speak as a warm, encouraging friend. Celebrate small wins and keep \
             the mood light."
        }
        ChatPersonality::Professional => {
            "Speak as a measured wellness professional. Keep a calm, clinical \
             register and avoid exclamation marks."
        }
    };

    format!("{ZENO_SYSTEM_PROMPT}\n\n## Voice for this conversation\n{tone}")
}

/// System prompt for the lesson generation request
#[must_use]
pub const fn lesson_system_prompt() -> &'static str {
    "You are a mental health and wellness expert who creates personalized \
     wellness lessons."
}

/// Build the lesson batch generation prompt from the user's data
///
/// The model is asked for a JSON array so the response can be parsed
/// directly; parse failures fall back to a fixed lesson batch.
#[must_use]
pub fn lesson_batch_prompt(
    profile: Option<&UserProfile>,
    streaks: Option<&UserStreaks>,
    recent_metrics: &[HealthMetrics],
) -> String {
    let name = profile
        .and_then(|p| p.full_name.as_deref())
        .unwrap_or("Unknown");
    let age = profile
        .and_then(|p| p.age)
        .map_or_else(|| "Unknown".to_owned(), |a| a.to_string());
    let occupation = profile
        .and_then(|p| p.occupation.as_deref())
        .unwrap_or("Unknown");
    let interests = profile
        .map(|p| p.interests.join(", "))
        .filter(|i| !i.is_empty())
        .unwrap_or_else(|| "Unknown".to_owned());

    let current_streak = streaks.map_or(0, |s| s.current_streak);
    let total_lessons = streaks.map_or(0, |s| s.total_lessons_completed);

    let latest = recent_metrics.first();
    let stress = latest
        .and_then(|m| m.stress_level)
        .map_or_else(|| "Unknown".to_owned(), |v| v.to_string());
    let mood = latest
        .and_then(|m| m.mood_score)
        .map_or_else(|| "Unknown".to_owned(), |v| v.to_string());

    format!(
        r#"Create 5 personalized wellness lessons for a user with the following data:

User profile:
- Name: {name}
- Age: {age}
- Occupation: {occupation}
- Interests: {interests}

Current metrics:
- Current streak: {current_streak} days
- Lessons completed: {total_lessons}
- Latest stress level: {stress}
- Latest mood: {mood}

Return the 5 lessons as a JSON array with this structure:
[
  {{
    "title": "Lesson title",
    "description": "Short description",
    "lesson_type": "meditation|breathing|cbt|mindfulness|challenge|education",
    "content": {{
      "instruction": "Instruction for the user",
      "steps": ["Step 1", "Step 2", "Step 3"],
      "duration": 5,
      "tips": ["Tip 1", "Tip 2"]
    }},
    "estimated_duration": 5,
    "difficulty_level": "beginner|intermediate|advanced"
  }}
]

Important:
- Personalized to the user's data
- A mix of lesson types
- Practical and actionable
- Adapted to the stress level and mood

Respond with only the JSON array, no further explanation."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_companion_prompt_includes_persona_and_tone() {
        let friendly = companion_system_prompt(ChatPersonality::Friendly);
        assert!(friendly.contains("Zeno"));
        assert!(friendly.contains("encouraging friend"));

        let professional = companion_system_prompt(ChatPersonality::Professional);
        assert!(professional.contains("wellness professional"));
    }

    #[test]
    fn test_lesson_prompt_handles_missing_data() {
        let prompt = lesson_batch_prompt(None, None, &[]);
        assert!(prompt.contains("Name: Unknown"));
        assert!(prompt.contains("Current streak: 0"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_lesson_prompt_embeds_profile() {
        let mut profile = crate::models::UserProfile::new(Uuid::new_v4());
        profile.full_name = Some("Ada".to_owned());
        profile.occupation = Some("Engineer".to_owned());
        profile.interests = vec!["yoga".to_owned(), "reading".to_owned()];

        let prompt = lesson_batch_prompt(Some(&profile), None, &[]);
        assert!(prompt.contains("Name: Ada"));
        assert!(prompt.contains("Occupation: Engineer"));
        assert!(prompt.contains("yoga, reading"));
    }
}
