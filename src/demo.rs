// ABOUTME: Fixed in-memory sample data for the product demo identity
// ABOUTME: The demo login bypasses the store and serves these rows directly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! # Demo Mode
//!
//! A hard-coded identity for product demonstrations. Logging in with the
//! demo credentials short-circuits the database: the dashboard serves the
//! fixed rows below instead of fetching anything. This exists purely for
//! demos and is not reachable from normal registration.

use crate::constants::demo::DEMO_USER_ID;
use crate::database::chat::ChatSessionRecord;
use crate::models::{
    DifficultyLevel, Lesson, LessonContent, LessonType, SubscriptionTier, UserProfile,
    UserSettings, UserStreaks,
};
use chrono::{Duration, Utc};
use uuid::Uuid;

/// The fixed demo user id
#[must_use]
pub fn demo_user_id() -> Uuid {
    // The constant is a valid UUID literal
    Uuid::parse_str(DEMO_USER_ID).unwrap_or_default()
}

/// Whether a user id belongs to the demo identity
#[must_use]
pub fn is_demo_user(user_id: Uuid) -> bool {
    user_id == demo_user_id()
}

/// Sample profile shown on the demo dashboard
#[must_use]
pub fn sample_profile() -> UserProfile {
    let mut profile = UserProfile::new(demo_user_id());
    profile.full_name = Some("Demo Explorer".to_owned());
    profile.age = Some(29);
    profile.occupation = Some("Product Designer".to_owned());
    profile.interests = vec!["meditation".to_owned(), "hiking".to_owned()];
    profile.onboarding_completed = true;
    profile.subscription_type = SubscriptionTier::Zenith;
    profile
}

/// Sample settings shown on the demo dashboard
#[must_use]
pub fn sample_settings() -> UserSettings {
    UserSettings::new(demo_user_id())
}

/// Sample streak record with a lively garden
#[must_use]
pub fn sample_streaks() -> UserStreaks {
    let mut streaks = UserStreaks::new(demo_user_id());
    streaks.current_streak = 6;
    streaks.longest_streak = 14;
    streaks.zen_garden_points = 230;
    streaks.total_lessons_completed = 23;
    streaks.last_activity_date = Some(Utc::now().date_naive());
    streaks
}

/// Sample incomplete lessons in queue order
#[must_use]
pub fn sample_lessons() -> Vec<Lesson> {
    let user_id = demo_user_id();
    let now = Utc::now();

    vec![
        Lesson {
            id: Uuid::new_v4(),
            user_id,
            title: "Evening Wind-Down".to_owned(),
            description: Some("Release the day's tension before sleep.".to_owned()),
            lesson_type: LessonType::Meditation,
            content: LessonContent {
                instruction: "Lie down somewhere comfortable and dim the lights.".to_owned(),
                steps: vec![
                    "Scan your body from head to toe".to_owned(),
                    "Relax each muscle group in turn".to_owned(),
                    "Let your breath slow naturally".to_owned(),
                ],
                duration: 10,
                tips: vec!["Put your phone in another room".to_owned()],
            },
            estimated_duration: 10,
            difficulty_level: DifficultyLevel::Beginner,
            position_in_queue: 1,
            is_completed: false,
            completed_at: None,
            created_at: now - Duration::hours(2),
        },
        Lesson {
            id: Uuid::new_v4(),
            user_id,
            title: "Reframe a Worry".to_owned(),
            description: Some("Turn one anxious thought into a balanced one.".to_owned()),
            lesson_type: LessonType::Cbt,
            content: LessonContent {
                instruction: "Pick a worry that keeps returning.".to_owned(),
                steps: vec![
                    "Write the worry down word for word".to_owned(),
                    "List the evidence for and against it".to_owned(),
                    "Write a fairer version of the thought".to_owned(),
                ],
                duration: 10,
                tips: vec!["Short sentences work best".to_owned()],
            },
            estimated_duration: 10,
            difficulty_level: DifficultyLevel::Intermediate,
            position_in_queue: 2,
            is_completed: false,
            completed_at: None,
            created_at: now - Duration::hours(2),
        },
    ]
}

/// Sample chat sessions shown on the demo dashboard
#[must_use]
pub fn sample_chat_sessions() -> Vec<ChatSessionRecord> {
    let now = Utc::now();
    vec![ChatSessionRecord {
        id: Uuid::new_v4().to_string(),
        user_id: DEMO_USER_ID.to_owned(),
        title: "Feeling overwhelmed at work".to_owned(),
        message_count: 6,
        last_message_at: (now - Duration::hours(20)).to_rfc3339(),
        created_at: (now - Duration::days(2)).to_rfc3339(),
        updated_at: (now - Duration::hours(20)).to_rfc3339(),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_user_id_is_stable() {
        assert_eq!(demo_user_id().to_string(), DEMO_USER_ID);
        assert!(is_demo_user(demo_user_id()));
        assert!(!is_demo_user(Uuid::new_v4()));
    }

    #[test]
    fn test_sample_streaks_hold_invariants() {
        let streaks = sample_streaks();
        assert!(streaks.longest_streak >= streaks.current_streak);
    }
}
