// ABOUTME: Core data models and types for the Zenilience wellness API
// ABOUTME: Defines User, Lesson, UserStreaks and other fundamental data structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! # Data Models
//!
//! This module contains the core data structures used throughout the Zenilience
//! server. They mirror the rows held in the SQLite store and are serialized
//! verbatim onto the REST surface.
//!
//! ## Core Models
//!
//! - `User`: account identity and credentials
//! - `UserProfile`: display attributes and subscription tier
//! - `UserStreaks`: streak counters and Zen Garden score
//! - `UserProgress`: per-day completion counters
//! - `Lesson`: generated wellness content with queue position
//! - `UserSettings`: companion personality and UI preferences

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subscription tier gating daily usage quotas
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Free tier with daily limits (1 lesson, 5 chat messages)
    #[default]
    Explorer,
    /// Premium tier with unlimited access
    Zenith,
}

impl SubscriptionTier {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Zenith => "zenith",
        }
    }

    /// Parse from stored text, falling back to the free tier
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "zenith" => Self::Zenith,
            _ => Self::Explorer,
        }
    }
}

impl Display for SubscriptionTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// User email address (used for identification)
    pub email: String,
    /// Display name
    pub display_name: Option<String>,
    /// Hashed password for authentication
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
    /// Last time user accessed the system
    pub last_active: DateTime<Utc>,
    /// Whether the user account is active
    pub is_active: bool,
}

impl User {
    /// Create a new user with default settings
    #[must_use]
    pub fn new(email: String, password_hash: String, display_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            password_hash,
            created_at: now,
            last_active: now,
            is_active: true,
        }
    }
}

/// Profile attributes shown on the dashboard and fed to lesson generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Owning user id
    pub user_id: Uuid,
    /// Full display name
    pub full_name: Option<String>,
    /// Age in years
    pub age: Option<u32>,
    /// Self-described gender
    pub gender: Option<String>,
    /// Occupation, used to personalize generated lessons
    pub occupation: Option<String>,
    /// Interests, used to personalize generated lessons
    pub interests: Vec<String>,
    /// Whether the onboarding flow has been completed
    pub onboarding_completed: bool,
    /// Subscription tier gating daily quotas
    pub subscription_type: SubscriptionTier,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// Last profile edit
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Default profile created at registration time
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            full_name: None,
            age: None,
            gender: None,
            occupation: None,
            interests: Vec::new(),
            onboarding_completed: false,
            subscription_type: SubscriptionTier::Explorer,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Streak counters and Zen Garden score, one row per user
///
/// Invariants maintained by every update:
/// - `longest_streak >= current_streak`
/// - `zen_garden_points` and `total_lessons_completed` never decrease
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStreaks {
    /// Owning user id
    pub user_id: Uuid,
    /// Consecutive qualifying days of activity
    pub current_streak: u32,
    /// Highest streak ever reached
    pub longest_streak: u32,
    /// Accumulated gamification score
    pub zen_garden_points: u32,
    /// Lifetime completed lesson count
    pub total_lessons_completed: u32,
    /// Last UTC calendar date with a counted completion
    pub last_activity_date: Option<NaiveDate>,
    /// Whether the one-time streak freeze has been consumed
    pub streak_freeze_used: bool,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// Last update
    pub updated_at: DateTime<Utc>,
}

impl UserStreaks {
    /// Zeroed streak record, created lazily on first dashboard visit
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            zen_garden_points: 0,
            total_lessons_completed: 0,
            last_activity_date: None,
            streak_freeze_used: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-day completion counters, one row per `(user_id, date)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgress {
    /// Row id
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
    /// UTC calendar date this row counts for
    pub date: NaiveDate,
    /// Sessions (lessons + recommendations) completed on this date
    pub completed_sessions: u32,
    /// Points earned on this date
    pub zen_garden_points: u32,
    /// Optional stress reading recorded with a completion
    pub stress_level: Option<u8>,
    /// Optional mood reading recorded with a completion
    pub mood_score: Option<u8>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Category of a generated lesson
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Meditation,
    Breathing,
    Cbt,
    Mindfulness,
    Challenge,
    Education,
}

impl LessonType {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Meditation => "meditation",
            Self::Breathing => "breathing",
            Self::Cbt => "cbt",
            Self::Mindfulness => "mindfulness",
            Self::Challenge => "challenge",
            Self::Education => "education",
        }
    }

    /// Parse from stored text, falling back to mindfulness
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "meditation" => Self::Meditation,
            "breathing" => Self::Breathing,
            "cbt" => Self::Cbt,
            "challenge" => Self::Challenge,
            "education" => Self::Education,
            _ => Self::Mindfulness,
        }
    }
}

/// Difficulty of a generated lesson
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from stored text, falling back to beginner
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

/// Structured body of a lesson: what to do, step by step
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonContent {
    /// Opening instruction for the user
    pub instruction: String,
    /// Ordered steps to follow
    pub steps: Vec<String>,
    /// Suggested duration in minutes
    pub duration: u32,
    /// Practical tips
    #[serde(default)]
    pub tips: Vec<String>,
}

/// A generated wellness lesson in the user's queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson id
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
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
    /// Ordering within the user's incomplete queue
    pub position_in_queue: u32,
    /// Whether the user has completed this lesson
    pub is_completed: bool,
    /// When the lesson was completed
    pub completed_at: Option<DateTime<Utc>>,
    /// When the lesson was generated
    pub created_at: DateTime<Utc>,
}

/// Companion voice selected by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChatPersonality {
    /// Warm, encouraging tone
    #[default]
    Friendly,
    /// Measured, clinical tone
    Professional,
}

impl ChatPersonality {
    /// String form stored in the database
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
        }
    }

    /// Parse from stored text, falling back to friendly
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "professional" => Self::Professional,
            _ => Self::Friendly,
        }
    }
}

/// Per-user preferences, one row per user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Owning user id
    pub user_id: Uuid,
    /// Companion voice
    pub chat_personality: ChatPersonality,
    /// Daily lesson quota stored alongside preferences (informational;
    /// the enforced quota comes from the subscription tier)
    pub daily_lesson_limit: u32,
    /// Whether reminder notifications are enabled
    pub notifications_enabled: bool,
    /// UI theme ("light" or "dark")
    pub theme: String,
    /// When the row was created
    pub created_at: DateTime<Utc>,
    /// Last settings edit
    pub updated_at: DateTime<Utc>,
}

impl UserSettings {
    /// Default settings created lazily on first dashboard visit
    #[must_use]
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            chat_personality: ChatPersonality::Friendly,
            daily_lesson_limit: crate::constants::limits::EXPLORER_DAILY_LESSON_LIMIT,
            notifications_enabled: true,
            theme: "light".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A wellness goal declared during onboarding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGoal {
    /// Row id
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
    /// Goal category (e.g. "reduce_stress", "better_sleep")
    pub goal_type: String,
    /// Free-text elaboration
    pub goal_description: Option<String>,
    /// Whether the goal is currently pursued
    pub is_active: bool,
    /// When the goal was created
    pub created_at: DateTime<Utc>,
}

/// One suggested practice per user per day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecommendation {
    /// Row id
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
    /// UTC calendar date this recommendation is for
    pub date: NaiveDate,
    /// Practice category
    pub recommendation_type: String,
    /// Title shown on the dashboard
    pub title: String,
    /// Practice description
    pub description: String,
    /// Whether the user completed it
    pub completed: bool,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Self-reported wellbeing readings, insert-only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthMetrics {
    /// Row id
    pub id: Uuid,
    /// Owning user id
    pub user_id: Uuid,
    /// Stress level, 1-10
    pub stress_level: Option<u8>,
    /// Mood score, 1-10
    pub mood_score: Option<u8>,
    /// Sleep quality, 1-10
    pub sleep_quality: Option<u8>,
    /// Focus level, 1-10
    pub focus_level: Option<u8>,
    /// Anxiety level, 1-10
    pub anxiety_level: Option<u8>,
    /// Energy level, 1-10
    pub energy_level: Option<u8>,
    /// When the readings were taken
    pub recorded_at: DateTime<Utc>,
    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// An authenticated user session handed back by login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    /// Authenticated user id
    pub user_id: Uuid,
    /// Signed JWT bearer token
    pub jwt_token: String,
    /// Token expiry
    pub expires_at: DateTime<Utc>,
    /// Account email
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_tier_round_trip() {
        assert_eq!(
            SubscriptionTier::from_str_or_default("zenith"),
            SubscriptionTier::Zenith
        );
        assert_eq!(
            SubscriptionTier::from_str_or_default("EXPLORER"),
            SubscriptionTier::Explorer
        );
        // Unknown tiers degrade to the free tier rather than failing
        assert_eq!(
            SubscriptionTier::from_str_or_default("platinum"),
            SubscriptionTier::Explorer
        );
    }

    #[test]
    fn test_new_user_defaults() {
        let user = User::new("a@b.co".into(), "hash".into(), None);
        assert!(user.is_active);
        assert_eq!(user.created_at, user.last_active);
    }

    #[test]
    fn test_new_streaks_zeroed() {
        let streaks = UserStreaks::new(Uuid::new_v4());
        assert_eq!(streaks.current_streak, 0);
        assert_eq!(streaks.longest_streak, 0);
        assert!(streaks.last_activity_date.is_none());
        assert!(!streaks.streak_freeze_used);
    }

    #[test]
    fn test_lesson_type_parse() {
        assert_eq!(LessonType::from_str_or_default("cbt"), LessonType::Cbt);
        assert_eq!(
            LessonType::from_str_or_default("unknown"),
            LessonType::Mindfulness
        );
    }
}
