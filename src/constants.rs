// ABOUTME: System-wide constants and configuration values for the Zenilience API
// ABOUTME: Contains tier quotas, gamification values, and system configuration defaults
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Application constants and environment-based configuration values.

/// Usage limits and session lifetimes
pub mod limits {
    /// Daily lesson quota for the free Explorer tier
    pub const EXPLORER_DAILY_LESSON_LIMIT: u32 = 1;

    /// Daily chat-message quota for the free Explorer tier
    pub const EXPLORER_DAILY_MESSAGE_LIMIT: u32 = 5;

    /// Generate a new lesson batch when the incomplete queue drops below this
    pub const LESSON_QUEUE_REFILL_THRESHOLD: i64 = 2;

    /// Number of lessons produced per generation batch
    pub const LESSON_BATCH_SIZE: usize = 5;

    /// Conversation turns passed to the LLM for context
    pub const CHAT_HISTORY_TURNS: i64 = 10;

    /// Default JWT session lifetime in hours
    pub const DEFAULT_SESSION_HOURS: i64 = 24;

    /// Incomplete lessons returned on the dashboard
    pub const DASHBOARD_LESSON_LIMIT: i64 = 5;

    /// Chat sessions returned on the dashboard
    pub const DASHBOARD_SESSION_LIMIT: i64 = 10;
}

/// Zen Garden gamification values
pub mod gamification {
    /// Points awarded per completed lesson or recommendation
    pub const POINTS_PER_LESSON: u32 = 10;

    /// Total-lesson thresholds at which a new flower blooms in the garden
    pub const FLOWER_MILESTONES: &[u32] = &[1, 3, 5, 7, 9, 12, 15, 18, 21, 25, 30];
}

/// LLM sampling defaults per request kind
pub mod sampling {
    /// Temperature for companion chat replies
    pub const CHAT_TEMPERATURE: f32 = 0.7;

    /// Max tokens for companion chat replies
    pub const CHAT_MAX_TOKENS: u32 = 500;

    /// Temperature for lesson batch generation
    pub const LESSON_TEMPERATURE: f32 = 0.8;

    /// Max tokens for lesson batch generation
    pub const LESSON_MAX_TOKENS: u32 = 2000;
}

/// Service identity strings
pub mod service_names {
    /// Canonical service name used in logs and JWT audience claims
    pub const ZENILIENCE_SERVER: &str = "zenilience-server";
}

/// Demo identity that bypasses the database entirely
pub mod demo {
    /// Demo account email accepted by the login handler
    pub const DEMO_EMAIL: &str = "demo@zenilience.app";

    /// Demo account password accepted by the login handler
    pub const DEMO_PASSWORD: &str = "demo123456";

    /// Fixed user id for the demo identity
    pub const DEMO_USER_ID: &str = "00000000-0000-4000-8000-00000000d320";
}

/// User-facing error message strings
pub mod error_messages {
    /// Registration rejected: email fails format validation
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email address format";

    /// Registration rejected: password below minimum strength
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";

    /// Registration rejected: email already registered
    pub const USER_ALREADY_EXISTS: &str = "A user with this email already exists";

    /// Login rejected: bad email or password
    pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

    /// Fixed assistant reply used when the LLM call fails
    pub const COMPANION_FALLBACK: &str =
        "I'm having a little trouble connecting right now. Take a deep breath, \
         and let's try again in a moment.";
}

/// Environment variable names shared across modules
pub mod env_config {
    /// Database connection string
    pub const DATABASE_URL: &str = "DATABASE_URL";

    /// HTTP listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";

    /// JWT signing secret
    pub const JWT_SECRET: &str = "JWT_SECRET";

    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default values used when the environment leaves a knob unset
pub mod defaults {
    /// Default HTTP listen port
    pub const HTTP_PORT: u16 = 8081;

    /// Default SQLite database location
    pub const DATABASE_URL: &str = "sqlite:./data/zenilience.db";
}
