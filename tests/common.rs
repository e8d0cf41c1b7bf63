// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, resource, and user creation helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Zenilience
#![allow(dead_code)]

//! Shared test utilities for the Zenilience server
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests. The LLM provider points at an unreachable local
//! endpoint so every generation call exercises the fallback paths without
//! network access.

use anyhow::Result;
use std::sync::{Arc, Once};
use tempfile::NamedTempFile;
use zenilience::{
    auth::AuthManager,
    config::environment::{
        AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig,
    },
    database::{Database, ProfileManager},
    llm::{ChatProvider, OpenAiCompatibleConfig, OpenAiCompatibleProvider},
    models::{SubscriptionTier, User, UserProfile},
    resources::ServerResources,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .init();
    });
}

/// Server resources plus the temp file backing the test database
pub struct TestServer {
    pub resources: Arc<ServerResources>,
    _db_file: NamedTempFile,
}

/// Standard test database setup backed by a temporary file
pub async fn create_test_database() -> Result<(Database, NamedTempFile)> {
    init_test_logging();
    let db_file = NamedTempFile::new()?;
    let database_url = format!("sqlite:{}", db_file.path().display());
    let database = Database::new(&database_url).await?;
    Ok((database, db_file))
}

/// Create test authentication manager
pub fn create_test_auth_manager() -> AuthManager {
    AuthManager::new(b"zenilience-test-secret", 24)
}

/// Test server configuration that never reads the environment
pub fn create_test_config() -> ServerConfig {
    ServerConfig {
        http_port: 0,
        environment: Environment::Testing,
        log_level: LogLevel::Warn,
        database: DatabaseConfig {
            url: DatabaseUrl::Memory,
        },
        auth: AuthConfig {
            jwt_secret: "zenilience-test-secret".to_owned(),
            token_expiry_hours: 24,
        },
    }
}

/// LLM provider aimed at a port nothing listens on
///
/// Connection attempts fail immediately, which drives the fallback reply and
/// fallback lesson batch deterministically.
pub fn create_unreachable_provider() -> ChatProvider {
    let mut config = OpenAiCompatibleConfig::ollama("test-model");
    config.base_url = "http://127.0.0.1:1/v1".to_owned();
    ChatProvider::Local(OpenAiCompatibleProvider::new(config))
}

/// Full resource container for route tests
pub async fn create_test_server() -> Result<TestServer> {
    let (database, db_file) = create_test_database().await?;
    let resources = Arc::new(ServerResources::new(
        database,
        create_test_auth_manager(),
        create_unreachable_provider(),
        create_test_config(),
    ));
    Ok(TestServer {
        resources,
        _db_file: db_file,
    })
}

/// Create a user on the given tier and mint a bearer token for them
pub async fn create_test_user(
    resources: &ServerResources,
    email: &str,
    tier: SubscriptionTier,
) -> Result<(User, String)> {
    // Minimum bcrypt cost keeps test setup fast
    let password_hash = bcrypt::hash("password123", 4)?;
    let user = User::new(email.to_owned(), password_hash, None);
    resources.database.create_user(&user).await?;

    let mut profile = UserProfile::new(user.id);
    profile.subscription_type = tier;
    ProfileManager::new(resources.database.pool().clone())
        .upsert_profile(&profile)
        .await?;

    let token = resources.auth_manager.generate_token(&user)?;
    Ok((user, format!("Bearer {token}")))
}
