// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Manages shared resources like the database pool, auth manager, and LLM provider
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Zenilience

//! # Server Resources Module
//!
//! Centralized resource container for dependency injection. Route handlers
//! receive one `Arc<ServerResources>` instead of recreating expensive
//! objects per request.

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;
use crate::llm::ChatProvider;
use std::sync::Arc;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Shared database pool and user storage
    pub database: Arc<Database>,
    /// JWT session manager
    pub auth_manager: Arc<AuthManager>,
    /// LLM provider for the companion and lesson generation
    pub chat_provider: Arc<ChatProvider>,
    /// Server configuration
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(
        database: Database,
        auth_manager: AuthManager,
        chat_provider: ChatProvider,
        config: ServerConfig,
    ) -> Self {
        Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            chat_provider: Arc::new(chat_provider),
            config: Arc::new(config),
        }
    }
}
