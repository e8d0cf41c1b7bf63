// ABOUTME: Unified LLM provider selector for runtime provider switching
// ABOUTME: Abstracts over OpenRouter and local providers based on environment configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! # LLM Provider Selector
//!
//! This module provides a unified interface for LLM providers that can be
//! configured at runtime via environment variables.
//!
//! ## Configuration
//!
//! Set `ZENILIENCE_LLM_PROVIDER`:
//! - `openrouter` (default): hosted gateway (requires `OPENROUTER_API_KEY`)
//! - `local`/`ollama`/`vllm`: OpenAI-compatible local endpoint

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{
    ChatRequest, ChatResponse, LlmProvider, OpenAiCompatibleProvider, OpenRouterProvider,
};
use crate::config::LlmProviderType;
use crate::errors::AppError;

/// Unified chat provider wrapping OpenRouter or a local endpoint
///
/// This enum provides a consistent interface regardless of which underlying
/// provider is configured.
pub enum ChatProvider {
    /// OpenRouter hosted gateway
    OpenRouter(OpenRouterProvider),
    /// Local LLM via an `OpenAI`-compatible API (Ollama, vLLM)
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create a provider from environment configuration
    ///
    /// Reads `ZENILIENCE_LLM_PROVIDER` to determine which provider to use.
    ///
    /// # Errors
    ///
    /// Returns an error if the required API key environment variable is
    /// missing for the selected provider.
    pub fn from_env() -> Result<Self, AppError> {
        let provider_type = LlmProviderType::from_env();

        info!(
            "Initializing LLM provider: {} (set {} to change)",
            provider_type,
            LlmProviderType::ENV_VAR
        );

        let provider = match provider_type {
            LlmProviderType::OpenRouter => Self::openrouter()?,
            LlmProviderType::Local => Self::local(),
        };

        debug!(
            "Provider {} initialized with model: {}",
            provider.display_name(),
            provider.default_model()
        );

        Ok(provider)
    }

    /// Create an OpenRouter provider explicitly
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENROUTER_API_KEY` is not set.
    pub fn openrouter() -> Result<Self, AppError> {
        Ok(Self::OpenRouter(OpenRouterProvider::from_env()?))
    }

    /// Create a local LLM provider explicitly
    #[must_use]
    pub fn local() -> Self {
        Self::Local(OpenAiCompatibleProvider::from_env())
    }

    /// Get the provider type
    #[must_use]
    pub const fn provider_type(&self) -> LlmProviderType {
        match self {
            Self::OpenRouter(_) => LlmProviderType::OpenRouter,
            Self::Local(_) => LlmProviderType::Local,
        }
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenRouter(_) => f.debug_tuple("ChatProvider::OpenRouter").finish(),
            Self::Local(_) => f.debug_tuple("ChatProvider::Local").finish(),
        }
    }
}

// Delegate LlmProvider trait methods to the underlying provider
#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenRouter(p) => p.name(),
            Self::Local(p) => p.name(),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::OpenRouter(p) => p.display_name(),
            Self::Local(p) => p.display_name(),
        }
    }

    fn default_model(&self) -> &str {
        match self {
            Self::OpenRouter(p) => p.default_model(),
            Self::Local(p) => p.default_model(),
        }
    }

    fn available_models(&self) -> &'static [&'static str] {
        match self {
            Self::OpenRouter(p) => p.available_models(),
            Self::Local(p) => p.available_models(),
        }
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        match self {
            Self::OpenRouter(p) => p.complete(request).await,
            Self::Local(p) => p.complete(request).await,
        }
    }

    async fn health_check(&self) -> Result<bool, AppError> {
        match self {
            Self::OpenRouter(p) => p.health_check().await,
            Self::Local(p) => p.health_check().await,
        }
    }
}
