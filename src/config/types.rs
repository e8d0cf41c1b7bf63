// ABOUTME: Shared configuration types for runtime provider selection
// ABOUTME: Defines the LLM provider enum resolved from environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Configuration types shared across modules

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for the companion and lesson generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// OpenRouter - hosted chat-completions gateway (default)
    #[default]
    OpenRouter,
    /// Local LLM provider - `OpenAI`-compatible endpoint (Ollama, vLLM)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "ZENILIENCE_LLM_PROVIDER";

    /// Environment variable for model/version selection
    pub const MODEL_ENV_VAR: &'static str = "ZENILIENCE_LLM_MODEL";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "local" | "ollama" | "vllm" => Self::Local,
            _ => Self::OpenRouter,
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Model override from the environment, if configured
    #[must_use]
    pub fn model_from_env() -> Option<String> {
        env::var(Self::MODEL_ENV_VAR).ok().filter(|m| !m.is_empty())
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::OpenRouter => write!(f, "openrouter"),
            Self::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_type_parsing() {
        assert_eq!(
            LlmProviderType::from_str_or_default("ollama"),
            LlmProviderType::Local
        );
        assert_eq!(
            LlmProviderType::from_str_or_default("openrouter"),
            LlmProviderType::OpenRouter
        );
        assert_eq!(
            LlmProviderType::from_str_or_default(""),
            LlmProviderType::OpenRouter
        );
    }
}
