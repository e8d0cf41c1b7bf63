// ABOUTME: OpenRouter LLM provider implementation over the OpenAI-compatible API
// ABOUTME: Routes chat completions to hosted models (DeepSeek, Llama) via openrouter.ai
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! # OpenRouter Provider
//!
//! Implementation of the `LlmProvider` trait for OpenRouter's hosted
//! chat-completions gateway.
//!
//! ## Configuration
//!
//! Set the `OPENROUTER_API_KEY` environment variable with your API key from
//! <https://openrouter.ai/keys>.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument, warn};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmProvider, TokenUsage};
use crate::errors::AppError;

/// Environment variable for the OpenRouter API key
const OPENROUTER_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Default model to use
const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-0528";

/// Available OpenRouter models
const AVAILABLE_MODELS: &[&str] = &[
    "deepseek/deepseek-r1-0528",
    "deepseek/deepseek-chat",
    "meta-llama/llama-3.3-70b-instruct",
    "google/gemini-2.0-flash-001",
];

/// Base URL for the OpenRouter API (OpenAI-compatible)
const API_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Attribution headers required by OpenRouter's usage policies
const REFERER_HEADER: &str = "https://zenilience.app";
const TITLE_HEADER: &str = "Zenilience";

// ============================================================================
// API Request/Response Types (OpenAI-compatible format)
// ============================================================================

/// OpenRouter API request structure (OpenAI-compatible)
#[derive(Debug, Serialize)]
struct OpenRouterRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// Message structure for the wire format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for WireMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

/// OpenRouter API response structure (OpenAI-compatible)
#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
    model: String,
}

/// Choice in an OpenRouter response
#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

/// Message in an OpenRouter response
#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
}

/// Usage statistics in an OpenRouter response
#[derive(Debug, Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// OpenRouter API error response
#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireErrorDetail,
}

/// Error detail structure
#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// OpenRouter LLM provider
///
/// Provides access to hosted open and proprietary models through one
/// OpenAI-compatible gateway.
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
}

impl OpenRouterProvider {
    /// Create a new OpenRouter provider with the given API key
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
        }
    }

    /// Create an OpenRouter provider from environment variable
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENROUTER_API_KEY` is not set
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var(OPENROUTER_API_KEY_ENV).map_err(|_| {
            AppError::config(format!(
                "Missing {OPENROUTER_API_KEY_ENV} environment variable. Get your API key from https://openrouter.ai/keys"
            ))
        })?;

        Ok(Self::new(api_key))
    }

    /// Build the API URL for a given endpoint
    fn api_url(endpoint: &str) -> String {
        format!("{API_BASE_URL}/{endpoint}")
    }

    /// Convert internal messages to the wire format
    fn convert_messages(messages: &[ChatMessage]) -> Vec<WireMessage> {
        messages.iter().map(WireMessage::from).collect()
    }

    /// Parse error response from the OpenRouter API
    fn parse_error_response(status: reqwest::StatusCode, body: &str) -> AppError {
        if let Ok(error_response) = serde_json::from_str::<WireErrorResponse>(body) {
            let error_type = error_response
                .error
                .error_type
                .unwrap_or_else(|| "unknown".to_owned());

            match status.as_u16() {
                401 => AppError::auth_invalid(format!(
                    "OpenRouter API authentication failed: {}",
                    error_response.error.message
                )),
                429 => AppError::external_service(
                    "OpenRouter",
                    format!("Rate limit exceeded: {}", error_response.error.message),
                ),
                400 => AppError::invalid_input(format!(
                    "OpenRouter API validation error: {}",
                    error_response.error.message
                )),
                _ => AppError::external_service(
                    "OpenRouter",
                    format!("{} - {}", error_type, error_response.error.message),
                ),
            }
        } else {
            AppError::external_service(
                "OpenRouter",
                format!(
                    "API error ({}): {}",
                    status,
                    body.chars().take(200).collect::<String>()
                ),
            )
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &'static str {
        "openrouter"
    }

    fn display_name(&self) -> &'static str {
        "OpenRouter"
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn available_models(&self) -> &'static [&'static str] {
        AVAILABLE_MODELS
    }

    #[instrument(skip(self, request), fields(model = %request.model.as_deref().unwrap_or(DEFAULT_MODEL)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let model = request.model.as_deref().unwrap_or(DEFAULT_MODEL);

        debug!("Sending chat completion request to OpenRouter");

        let wire_request = OpenRouterRequest {
            model: model.to_owned(),
            messages: Self::convert_messages(&request.messages),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(Self::api_url("chat/completions"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("HTTP-Referer", REFERER_HEADER)
            .header("X-Title", TITLE_HEADER)
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to OpenRouter API: {}", e);
                AppError::external_service("OpenRouter", format!("Failed to connect: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read OpenRouter API response: {}", e);
            AppError::external_service("OpenRouter", format!("Failed to read response: {e}"))
        })?;

        if !status.is_success() {
            return Err(Self::parse_error_response(status, &body));
        }

        let wire_response: OpenRouterResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse OpenRouter API response: {}", e);
            AppError::external_service("OpenRouter", format!("Failed to parse response: {e}"))
        })?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::external_service("OpenRouter", "API returned no choices"))?;

        let content = choice.message.content.unwrap_or_default();

        debug!(
            "Received response from OpenRouter: {} chars, finish_reason: {:?}",
            content.len(),
            choice.finish_reason
        );

        Ok(ChatResponse {
            content,
            model: wire_response.model,
            usage: wire_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.finish_reason,
        })
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<bool, AppError> {
        debug!("Performing OpenRouter API health check");

        // The models endpoint is a lightweight authenticated probe
        let response = self
            .client
            .get(Self::api_url("models"))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                error!("OpenRouter health check failed: {}", e);
                AppError::external_service("OpenRouter", format!("Health check failed: {e}"))
            })?;

        let healthy = response.status().is_success();

        if !healthy {
            warn!(
                "OpenRouter API health check failed with status: {}",
                response.status()
            );
        }

        Ok(healthy)
    }
}
