// ABOUTME: Configuration module for environment-driven server settings
// ABOUTME: Re-exports the environment config and shared configuration types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Configuration management

/// Environment-based server configuration
pub mod environment;

/// Shared configuration types
pub mod types;

pub use environment::{
    AuthConfig, DatabaseConfig, DatabaseUrl, Environment, LogLevel, ServerConfig,
};
pub use types::LlmProviderType;
