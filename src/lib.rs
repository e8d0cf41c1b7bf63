// ABOUTME: Library root for the Zenilience wellness platform backend
// ABOUTME: Exposes auth, database, policy, LLM, and route modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Zenilience

//! # Zenilience Server
//!
//! Backend for the Zenilience wellness application: registration and JWT
//! sessions, a gamified lesson/streak dashboard, and the Zeno AI companion.
//!
//! ## Architecture
//!
//! - **`rate_limiting`** and **`gamification`** hold the pure policy core:
//!   per-tier daily quotas and streak/milestone accounting
//! - **`database`** wraps SQLite behind per-entity managers
//! - **`llm`** abstracts chat-completion providers (OpenRouter, local)
//! - **`services`** orchestrate multi-step operations
//! - **`routes`** expose the REST surface

#![deny(unsafe_code)]

/// JWT-based authentication and session management
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Application constants organized by domain
pub mod constants;

/// SQLite storage and per-entity managers
pub mod database;

/// Fixed sample data for the demo identity
pub mod demo;

/// Unified error handling with `AppError` and `ErrorCode`
pub mod errors;

/// Streak accounting and Zen Garden milestones
pub mod gamification;

/// LLM provider abstraction and prompts
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Core data models
pub mod models;

/// Daily usage quota engine
pub mod rate_limiting;

/// Shared resource container for dependency injection
pub mod resources;

/// REST route handlers
pub mod routes;

/// Domain services for multi-step operations
pub mod services;
