// ABOUTME: Domain services for multi-step operations spanning store and LLM calls
// ABOUTME: Keeps route handlers thin by extracting orchestration into free functions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Domain service layer
//!
//! Route handlers stay thin; the multi-step operations (quota checks,
//! completion accounting, LLM dispatch with fallback) live here.

/// Companion chat orchestration
pub mod companion;

/// Lesson generation and completion
pub mod lessons;

/// Daily recommendation selection and completion
pub mod recommendations;
