// ABOUTME: REST route modules and top-level router assembly
// ABOUTME: Provides the shared bearer-token authentication helper for handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! REST API surface
//!
//! One module per surface; every handler authenticates via the shared
//! [`authenticate`] helper and returns `Result<Response, AppError>`.

use crate::auth::AuthResult;
use crate::errors::AppError;
use crate::resources::ServerResources;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod lessons;
pub mod profile;
pub mod settings;

/// Assemble the complete application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(dashboard::DashboardRoutes::routes(resources.clone()))
        .merge(lessons::LessonRoutes::routes(resources.clone()))
        .merge(chat::ChatRoutes::routes(resources.clone()))
        .merge(profile::ProfileRoutes::routes(resources.clone()))
        .merge(settings::SettingsRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Extract and validate the bearer token from request headers
///
/// # Errors
///
/// Returns `AuthInvalid` when the header is missing, malformed, or carries
/// an invalid token.
pub(crate) fn authenticate(
    headers: &axum::http::HeaderMap,
    resources: &Arc<ServerResources>,
) -> Result<AuthResult, AppError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a bearer token"))?;

    resources
        .auth_manager
        .authenticate(token)
        .map_err(|e| AppError::auth_invalid(format!("Authentication failed: {e}")))
}
