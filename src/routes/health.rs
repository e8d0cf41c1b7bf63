// ABOUTME: Liveness route handler reporting server and database status
// ABOUTME: Used by deployment probes and uptime monitoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

//! Health check route

use crate::{errors::AppError, resources::ServerResources};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded")
    pub status: String,
    /// Whether the database answered a ping
    pub database: bool,
    /// Service version
    pub version: String,
}

/// Health routes handler
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::health))
            .with_state(resources)
    }

    /// Liveness and database reachability
    async fn health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let database = resources.database.ping().await.is_ok();
        let status = if database { "ok" } else { "degraded" };

        Ok(Json(HealthResponse {
            status: status.to_owned(),
            database,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        })
        .into_response())
    }
}
