// ABOUTME: User authentication route handlers for registration, login, and token refresh
// ABOUTME: Provides REST endpoints for account management including the demo identity
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Zenilience

//! Authentication routes for user management
//!
//! This module handles user registration, login, and token refresh. All
//! handlers are thin wrappers that delegate business logic to `AuthService`.

use crate::{
    constants::{demo, error_messages, limits},
    database::ProfileManager,
    demo::demo_user_id,
    errors::AppError,
    models::{User, UserProfile},
    resources::ServerResources,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// User registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: String,
    pub message: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User info for login response
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub user_id: String,
    pub email: String,
    pub display_name: Option<String>,
}

/// User login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub jwt_token: String,
    pub expires_at: String,
    pub user: UserInfo,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub token: String,
    pub user_id: String,
}

/// Authentication service for business logic
pub struct AuthService;

impl AuthService {
    /// Handle user registration
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the database operation fails.
    pub async fn register(
        resources: &ServerResources,
        request: RegisterRequest,
    ) -> Result<RegisterResponse, AppError> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input(error_messages::INVALID_EMAIL_FORMAT));
        }

        if !Self::is_valid_password(&request.password) {
            return Err(AppError::invalid_input(error_messages::PASSWORD_TOO_WEAK));
        }

        if let Ok(Some(_)) = resources.database.get_user_by_email(&request.email).await {
            return Err(AppError::already_exists(error_messages::USER_ALREADY_EXISTS));
        }

        // Hash on a blocking task; bcrypt is deliberately slow
        let password = request.password.clone();
        let password_hash =
            tokio::task::spawn_blocking(move || bcrypt::hash(&password, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| AppError::internal(format!("Password hashing task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password hashing error: {e}")))?;

        let user = User::new(request.email.clone(), password_hash, request.display_name);
        let user_id = resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(format!("Failed to create user: {e}")))?;

        // Every account starts with a default Explorer profile
        ProfileManager::new(resources.database.pool().clone())
            .upsert_profile(&UserProfile::new(user_id))
            .await?;

        tracing::info!("User registered successfully: {} ({})", request.email, user_id);

        Ok(RegisterResponse {
            user_id: user_id.to_string(),
            message: "User registered successfully.".into(),
        })
    }

    /// Handle user login
    ///
    /// The demo credentials short-circuit the store entirely and mint a
    /// session for the fixed demo identity.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication fails or token generation fails.
    pub async fn login(
        resources: &ServerResources,
        request: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        tracing::info!("User login attempt for email: {}", request.email);

        if request.email == demo::DEMO_EMAIL && request.password == demo::DEMO_PASSWORD {
            return Self::demo_login(resources);
        }

        let user = resources
            .database
            .get_user_by_email_required(&request.email)
            .await
            .map_err(|_| AppError::auth_invalid(error_messages::INVALID_CREDENTIALS))?;

        // Verify on a blocking task to avoid stalling the async executor
        let password = request.password.clone();
        let password_hash = user.password_hash.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || bcrypt::verify(&password, &password_hash))
                .await
                .map_err(|e| AppError::internal(format!("Password verification task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Password verification error: {e}")))?;

        if !is_valid {
            tracing::warn!("Invalid password for user: {}", request.email);
            return Err(AppError::auth_invalid(error_messages::INVALID_CREDENTIALS));
        }

        if !user.is_active {
            return Err(AppError::auth_invalid("Account is deactivated"));
        }

        resources
            .database
            .update_last_active(user.id)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last active: {e}")))?;

        let session = resources
            .auth_manager
            .create_session(&user)
            .map_err(|e| AppError::internal(format!("Failed to create session: {e}")))?;

        tracing::info!("User logged in successfully: {} ({})", request.email, user.id);

        Ok(LoginResponse {
            jwt_token: session.jwt_token,
            expires_at: session.expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    /// Mint a session for the fixed demo identity without touching the store
    fn demo_login(resources: &ServerResources) -> Result<LoginResponse, AppError> {
        let user_id = demo_user_id();
        let jwt_token = resources
            .auth_manager
            .generate_token_for(user_id, demo::DEMO_EMAIL)
            .map_err(|e| AppError::internal(format!("Failed to create demo session: {e}")))?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(limits::DEFAULT_SESSION_HOURS);

        tracing::info!("Demo login successful");

        Ok(LoginResponse {
            jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user_id.to_string(),
                email: demo::DEMO_EMAIL.to_owned(),
                display_name: Some("Demo Explorer".to_owned()),
            },
        })
    }

    /// Handle token refresh
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh token is invalid or token generation
    /// fails.
    pub async fn refresh_token(
        resources: &ServerResources,
        request: RefreshTokenRequest,
    ) -> Result<LoginResponse, AppError> {
        let request_user_id = uuid::Uuid::parse_str(&request.user_id)
            .map_err(|_| AppError::invalid_input("Invalid user id"))?;

        let user = resources
            .database
            .get_user(request_user_id)
            .await
            .map_err(|e| AppError::database(format!("Failed to load user: {e}")))?
            .ok_or_else(|| AppError::not_found("User"))?;

        let new_jwt_token = resources
            .auth_manager
            .refresh_token(&request.token, &user)
            .map_err(|e| AppError::auth_invalid(format!("Token refresh rejected: {e}")))?;
        let expires_at = chrono::Utc::now()
            + chrono::Duration::hours(resources.auth_manager.token_expiry_hours());

        resources
            .database
            .update_last_active(user.id)
            .await
            .map_err(|e| AppError::database(format!("Failed to update last active: {e}")))?;

        tracing::info!("Token refreshed successfully for user: {}", user.id);

        Ok(LoginResponse {
            jwt_token: new_jwt_token,
            expires_at: expires_at.to_rfc3339(),
            user: UserInfo {
                user_id: user.id.to_string(),
                email: user.email,
                display_name: user.display_name,
            },
        })
    }

    /// Validate email format
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        if email.len() <= 5 {
            return false;
        }
        let Some(at_pos) = email.find('@') else {
            return false;
        };
        // Dot must come after the @ with characters on both sides
        email[at_pos + 1..].contains('.')
            && at_pos > 0
            && !email.ends_with('.')
            && !email[at_pos + 1..].starts_with('.')
    }

    /// Validate password strength
    #[must_use]
    pub fn is_valid_password(password: &str) -> bool {
        password.len() >= 8
    }
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/auth/register", post(Self::handle_register))
            .route("/api/auth/login", post(Self::handle_login))
            .route("/api/auth/refresh", post(Self::handle_refresh))
            .with_state(resources)
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::register(&resources, request).await?;
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::login(&resources, request).await?;
        Ok(Json(response).into_response())
    }

    async fn handle_refresh(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RefreshTokenRequest>,
    ) -> Result<Response, AppError> {
        let response = AuthService::refresh_token(&resources, request).await?;
        Ok(Json(response).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthService::is_valid_email("user@example.com"));
        assert!(!AuthService::is_valid_email("short"));
        assert!(!AuthService::is_valid_email("no-at-sign.com"));
        assert!(!AuthService::is_valid_email("user@nodot"));
        assert!(!AuthService::is_valid_email("user@.com"));
    }

    #[test]
    fn test_password_validation() {
        assert!(AuthService::is_valid_password("longenough"));
        assert!(!AuthService::is_valid_password("short"));
    }
}
