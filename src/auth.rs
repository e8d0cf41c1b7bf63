// ABOUTME: JWT-based user authentication and authorization system
// ABOUTME: Handles user login, token generation, validation, and session management
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright (c) 2025 Zenilience

//! # Authentication and Session Management
//!
//! This module provides JWT-based authentication and session management for
//! the Zenilience server. Tokens are HS256-signed with a server-held secret;
//! passwords are bcrypt-hashed at the route layer.

use crate::constants::{limits::DEFAULT_SESSION_HOURS, service_names};
use crate::models::{User, UserSession};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `JWT` validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
    },
    /// Token signature is invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is malformed (not proper `JWT` format)
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired { expired_at } => {
                write!(
                    f,
                    "JWT token expired at {}",
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => {
                write!(f, "JWT token signature is invalid: {reason}")
            }
            Self::TokenMalformed { details } => {
                write!(f, "JWT token is malformed: {details}")
            }
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Audience (who the token is intended for)
    pub aud: String,
}

/// Authentication result attached to a request after token validation
#[derive(Debug)]
pub struct AuthResult {
    /// Authenticated user `ID`
    pub user_id: Uuid,
    /// Account email from the token claims
    pub email: String,
}

/// Authentication manager for `JWT` tokens and user sessions
#[derive(Clone)]
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry_hours: i64,
}

impl AuthManager {
    /// Create a new authentication manager from a signing secret
    #[must_use]
    pub fn new(jwt_secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            token_expiry_hours,
        }
    }

    /// Generate a signed `JWT` token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token(&self, user: &User) -> Result<String> {
        self.generate_token_for(user.id, &user.email)
    }

    /// Generate a signed `JWT` token for an arbitrary identity
    ///
    /// Used by the normal login path and the demo identity, which has no
    /// backing `users` row.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails.
    pub fn generate_token_for(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let expiry = now + Duration::hours(self.token_expiry_hours);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            aud: service_names::ZENILIENCE_SERVER.to_owned(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Validate a `JWT` token and return its claims
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if the token is expired, malformed,
    /// or carries an invalid signature.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_audience(&[service_names::ZENILIENCE_SERVER]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("JWT token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::ExpiredSignature => JwtValidationError::TokenExpired {
                expired_at: Utc::now(),
            },
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }

    /// Validate a bearer token and resolve the authenticated identity
    ///
    /// # Errors
    ///
    /// Returns an error if the token is invalid or its subject is not a UUID.
    pub fn authenticate(&self, token: &str) -> Result<AuthResult> {
        let claims = self.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).with_context(|| {
            format!("Failed to parse user ID from JWT subject: {}", claims.sub)
        })?;

        Ok(AuthResult {
            user_id,
            email: claims.email,
        })
    }

    /// Create a user session with a fresh token
    ///
    /// # Errors
    ///
    /// Returns an error if JWT token generation fails.
    pub fn create_session(&self, user: &User) -> Result<UserSession> {
        let jwt_token = self.generate_token(user)?;
        let expires_at = Utc::now() + Duration::hours(self.token_expiry_hours);

        Ok(UserSession {
            user_id: user.id,
            jwt_token,
            expires_at,
            email: user.email.clone(),
        })
    }

    /// Refresh a token if its signature is still valid
    ///
    /// Expiry is deliberately not checked here: a recently expired token can
    /// still be exchanged, since the signature proves the original grant.
    ///
    /// # Errors
    ///
    /// Returns an error if the old token signature is invalid or the new
    /// token cannot be generated.
    pub fn refresh_token(&self, old_token: &str, user: &User) -> Result<String> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_audience(&[service_names::ZENILIENCE_SERVER]);

        decode::<Claims>(old_token, &self.decoding_key, &validation)
            .map_err(|e| anyhow::anyhow!("Failed to validate old token for refresh: {e}"))?;

        self.generate_token(user)
    }

    /// Token lifetime in hours
    #[must_use]
    pub const fn token_expiry_hours(&self) -> i64 {
        self.token_expiry_hours
    }
}

impl Default for AuthManager {
    fn default() -> Self {
        Self::new(generate_jwt_secret().as_bytes(), DEFAULT_SESSION_HOURS)
    }
}

/// Generate a random `JWT` secret, hex-encoded
#[must_use]
pub fn generate_jwt_secret() -> String {
    let mut secret = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut secret);
    secret.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_manager() -> AuthManager {
        AuthManager::new(b"test-secret-for-unit-tests", 24)
    }

    #[test]
    fn test_token_round_trip() {
        let manager = test_manager();
        let user = User::new("user@example.com".into(), "hash".into(), None);

        let token = manager.generate_token(&user).unwrap();
        let claims = manager.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "user@example.com");
    }

    #[test]
    fn test_invalid_signature_rejected() {
        let manager = test_manager();
        let other = AuthManager::new(b"a-different-secret-entirely", 24);
        let user = User::new("user@example.com".into(), "hash".into(), None);

        let token = other.generate_token(&user).unwrap();
        assert!(manager.validate_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = test_manager();
        assert!(manager.validate_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_authenticate_resolves_user_id() {
        let manager = test_manager();
        let user = User::new("user@example.com".into(), "hash".into(), None);
        let token = manager.generate_token(&user).unwrap();

        let auth = manager.authenticate(&token).unwrap();
        assert_eq!(auth.user_id, user.id);
    }

    #[test]
    fn test_refresh_produces_valid_token() {
        let manager = test_manager();
        let user = User::new("user@example.com".into(), "hash".into(), None);
        let token = manager.generate_token(&user).unwrap();

        let refreshed = manager.refresh_token(&token, &user).unwrap();
        assert!(manager.validate_token(&refreshed).is_ok());
    }
}
