// ABOUTME: Integration tests for registration, login, refresh, and the demo identity
// ABOUTME: Exercises the full auth flow over the HTTP surface
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::create_test_server;
use helpers::axum_test::AxumTestRequest;
use serde_json::json;
use zenilience::constants::demo::{DEMO_EMAIL, DEMO_PASSWORD, DEMO_USER_ID};
use zenilience::routes;
use zenilience::routes::auth::{LoginResponse, RegisterResponse};

#[tokio::test]
async fn test_register_login_roundtrip() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({
            "email": "newuser@example.com",
            "password": "a-strong-password",
            "display_name": "New User"
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let registered: RegisterResponse = response.json();

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({
            "email": "newuser@example.com",
            "password": "a-strong-password"
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let login: LoginResponse = response.json();
    assert_eq!(login.user.user_id, registered.user_id);
    assert_eq!(login.user.email, "newuser@example.com");

    // The minted token works on an authenticated route
    let response = AxumTestRequest::get("/api/profile")
        .header("authorization", &format!("Bearer {}", login.jwt_token))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: serde_json::Value = response.json();
    // Fresh accounts land on the free tier
    assert_eq!(profile["subscription_type"], "explorer");
}

#[tokio::test]
async fn test_duplicate_registration_conflicts() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    let body = json!({
        "email": "dup@example.com",
        "password": "a-strong-password"
    });

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&body)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&body)
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_validation() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({ "email": "not-an-email", "password": "a-strong-password" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = AxumTestRequest::post("/api/auth/register")
        .json(&json!({ "email": "ok@example.com", "password": "short" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    AxumTestRequest::post("/api/auth/register")
        .json(&json!({ "email": "secure@example.com", "password": "a-strong-password" }))
        .send(router.clone())
        .await;

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": "secure@example.com", "password": "wrong-password" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_email_is_unauthorized() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": "ghost@example.com", "password": "whatever-long" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_demo_login_bypasses_store() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": DEMO_EMAIL, "password": DEMO_PASSWORD }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let login: LoginResponse = response.json();
    assert_eq!(login.user.user_id, DEMO_USER_ID);

    // No users row exists for the demo identity
    assert_eq!(server.resources.database.get_user_count().await.unwrap(), 0);

    // The demo dashboard is served from fixed sample data
    let response = AxumTestRequest::get("/api/dashboard")
        .header("authorization", &format!("Bearer {}", login.jwt_token))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let dashboard: serde_json::Value = response.json();
    assert_eq!(dashboard["profile"]["subscription_type"], "zenith");
    assert_eq!(dashboard["streaks"]["total_lessons_completed"], 23);
}

#[tokio::test]
async fn test_refresh_returns_working_token() {
    let server = create_test_server().await.unwrap();
    let router = routes::router(server.resources.clone());

    AxumTestRequest::post("/api/auth/register")
        .json(&json!({ "email": "refresh@example.com", "password": "a-strong-password" }))
        .send(router.clone())
        .await;
    let login: LoginResponse = AxumTestRequest::post("/api/auth/login")
        .json(&json!({ "email": "refresh@example.com", "password": "a-strong-password" }))
        .send(router.clone())
        .await
        .json();

    let response = AxumTestRequest::post("/api/auth/refresh")
        .json(&json!({ "token": login.jwt_token, "user_id": login.user.user_id }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let refreshed: LoginResponse = response.json();

    let response = AxumTestRequest::get("/api/settings")
        .header("authorization", &format!("Bearer {}", refreshed.jwt_token))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
