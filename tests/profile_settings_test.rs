// ABOUTME: Integration tests for profile, settings, goals, and health-metric routes
// ABOUTME: Covers onboarding edits, tier upgrades, lazy defaults, and partial updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Zenilience

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use axum::http::StatusCode;
use common::{create_test_server, create_test_user};
use helpers::axum_test::AxumTestRequest;
use serde_json::json;
use zenilience::models::SubscriptionTier;
use zenilience::routes;

#[tokio::test]
async fn test_profile_onboarding_update() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "onboard@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::put("/api/profile")
        .header("authorization", &auth)
        .json(&json!({
            "full_name": "Ada Lovelace",
            "age": 36,
            "occupation": "Engineer",
            "interests": ["yoga", "reading"],
            "onboarding_completed": true
        }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["full_name"], "Ada Lovelace");
    assert_eq!(profile["onboarding_completed"], true);
    // Untouched fields keep their values
    assert_eq!(profile["subscription_type"], "explorer");

    // A partial update leaves other fields alone
    let response = AxumTestRequest::put("/api/profile")
        .header("authorization", &auth)
        .json(&json!({ "occupation": "Mathematician" }))
        .send(router)
        .await;
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["occupation"], "Mathematician");
    assert_eq!(profile["full_name"], "Ada Lovelace");
}

#[tokio::test]
async fn test_tier_upgrade_unlocks_lessons() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "upgrade@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::put("/api/profile")
        .header("authorization", &auth)
        .json(&json!({ "subscription_type": "zenith" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let quota: serde_json::Value = AxumTestRequest::get("/api/lessons/quota")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    // Zenith reports no limit at all
    assert_eq!(quota["is_limited"], false);
    assert!(quota["limit"].is_null());
}

#[tokio::test]
async fn test_settings_partial_update() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "settings@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let settings: serde_json::Value = AxumTestRequest::get("/api/settings")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    assert_eq!(settings["chat_personality"], "friendly");

    let response = AxumTestRequest::put("/api/settings")
        .header("authorization", &auth)
        .json(&json!({ "chat_personality": "professional", "theme": "dark" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let settings: serde_json::Value = response.json();
    assert_eq!(settings["chat_personality"], "professional");
    assert_eq!(settings["theme"], "dark");
    assert_eq!(settings["notifications_enabled"], true);

    let response = AxumTestRequest::put("/api/settings")
        .header("authorization", &auth)
        .json(&json!({ "theme": "sepia" }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_goals_create_and_list() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "goals@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/goals")
        .header("authorization", &auth)
        .json(&json!({ "goal_type": "reduce_stress", "goal_description": "Sleep better" }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let response = AxumTestRequest::post("/api/goals")
        .header("authorization", &auth)
        .json(&json!({ "goal_type": "  " }))
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let goals: serde_json::Value = AxumTestRequest::get("/api/goals")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    let goals = goals["goals"].as_array().unwrap().clone();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["goal_type"], "reduce_stress");
    assert_eq!(goals[0]["is_active"], true);
}

#[tokio::test]
async fn test_health_metrics_recorded() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "metrics@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let response = AxumTestRequest::post("/api/health-metrics")
        .header("authorization", &auth)
        .json(&json!({ "stress_level": 7, "mood_score": 4, "sleep_quality": 5 }))
        .send(router)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let metrics: serde_json::Value = response.json();
    assert_eq!(metrics["stress_level"], 7);
    assert_eq!(metrics["mood_score"], 4);
    assert!(metrics["energy_level"].is_null());
}

#[tokio::test]
async fn test_recommendation_routes() {
    let server = create_test_server().await.unwrap();
    let (_, auth) = create_test_user(&server.resources, "recroute@test.com", SubscriptionTier::Explorer)
        .await
        .unwrap();
    let router = routes::router(server.resources.clone());

    let first: serde_json::Value = AxumTestRequest::get("/api/recommendations/today")
        .header("authorization", &auth)
        .send(router.clone())
        .await
        .json();
    assert_eq!(first["completed"], false);

    let response = AxumTestRequest::post("/api/recommendations/today/complete")
        .header("authorization", &auth)
        .send(router.clone())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["recommendation"]["completed"], true);
    assert_eq!(body["progress"]["completed_sessions"], 1);

    // The stored pick is stable for the rest of the day
    let again: serde_json::Value = AxumTestRequest::get("/api/recommendations/today")
        .header("authorization", &auth)
        .send(router)
        .await
        .json();
    assert_eq!(again["id"], first["id"]);
    assert_eq!(again["completed"], true);
}
