// ABOUTME: Test helper module declarations
// ABOUTME: Exposes the axum request harness to integration tests
#![allow(dead_code)]

pub mod axum_test;
