//! Integration tests for the authentication flow.

use axum::http::{StatusCode, header};
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["backend"], "memory");
}

#[tokio::test]
async fn test_register_login_me_scenario() {
    let app = TestApp::new().await;

    let register_token = app.register("alice@example.com", "secret123", "user").await;
    assert!(!register_token.is_empty());

    let token = app.login("alice@example.com", "secret123").await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.data()["email"], "alice@example.com");
    assert_eq!(me.data()["role"], "user");
    assert_eq!(me.data()["is_active"], true);
    assert!(me.data().get("password_hash").is_none());
    assert!(me.data().get("password").is_none());

    let dashboard = app
        .request("GET", "/api/admin/dashboard", None, Some(&token))
        .await;
    assert_eq!(dashboard.status, StatusCode::FORBIDDEN);
    assert_eq!(dashboard.error_code(), "FORBIDDEN");
}

#[tokio::test]
async fn test_register_response_shape() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "Bob@Example.com",
                "password": "secret123",
                "full_name": "Bob Farmer",
                "role": "farmer",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["token_type"], "bearer");
    assert_eq!(response.data()["user"]["email"], "bob@example.com");
    assert_eq!(response.data()["user"]["role"], "farmer");
    assert!(response.data()["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_registration_is_case_insensitive() {
    let app = TestApp::new().await;
    app.register("carol@example.com", "secret123", "doctor").await;

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "CAROL@example.com",
                "password": "another-secret",
                "full_name": "Carol Again",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new().await;

    let bad_email = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "password": "secret123", "full_name": "X" })),
            None,
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.error_code(), "VALIDATION");

    let short_password = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "dan@example.com", "password": "12345", "full_name": "Dan" })),
            None,
        )
        .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(short_password.error_code(), "VALIDATION");

    let malformed = app
        .request("POST", "/api/auth/register", Some(json!({ "email": 42 })), None)
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_persists_requested_role() {
    let app = TestApp::new().await;
    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "mallory@example.com",
                "password": "secret123",
                "full_name": "Mallory",
                "role": "admin",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.data()["user"]["role"], "admin");

    let token = app.login("mallory@example.com", "secret123").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.data()["role"], "admin");
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_fail_identically() {
    let app = TestApp::new().await;
    app.register("erin@example.com", "secret123", "user").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "erin@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    let unknown_email = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "nobody@example.com", "password": "wrong-password" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.error_code(), "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_missing_or_bad_token_is_unauthenticated() {
    let app = TestApp::new().await;

    let missing = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.headers.get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not.a.token"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body, missing.body);
}

#[tokio::test]
async fn test_tampered_token_is_rejected() {
    let app = TestApp::new().await;
    let token = app.register("frank@example.com", "secret123", "user").await;

    let mut bytes = token.into_bytes();
    let idx = bytes.len() - 5;
    bytes[idx] = if bytes[idx] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = app
        .request("GET", "/api/auth/me", None, Some(&tampered))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new().await;
    let token = app.register("grace@example.com", "secret123", "user").await;

    let logout = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let again = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);

    let fresh = app.login("grace@example.com", "secret123").await;
    let me = app.request("GET", "/api/auth/me", None, Some(&fresh)).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_forgot_password_does_not_reveal_accounts() {
    let app = TestApp::new().await;
    app.register("heidi@example.com", "secret123", "user").await;

    let known = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            Some(json!({ "email": "heidi@example.com" })),
            None,
        )
        .await;
    let unknown = app
        .request(
            "POST",
            "/api/auth/forgot-password",
            Some(json!({ "email": "ghost@example.com" })),
            None,
        )
        .await;

    assert_eq!(known.status, StatusCode::OK);
    assert_eq!(known.status, unknown.status);
    assert_eq!(known.body, unknown.body);
}
