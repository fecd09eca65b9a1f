//! Integration tests for the admin endpoints.

use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::helpers::TestApp;

fn user_id(app_response: &Value) -> String {
    app_response["user"]["id"]
        .as_str()
        .expect("registration response carries a user id")
        .to_string()
}

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let app = TestApp::new().await;
    let user = app.register("ivan@example.com", "secret123", "doctor").await;

    for path in ["/api/admin/dashboard", "/api/admin/users", "/api/admin/logs"] {
        let anonymous = app.request("GET", path, None, None).await;
        assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED, "{path}");

        let forbidden = app.request("GET", path, None, Some(&user)).await;
        assert_eq!(forbidden.status, StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::new().await;
    app.register("judy@example.com", "secret123", "user").await;
    let admin = app.admin_token().await;

    let response = app
        .request("GET", "/api/admin/dashboard", None, Some(&admin))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["total_users"], 2);
    assert_eq!(response.data()["active_sessions"], 2);

    let recent = response.data()["recent_activity"].as_array().unwrap();
    assert!(!recent.is_empty());
    assert!(recent.len() <= 10);
    assert_eq!(recent[0]["action"], "login");
}

#[tokio::test]
async fn test_list_users_with_filters() {
    let app = TestApp::new().await;
    app.register("d1@example.com", "secret123", "doctor").await;
    app.register("d2@example.com", "secret123", "doctor").await;
    app.register("f1@example.com", "secret123", "farmer").await;
    let admin = app.admin_token().await;

    let all = app
        .request("GET", "/api/admin/users", None, Some(&admin))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.data()["total"], 4);

    let doctors = app
        .request(
            "GET",
            "/api/admin/users?role=doctor&page=1&per_page=1",
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(doctors.status, StatusCode::OK);
    assert_eq!(doctors.data()["total"], 2);
    assert_eq!(doctors.data()["total_pages"], 2);
    assert_eq!(doctors.data()["items"].as_array().unwrap().len(), 1);
    assert_eq!(doctors.data()["items"][0]["role"], "doctor");

    let search = app
        .request("GET", "/api/admin/users?search=F1@", None, Some(&admin))
        .await;
    assert_eq!(search.data()["total"], 1);
    assert_eq!(search.data()["items"][0]["email"], "f1@example.com");
}

#[tokio::test]
async fn test_deactivation_blocks_login_and_existing_tokens() {
    let app = TestApp::new().await;
    let registration = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "ken@example.com",
                "password": "secret123",
                "full_name": "Ken",
            })),
            None,
        )
        .await;
    let token = registration.token();
    let id = user_id(registration.data());
    let admin = app.admin_token().await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{id}/status"),
            Some(json!({ "is_active": false })),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["is_active"], false);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let login = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ken@example.com", "password": "secret123" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::FORBIDDEN);
    assert_eq!(login.error_code(), "ACCOUNT_DEACTIVATED");

    let wrong = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "ken@example.com", "password": "bad-password" })),
            None,
        )
        .await;
    assert_eq!(wrong.error_code(), "INVALID_CREDENTIALS");

    app.request(
        "PUT",
        &format!("/api/admin/users/{id}/status"),
        Some(json!({ "is_active": true })),
        Some(&admin),
    )
    .await;
    app.login("ken@example.com", "secret123").await;
}

#[tokio::test]
async fn test_promotion_takes_effect_on_existing_token() {
    let app = TestApp::new().await;
    let registration = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "email": "leo@example.com",
                "password": "secret123",
                "full_name": "Leo",
            })),
            None,
        )
        .await;
    let token = registration.token();
    let id = user_id(registration.data());
    let admin = app.admin_token().await;

    let before = app
        .request("GET", "/api/admin/dashboard", None, Some(&token))
        .await;
    assert_eq!(before.status, StatusCode::FORBIDDEN);

    let update = app
        .request(
            "PUT",
            &format!("/api/admin/users/{id}"),
            Some(json!({ "role": "admin", "full_name": "Leo Admin" })),
            Some(&admin),
        )
        .await;
    assert_eq!(update.status, StatusCode::OK);
    assert_eq!(update.data()["role"], "admin");
    assert_eq!(update.data()["full_name"], "Leo Admin");

    let after = app
        .request("GET", "/api/admin/dashboard", None, Some(&token))
        .await;
    assert_eq!(after.status, StatusCode::OK);
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let app = TestApp::new().await;
    let registration = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "mia@example.com", "password": "secret123", "full_name": "Mia" })),
            None,
        )
        .await;
    let id = user_id(registration.data());
    let admin = app.admin_token().await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/users/{id}"),
            Some(json!({})),
            Some(&admin),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_revokes_access() {
    let app = TestApp::new().await;
    let registration = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "nia@example.com", "password": "secret123", "full_name": "Nia" })),
            None,
        )
        .await;
    let token = registration.token();
    let id = user_id(registration.data());
    let admin = app.admin_token().await;

    let delete = app
        .request("DELETE", &format!("/api/admin/users/{id}"), None, Some(&admin))
        .await;
    assert_eq!(delete.status, StatusCode::OK);

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let get = app
        .request("GET", &format!("/api/admin/users/{id}"), None, Some(&admin))
        .await;
    assert_eq!(get.status, StatusCode::NOT_FOUND);

    let again = app
        .request("DELETE", &format!("/api/admin/users/{id}"), None, Some(&admin))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_and_revoke_sessions() {
    let app = TestApp::new().await;
    let registration = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "olga@example.com", "password": "secret123", "full_name": "Olga" })),
            None,
        )
        .await;
    let first = registration.token();
    let id = user_id(registration.data());
    let second = app.login("olga@example.com", "secret123").await;
    let admin = app.admin_token().await;

    let sessions = app
        .request(
            "GET",
            &format!("/api/admin/users/{id}/sessions"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(sessions.status, StatusCode::OK);
    let list = sessions.data().as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|s| s.get("token_hash").is_none()));
    assert!(list.iter().all(|s| s["ip_address"] == "203.0.113.7"));

    let sid = registration.data()["session_id"].as_str().unwrap().to_string();

    let revoke = app
        .request(
            "POST",
            &format!("/api/admin/sessions/{sid}/revoke"),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(revoke.status, StatusCode::OK);

    let first_me = app.request("GET", "/api/auth/me", None, Some(&first)).await;
    assert_eq!(first_me.status, StatusCode::UNAUTHORIZED);
    let second_me = app.request("GET", "/api/auth/me", None, Some(&second)).await;
    assert_eq!(second_me.status, StatusCode::OK);

    let missing = app
        .request(
            "POST",
            &format!("/api/admin/sessions/{}/revoke", uuid::Uuid::new_v4()),
            None,
            Some(&admin),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_log_records_events_newest_first() {
    let app = TestApp::new().await;
    app.register("pat@example.com", "secret123", "user").await;
    let failed = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "pat@example.com", "password": "nope-nope" })),
            None,
        )
        .await;
    assert_eq!(failed.status, StatusCode::UNAUTHORIZED);
    let admin = app.admin_token().await;

    let logs = app
        .request("GET", "/api/admin/logs", None, Some(&admin))
        .await;
    assert_eq!(logs.status, StatusCode::OK);
    let entries = logs.data().as_array().unwrap();
    let actions: Vec<&str> = entries
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions[0], "login");
    assert!(actions.contains(&"login_failed"));
    assert!(actions.contains(&"register"));
    assert!(actions.contains(&"bootstrap_admin_created"));

    let warnings = app
        .request("GET", "/api/admin/logs?type=warning", None, Some(&admin))
        .await;
    let warnings = warnings.data().as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["action"], "login_failed");
    assert_eq!(warnings[0]["actor"], "pat@example.com");

    let limited = app
        .request("GET", "/api/admin/logs?limit=1", None, Some(&admin))
        .await;
    assert_eq!(limited.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_access_rules_create_and_list() {
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    for (role, permission) in [("doctor", "read"), ("farmer", "write"), ("doctor", "write")] {
        let created = app
            .request(
                "POST",
                "/api/admin/access-control",
                Some(json!({
                    "role": role,
                    "domain": "health",
                    "permissions": [permission],
                    "resources": ["patients"],
                })),
                Some(&admin),
            )
            .await;
        assert_eq!(created.status, StatusCode::CREATED);
        assert_eq!(created.data()["created_by"], "admin@example.com");
    }

    let all = app
        .request("GET", "/api/admin/access-control", None, Some(&admin))
        .await;
    assert_eq!(all.data().as_array().unwrap().len(), 3);

    let doctors = app
        .request(
            "GET",
            "/api/admin/access-control?role=doctor",
            None,
            Some(&admin),
        )
        .await;
    let doctors = doctors.data().as_array().unwrap();
    assert_eq!(doctors.len(), 2);
    assert_eq!(doctors[0]["permissions"][0], "read");
    assert_eq!(doctors[1]["permissions"][0], "write");

    let no_subject = app
        .request(
            "POST",
            "/api/admin/access-control",
            Some(json!({ "permissions": ["read"] })),
            Some(&admin),
        )
        .await;
    assert_eq!(no_subject.status, StatusCode::BAD_REQUEST);

    let no_permissions = app
        .request(
            "POST",
            "/api/admin/access-control",
            Some(json!({ "role": "farmer", "permissions": [] })),
            Some(&admin),
        )
        .await;
    assert_eq!(no_permissions.status, StatusCode::BAD_REQUEST);
}
