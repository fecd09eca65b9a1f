//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use sentinel_api::{AppState, build_app};
use sentinel_core::config::AppConfig;
use sentinel_database::Stores;

/// Fixture configuration with a memory backend and cheap hashing.
pub const TEST_CONFIG: &str = "tests/fixtures/test_config.toml";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for direct access to the auth core
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with fresh stores and the bootstrap admin.
    pub async fn new() -> Self {
        let config = AppConfig::from_file(TEST_CONFIG).expect("Failed to load test config");
        let stores = Stores::in_memory().with_operation_timeout(config.database.operation_timeout());
        let bootstrap = config.bootstrap.clone();

        let state = AppState::new(config, stores).expect("Failed to build state");
        state
            .auth
            .bootstrap_admin(&bootstrap)
            .await
            .expect("Failed to bootstrap admin");

        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Register an account and return its access token.
    pub async fn register(&self, email: &str, password: &str, role: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "email": email,
                    "password": password,
                    "full_name": "Test User",
                    "role": role,
                })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "registration failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Login and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "login failed: {:?}",
            response.body
        );
        response.token()
    }

    /// Login as the bootstrap administrator.
    pub async fn admin_token(&self) -> String {
        self.login("admin@example.com", "admin-password-1").await
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Forwarded-For", "203.0.113.7")
            .header("User-Agent", "sentinel-tests");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The access token of a login or registration response.
    pub fn token(&self) -> String {
        self.data()["access_token"]
            .as_str()
            .expect("response carries no access token")
            .to_string()
    }

    /// The machine-readable code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
