//! Test utilities for integration testing (available with `test-utils` feature).

use crate::config::Config;
use crate::store::MemoryStore;
use crate::{AppState, Application};
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

/// Matches the default in [`Config`] so bootstrap and login agree on the account.
pub const TEST_SUPERADMIN_EMAIL: &str = "superadmin@seriouscompany.com";

/// Configured instead of generated so tests can log in as the superadmin.
pub const TEST_SUPERADMIN_PASSWORD: &str = "Sup3rAdminPass";

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        superadmin_email: TEST_SUPERADMIN_EMAIL.to_string(),
        superadmin_password: Some(TEST_SUPERADMIN_PASSWORD.to_string()),
        token_ttl: Duration::from_secs(3600),
    }
}

/// Bare state for handler-level tests. No superadmin is seeded; use
/// [`create_test_app`] when a test needs the bootstrapped account.
pub fn create_test_state() -> AppState {
    let config = create_test_config();
    let secret_key = config.secret_key.clone().expect("test config has a secret key");

    AppState::builder()
        .store(Arc::new(MemoryStore::default()))
        .config(config)
        .secret_key(secret_key)
        .build()
}

pub async fn create_test_app() -> TestServer {
    let app = Application::new(create_test_config())
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub async fn register(server: &TestServer, name: &str, email: &str, password: &str) {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({"name": name, "email": email, "password": password}))
        .await;
    response.assert_status_ok();
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({"email": email, "password": password}))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    body["token"].as_str().expect("login response has a token").to_string()
}

pub async fn register_and_login(server: &TestServer, name: &str, email: &str, password: &str) -> String {
    register(server, name, email, password).await;
    login(server, email, password).await
}

pub async fn superadmin_token(server: &TestServer) -> String {
    login(server, TEST_SUPERADMIN_EMAIL, TEST_SUPERADMIN_PASSWORD).await
}
