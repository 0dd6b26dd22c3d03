#![allow(dead_code)]

use axum::Router;
use axum_test::{TestResponse, TestServer};
use haustier_server::config::{AppConfig, TokenConfig};
use haustier_server::startup::build_app_from_config;
use serde_json::{json, Value};

pub const BASE_URL: &str = "http://localhost:3000";
pub const ADMIN_TOKEN: &str = "test-admin-token";
pub const USER_TOKEN: &str = "test-user-token";

/// Development configuration with fixed base URL, test tokens and a 1 KiB upload limit
pub fn create_test_app_config() -> AppConfig {
    let mut config = AppConfig::default_config();
    config.server.base_url = Some(BASE_URL.to_string());
    config.auth.tokens = vec![
        TokenConfig {
            token: ADMIN_TOKEN.to_string(),
            username: "admin".to_string(),
            roles: vec!["admin".to_string(), "user".to_string()],
        },
        TokenConfig {
            token: USER_TOKEN.to_string(),
            username: "user".to_string(),
            roles: vec!["user".to_string()],
        },
    ];
    config.upload.max_file_size = 1024;
    config
}

/// Create a test app on a fresh in-memory SQLite database
pub async fn setup_test_app(app_config: AppConfig) -> Result<Router, Box<dyn std::error::Error>> {
    Ok(build_app_from_config(app_config).await?)
}

pub async fn setup_test_server() -> TestServer {
    let app = setup_test_app(create_test_app_config()).await.unwrap();
    TestServer::new(app).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn haustier_payload(name: &str) -> Value {
    json!({
        "name": name,
        "alter": 3,
        "art": "HUND",
        "gewicht": 12.5,
        "groesse": 45.0,
        "vermittelt": false,
        "aufnahmedatum": "2023-05-01",
        "rasse": "Golden Retriever",
        "schlagwoerter": ["VERSPIELT"],
        "beschreibung": {
            "beschreibung": "Freundlicher Hund",
            "haltungshinweise": "Braucht viel Auslauf"
        },
        "fotos": [
            { "beschriftung": "Profil", "contentType": "image/png" }
        ]
    })
}

/// Scalar fields accepted by `PUT /rest/{id}`
pub fn update_payload(name: &str, alter: i64) -> Value {
    json!({
        "name": name,
        "alter": alter,
        "art": "HUND",
        "gewicht": 13.0,
        "vermittelt": true,
        "aufnahmedatum": "2023-05-01",
        "rasse": "Golden Retriever"
    })
}

pub fn location(response: &TestResponse) -> String {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap()
}

pub fn etag(response: &TestResponse) -> Option<String> {
    response
        .headers()
        .get("etag")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// POST a pet as admin and return its ID from the `Location` header
pub async fn create_haustier(server: &TestServer, payload: &Value) -> i64 {
    let response = server
        .post("/rest")
        .add_header(http::header::AUTHORIZATION, bearer(ADMIN_TOKEN))
        .json(payload)
        .await;
    assert_eq!(response.status_code(), http::StatusCode::CREATED);

    location(&response)
        .rsplit('/')
        .next()
        .and_then(|id| id.parse().ok())
        .unwrap()
}
