//! Shared helpers for integration tests.
//!
//! This module provides:
//! - `TestApp` – the full bridge router driven with `oneshot`, no TCP listener
//! - `test_config` – a complete configuration pointing at mock servers
//! - Slack request signing

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use secrecy::SecretString;
use tower::ServiceExt;

use slack_notion_bridge::{
    config::{AnchorPolicy, Config},
    create_app,
    services::{SignatureVerifier, SIGNATURE_HEADER, TIMESTAMP_HEADER},
};

pub const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";

/// Configuration with every outbound API rooted at `base_url`
/// (`/slack`, `/notion`, `/openai`).
pub fn test_config(base_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        slack_signing_secret: SecretString::from(SIGNING_SECRET),
        slack_token: SecretString::from("xoxb-test"),
        notion_token: SecretString::from("secret_notion"),
        notion_database: "db-123".to_string(),
        notion_title_property: "Name".to_string(),
        openai_api_key: None,
        openai_model: "gpt-3.5-turbo".to_string(),
        summarize_threads: false,
        trigger_reaction: "slack-to-notion".to_string(),
        anchor_policy: AnchorPolicy::RootOnly,
        signature_max_age_secs: 300,
        base64_bodies: false,
        slack_api_base: format!("{base_url}/slack"),
        notion_api_base: format!("{base_url}/notion"),
        openai_api_base: format!("{base_url}/openai"),
    }
}

/// Minimal test application wrapper.
#[allow(dead_code)]
pub struct TestApp {
    router: Router,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new(config: Config) -> Self {
        Self {
            router: create_app(config).expect("valid test config"),
        }
    }

    /// Send a GET request and return (status, body).
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .uri(path)
            .method("GET")
            .body(Body::empty())
            .unwrap();
        self.send(req).await
    }

    /// POST `body` signed with the test secret at the current time.
    pub async fn post_signed(&self, path: &str, body: &str) -> (StatusCode, String) {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(&timestamp, body.as_bytes());
        self.post_raw(path, body, &[(TIMESTAMP_HEADER, timestamp.as_str()), (SIGNATURE_HEADER, signature.as_str())])
            .await
    }

    /// POST `body` with exactly the given headers.
    pub async fn post_raw(&self, path: &str, body: &str, headers: &[(&str, &str)]) -> (StatusCode, String) {
        let mut builder = Request::builder().uri(path).method("POST");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let req = builder.body(Body::from(body.to_string())).unwrap();
        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

#[allow(dead_code)]
pub fn sign(timestamp: &str, body: &[u8]) -> String {
    SignatureVerifier::new(SIGNING_SECRET.as_bytes(), 300)
        .sign(timestamp, body)
        .unwrap()
}

#[allow(dead_code)]
pub const ACK_BODY: &str = r#"{"message":"OK"}"#;
