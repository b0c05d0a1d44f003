use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};

/// Acknowledgement sent back to Slack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ack {
    /// `{"message":"OK"}`
    Received,
    /// URL-verification handshake: the challenge echoed back verbatim
    Challenge(String),
}

impl IntoResponse for Ack {
    fn into_response(self) -> Response {
        match self {
            Ack::Received => (StatusCode::OK, Json(json!({ "message": "OK" }))).into_response(),
            Ack::Challenge(challenge) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, "text")], challenge).into_response()
            }
        }
    }
}

/// Every webhook request is answered with 200 and a fixed body; failures
/// only reach the logs.
pub struct AckAlways;

impl AckAlways {
    pub fn respond(endpoint: &str, outcome: AppResult<Ack>) -> Response {
        match outcome {
            Ok(ack) => ack.into_response(),
            Err(err) => {
                log_failure(endpoint, &err);
                Ack::Received.into_response()
            }
        }
    }
}

fn log_failure(endpoint: &str, err: &AppError) {
    match err {
        AppError::Signature(_) | AppError::Decode(_) | AppError::Validation(_) => {
            tracing::warn!(endpoint, error_kind = err.kind(), error = %err, "Rejected Slack request");
        }
        _ => {
            tracing::error!(endpoint, error_kind = err.kind(), error = %err, "Failed to handle Slack request");
        }
    }
}
