use thiserror::Error;

/// Application error types
///
/// Nothing here is ever rendered to a webhook caller: the `AckAlways`
/// policy logs the error and acknowledges the request regardless.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Signature verification failed: {0}")]
    Signature(String),

    #[error("Payload decode error: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable label used as the `error_kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Signature(_) => "signature",
            AppError::Decode(_) => "decode",
            AppError::Validation(_) => "validation",
            AppError::Configuration(_) => "configuration",
            AppError::ExternalService(_) => "upstream",
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}

/// Type alias for Results with AppError
pub type AppResult<T> = std::result::Result<T, AppError>;
