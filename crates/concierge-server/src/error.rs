use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use concierge::errors::{BackendError, TtsError, VoiceError};
use serde::Serialize;
use thiserror::Error;

const ENV_PREFIX: &str = "CONCIERGE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {env_var}")]
    MissingEnvVar { env_var: String },

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

/// Environment variable that sets the given dotted settings key
pub fn to_env_var(field: &str) -> String {
    format!("{}_{}", ENV_PREFIX, field.replace('.', "__").to_uppercase())
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Failures a route reports to the browser
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("{0} is not configured")]
    Unavailable(&'static str),

    #[error("Upstream request failed")]
    Upstream,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ConversationNotFound => StatusCode::NOT_FOUND,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::SessionNotFound => ApiError::ConversationNotFound,
            err => {
                tracing::warn!(error = %err, "Chat backend request failed");
                ApiError::Upstream
            }
        }
    }
}

impl From<VoiceError> for ApiError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::InvalidRequest(msg) => ApiError::BadRequest(msg),
            err => {
                tracing::warn!(error = %err, "Voice provider request failed");
                ApiError::Upstream
            }
        }
    }
}

impl From<TtsError> for ApiError {
    fn from(err: TtsError) -> Self {
        match err {
            TtsError::InvalidInput(msg) => ApiError::BadRequest(msg),
            err => {
                tracing::warn!(error = %err, "Speech provider request failed");
                ApiError::Upstream
            }
        }
    }
}
