//! Client-side error taxonomy shared by every controller.

use std::time::Duration;

use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Domain,
    Transport,
    Validation,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not logged in")]
    Unauthorized,
    #[error("{0}")]
    Domain(String),
    #[error("server returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("{0}")]
    Selection(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Unauthorized => ErrorCategory::Auth,
            Self::Domain(_) => ErrorCategory::Domain,
            Self::Api { status, .. } => match ErrorCode::from_status(*status) {
                ErrorCode::Unauthorized | ErrorCode::Forbidden => ErrorCategory::Auth,
                ErrorCode::NotFound | ErrorCode::Validation => ErrorCategory::Domain,
                ErrorCode::Internal => ErrorCategory::Transport,
            },
            Self::Transport(_)
            | Self::Timeout(_)
            | Self::Decode(_)
            | Self::Io(_)
            | Self::Task(_) => ErrorCategory::Transport,
            Self::Selection(_) | Self::Url(_) => ErrorCategory::Validation,
        }
    }

    /// Text suitable for a transient on-page message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(message) | Self::Selection(message) => message.clone(),
            Self::Api { message, .. } => message.clone(),
            Self::Unauthorized => "Login required".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for ClientError {
    fn from(value: ApiError) -> Self {
        match value.code {
            ErrorCode::Unauthorized => Self::Unauthorized,
            _ => Self::Domain(value.message),
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
