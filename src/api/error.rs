//! Error taxonomy for server communication.

use thiserror::Error;

/// Errors surfaced by the HTTP client wrapper.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a usable HTTP response
    /// (connect/DNS failure, or an unreadable body)
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    /// 401 is session-invalidating and handled in the wrapper.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx but reported `success: false`
    #[error("{message}")]
    Application {
        message: String,
        code: Option<String>,
    },
}

impl ApiError {
    /// Application-level error without a machine code
    pub fn application(message: impl Into<String>) -> Self {
        ApiError::Application {
            message: message.into(),
            code: None,
        }
    }

    /// Human-readable message for the notification sink
    pub fn message(&self) -> String {
        match self {
            ApiError::Transport(message) => message.clone(),
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Application { message, .. } => message.clone(),
        }
    }

    /// HTTP status code, when the failure carried one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}
