//! Error types for REST calls.
//!
//! Provides classification of transport, HTTP and envelope failures and
//! the user-facing message extraction shared by every store.

use thiserror::Error;

/// Message shown when the server does not provide one.
pub const FALLBACK_MESSAGE: &str = "Something went wrong";

/// Result type for REST calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors that can occur while talking to the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or timeout failure
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    Status {
        status: u16,
        message: Option<String>,
    },

    /// 2xx response whose envelope reports `success: false`
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Endpoint could not be turned into a URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Payload lacks the identity field an operation needs
    #[error("Missing identity field '{0}'")]
    MissingIdentity(String),
}

impl ApiError {
    /// Status code carried by the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            ApiError::Status { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Decode(_) | ApiError::InvalidUrl { .. } | ApiError::MissingIdentity(_) => {
                None
            }
        }
    }

    /// Returns true for 401 and 403.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Server-provided message, or [`FALLBACK_MESSAGE`].
    pub fn user_message(&self) -> String {
        let message = match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.as_str(),
            ApiError::Rejected { message, .. } => message.as_str(),
            _ => "",
        };
        if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message.to_string()
        }
    }
}
