//! Error handling for the prediction API module

use crate::logging::LogLevel;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to decode a JSON payload returned by the server
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },
}

impl ApiError {
    pub async fn from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        ApiError::Http { status, message }
    }

    /// Message shown to the user for a failed transport or decode step.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Reqwest(e) => e.to_string(),
            ApiError::Decode(e) => e.to_string(),
            ApiError::Http { status, .. } => format!("HTTP status {}", status),
        }
    }

    /// Classify the error for logging purposes.
    pub fn log_level(&self) -> LogLevel {
        match self {
            // Server errors - temporary issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Bad input or missing endpoint - nothing the client can recover from
            ApiError::Http { status, .. } if (400..=499).contains(status) => LogLevel::Error,

            // Malformed responses
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}
