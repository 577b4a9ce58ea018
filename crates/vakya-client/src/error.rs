//! Service error types.

use thiserror::Error;

use vakya_core::error::AuthError;

/// Errors that can occur when talking to one of the remote services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service rejected the credentials or the bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response body did not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// An authenticated call was made without a token.
    #[error("not logged in")]
    NotAuthenticated,
}

impl ServiceError {
    /// Classifies a transport failure from `reqwest`.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout(timeout_secs)
        } else {
            ServiceError::NetworkError(err.to_string())
        }
    }

    /// True when the request never got an answer from the server.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ServiceError::Timeout(_) | ServiceError::NetworkError(_)
        )
    }
}

impl From<ServiceError> for AuthError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Timeout(_) | ServiceError::NetworkError(_) => AuthError::Unreachable,
            ServiceError::Unauthorized(message) if !message.is_empty() => {
                AuthError::Rejected(message)
            }
            ServiceError::ApiError { message, .. } if !message.is_empty() => {
                AuthError::Rejected(message)
            }
            _ => AuthError::Unexpected,
        }
    }
}

/// Pulls the user-facing message out of an error body.
///
/// The auth service answers `{"message": ...}` and the sentence service
/// `{"error": ...}`; anything else yields an empty string.
pub(crate) fn server_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_default()
}
