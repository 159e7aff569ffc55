use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use super::envelope::ErrorCode;

/// Failure reported by the backend through the error envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiFailure {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Map<String, Value>>,
    pub status: u16,
    pub request_id: Option<String>,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.status, self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// Connection, DNS or protocol failure: no response obtained.
    Network,
    Timeout,
    /// A response arrived but carried no error envelope.
    Status,
    Cancelled,
}

/// Failure without an envelope. Never carries an [`ErrorCode`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFailure {
    pub kind: TransportFailureKind,
    pub message: String,
    pub status: Option<u16>,
    pub request_id: Option<String>,
}

impl TransportFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: TransportFailureKind::Network,
            message: message.into(),
            status: None,
            request_id: None,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: TransportFailureKind::Timeout,
            ..Self::network(message)
        }
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self {
            kind: TransportFailureKind::Cancelled,
            ..Self::network(message)
        }
    }

    pub fn status(status: u16, message: impl Into<String>, request_id: Option<String>) -> Self {
        Self {
            kind: TransportFailureKind::Status,
            message: message.into(),
            status: Some(status),
            request_id,
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "request failed with status {}: {}", status, self.message),
            None => write!(f, "transport failure: {}", self.message),
        }
    }
}

/// Error surface of every client operation. Cloneable so one refresh outcome
/// can be handed to every request waiting on it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Api(ApiFailure),

    #[error("{0}")]
    Transport(TransportFailure),

    #[error("Failed to decode response payload: {0}")]
    Decode(String),

    #[error("Failed to decode authentication token: {0}")]
    TokenDecode(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Enumerated classification, present only for envelope failures.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ApiError::Api(failure) => Some(failure.code),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Api(failure) => failure.message.clone(),
            ApiError::Transport(failure) => failure.message.clone(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api(failure) => Some(failure.status),
            ApiError::Transport(failure) => failure.status,
            _ => None,
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            ApiError::Api(failure) => failure.request_id.as_deref(),
            ApiError::Transport(failure) => failure.request_id.as_deref(),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<&Map<String, Value>> {
        match self {
            ApiError::Api(failure) => failure.details.as_ref(),
            _ => None,
        }
    }

    /// HTTP 401, or an envelope with `code = unauthorized`.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401) || self.code() == Some(ErrorCode::Unauthorized)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(TransportFailure {
                kind: TransportFailureKind::Cancelled,
                ..
            })
        )
    }
}

impl From<TransportFailure> for ApiError {
    fn from(failure: TransportFailure) -> Self {
        ApiError::Transport(failure)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_failure(code: ErrorCode, status: u16) -> ApiError {
        ApiError::Api(ApiFailure {
            code,
            message: "nope".to_string(),
            details: None,
            status,
            request_id: Some("req-1".to_string()),
        })
    }

    #[test]
    fn test_transport_failures_have_no_code() {
        let err = ApiError::from(TransportFailure::network("connection refused"));
        assert_eq!(err.code(), None);
        assert_eq!(err.status(), None);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(envelope_failure(ErrorCode::Unauthorized, 401).is_unauthorized());
        // code alone is enough, even with an odd status
        assert!(envelope_failure(ErrorCode::Unauthorized, 400).is_unauthorized());
        assert!(!envelope_failure(ErrorCode::Forbidden, 403).is_unauthorized());

        let bare = ApiError::from(TransportFailure::status(401, "Unauthorized", None));
        assert!(bare.is_unauthorized());
        assert_eq!(bare.code(), None);
    }

    #[test]
    fn test_accessors_expose_correlation() {
        let err = envelope_failure(ErrorCode::Conflict, 409);
        assert_eq!(err.code(), Some(ErrorCode::Conflict));
        assert_eq!(err.request_id(), Some("req-1"));
        assert_eq!(err.message(), "nope");
        assert_eq!(err.to_string(), "conflict (409): nope");
    }

    #[test]
    fn test_cancelled_kind() {
        assert!(ApiError::from(TransportFailure::cancelled("aborted")).is_cancelled());
        assert!(!ApiError::from(TransportFailure::timeout("slow")).is_cancelled());
    }
}
