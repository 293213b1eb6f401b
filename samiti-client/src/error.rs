//! Client error types
//!
//! Transport failures, non-2xx responses and malformed bodies all end up as
//! a [`ClientError`]; [`ClientError::message`] is what a view shows.

use shared::{ApiFailure, FieldErrors};
use thiserror::Error;

use crate::session::SessionError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required or token rejected (401)
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Permission denied (403)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected input, from the server (400/422) or from local form checks
    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    /// Server-side failure (5xx)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Any other status, or a 2xx envelope with `success: false`
    #[error("{message}")]
    Api {
        status: Option<u16>,
        message: String,
        fields: FieldErrors,
    },

    /// Operation not legal for the entity's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Session persistence failed
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Writing a downloaded artifact failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Local validation failure with a single field problem
    pub fn field(field: impl Into<String>, problem: impl Into<String>) -> Self {
        let problem = problem.into();
        let mut fields = FieldErrors::new();
        fields.insert(field.into(), problem.clone());
        Self::Validation {
            message: problem,
            fields,
        }
    }

    /// Local validation failure from a collected field map
    pub fn invalid_fields(fields: FieldErrors) -> Self {
        let message = match fields.len() {
            1 => fields.values().next().cloned().unwrap_or_default(),
            n => format!("{} fields need attention", n),
        };
        Self::Validation { message, fields }
    }

    /// Human-readable message for the error panel
    pub fn message(&self) -> String {
        match self {
            Self::Http(e) if e.is_timeout() => "The server took too long to respond".to_string(),
            Self::Http(e) if e.is_connect() => "Unable to reach the server".to_string(),
            Self::Http(_) => "Network error, please try again".to_string(),
            Self::InvalidResponse(_) | Self::Serialization(_) => {
                "Unexpected response from the server".to_string()
            }
            Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::InvalidState(msg) => msg.clone(),
            Self::Validation { message, .. }
            | Self::Server { message, .. }
            | Self::Api { message, .. } => message.clone(),
            Self::Session(e) => e.to_string(),
            Self::Io(e) => e.to_string(),
        }
    }

    /// Field-level details, if the failure carried any
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { fields, .. } | Self::Api { fields, .. } if !fields.is_empty() => {
                Some(fields)
            }
            _ => None,
        }
    }

    /// Worth asking again: the outcome may differ on the next attempt
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Server { .. } => true,
            _ => false,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<ApiFailure> for ClientError {
    fn from(failure: ApiFailure) -> Self {
        Self::Api {
            status: None,
            message: failure.message,
            fields: failure.fields,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_message() {
        let err = ClientError::field("mobile", "Mobile must have 10 digits");
        assert_eq!(err.message(), "Mobile must have 10 digits");
        assert_eq!(
            err.field_errors().and_then(|f| f.get("mobile")).map(String::as_str),
            Some("Mobile must have 10 digits")
        );
    }

    #[test]
    fn test_multiple_fields_summarized() {
        let mut fields = FieldErrors::new();
        fields.insert("email".into(), "Email is required".into());
        fields.insert("mobile".into(), "Mobile is required".into());
        let err = ClientError::invalid_fields(fields);
        assert_eq!(err.message(), "2 fields need attention");
    }

    #[test]
    fn test_transient_classification() {
        let gateway = ClientError::Server { status: 503, message: "busy".into() };
        assert!(gateway.is_transient());
        let denied = ClientError::Forbidden("not yours".into());
        assert!(!denied.is_transient());
        assert!(!ClientError::NotFound("order".into()).is_transient());
    }

    #[test]
    fn test_envelope_failure_conversion() {
        let failure = ApiFailure { message: "Duplicate mobile".into(), fields: FieldErrors::new() };
        let err: ClientError = failure.into();
        assert_eq!(err.message(), "Duplicate mobile");
        assert!(err.field_errors().is_none());
    }
}
