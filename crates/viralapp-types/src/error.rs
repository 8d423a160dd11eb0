//! Error types for the ViralApp client.

use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

/// Result type alias for ViralApp operations.
pub type Result<T> = std::result::Result<T, ViralAppError>;

/// Errors surfaced by the transport, the handlers and the dispatcher.
#[derive(Error, Debug)]
pub enum ViralAppError {
    /// The remote API answered 404.
    #[error("Resource not found")]
    NotFound {
        /// Raw error body returned by the server, if any.
        body: Option<Value>,
    },

    /// The remote API answered 401.
    #[error("Authentication failed")]
    Unauthorized {
        /// Raw error body returned by the server, if any.
        body: Option<Value>,
    },

    /// The remote API answered 429.
    #[error("Rate limit exceeded")]
    RateLimited {
        /// Raw error body returned by the server, if any.
        body: Option<Value>,
    },

    /// Any other upstream failure, including network errors without a status.
    #[error("{message}")]
    Api {
        /// HTTP status code, absent for network-level failures.
        status: Option<u16>,
        /// Human-readable summary.
        message: String,
        /// Raw error body, preserved unmodified.
        body: Option<Value>,
    },

    /// Caller input is malformed.
    #[error("{0}")]
    Validation(String),

    /// Caller supplied an inconsistent date range.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// No handler table exists for the resource.
    #[error("Unsupported resource \"{resource}\".")]
    UnsupportedResource {
        /// The unresolved resource name.
        resource: String,
    },

    /// The resource exists but has no such operation.
    #[error("Unsupported operation \"{operation}\" for resource \"{resource}\".")]
    UnsupportedOperation {
        /// The resource that was resolved.
        resource: String,
        /// The unresolved operation name.
        operation: String,
    },

    /// Client construction failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of [`ViralAppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// HTTP 404.
    NotFound,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 429.
    RateLimited,
    /// Any other upstream failure.
    Api,
    /// Malformed caller input.
    Validation,
    /// Unknown resource.
    UnsupportedResource,
    /// Unknown operation.
    UnsupportedOperation,
    /// Construction-time configuration failure.
    Config,
}

impl ViralAppError {
    /// Creates a validation error with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::Api { .. } => ErrorKind::Api,
            Self::Validation(_) | Self::DateRange(_) => ErrorKind::Validation,
            Self::UnsupportedResource { .. } => ErrorKind::UnsupportedResource,
            Self::UnsupportedOperation { .. } => ErrorKind::UnsupportedOperation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// Returns the longer hint shown alongside the message, if there is one.
    #[must_use]
    pub const fn description(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => Some(
                "The requested resource could not be found. Please check the ID and try again.",
            ),
            Self::Unauthorized { .. } => Some("Please check your API key in the credentials."),
            Self::RateLimited { .. } => {
                Some("Too many requests. Please wait a moment and try again.")
            }
            Self::UnsupportedResource { .. } => {
                Some("Review the node documentation for supported resources.")
            }
            _ => None,
        }
    }

    /// Returns the HTTP status behind this error, if it came from a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized { .. } => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns the raw server body attached to an upstream failure.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::NotFound { body }
            | Self::Unauthorized { body }
            | Self::RateLimited { body }
            | Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Error for invalid date ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Only one side of the range was supplied.
    #[error("Either provide both Date Range From and Date Range To, or leave both empty.")]
    Incomplete,

    /// A side of the range is not a calendar date.
    #[error("Invalid date range provided.")]
    Unparseable {
        /// The offending input.
        value: String,
    },

    /// Start date is after end date.
    #[error("Date Range From must be on or before Date Range To.")]
    InvalidRange {
        /// The start date.
        from: NaiveDate,
        /// The end date.
        to: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ViralAppError::NotFound { body: None }.kind(), ErrorKind::NotFound);
        assert_eq!(
            ViralAppError::validation("Video ID is required.").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ViralAppError::from(DateRangeError::Incomplete).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ViralAppError::NotFound { body: None }.to_string(),
            "Resource not found"
        );
        assert_eq!(
            ViralAppError::RateLimited { body: None }.to_string(),
            "Rate limit exceeded"
        );
        let err = ViralAppError::UnsupportedOperation {
            resource: "projects".into(),
            operation: "archive".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported operation \"archive\" for resource \"projects\"."
        );
    }

    #[test]
    fn test_status_and_body() {
        let err = ViralAppError::Api {
            status: Some(500),
            message: "boom".into(),
            body: Some(json!({"error": "boom"})),
        };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.body(), Some(&json!({"error": "boom"})));
        assert_eq!(ViralAppError::Unauthorized { body: None }.status(), Some(401));
        assert!(ViralAppError::validation("x").description().is_none());
    }
}
