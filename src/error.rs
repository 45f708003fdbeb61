//! Error type returned by every API call.
//!
//! Exactly one [`ErrorKind`] is reported per failed call. Variants carry
//! plain data so callers can match exhaustively and compare values in tests.

use std::fmt;

use http::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Classified failure of an API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Transport failure, unreadable response body, or a request/response
    /// body that could not be encoded or decoded.
    #[error("{message}")]
    Network {
        /// Human readable description
        message: String,
    },

    /// The service answered with a non-2xx status.
    #[error("{}", display_api(.code.as_deref(), .message))]
    Api {
        /// HTTP status of the response
        status: StatusCode,
        /// Machine readable code from the error envelope, if any
        code: Option<String>,
        /// Message from the error envelope, or `HTTP <status>` when absent
        message: String,
    },

    /// The configured timeout or the per-call deadline expired.
    #[error("{message}")]
    Timeout {
        /// Human readable description
        message: String,
    },
}

fn display_api(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) if !code.is_empty() => format!("[{code}] {message}"),
        _ => message.to_string(),
    }
}

/// Discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Network`].
    Network,
    /// See [`Error::Api`].
    Api,
    /// See [`Error::Timeout`].
    Timeout,
}

impl ErrorKind {
    /// Returns the stable identifier of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network_error",
            Self::Api => "api_error",
            Self::Timeout => "timeout_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error envelope returned by the service: `{"error": {"code", "message"}}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Error {
    /// Creates a [`Error::Network`] error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a [`Error::Timeout`] error with the standard message.
    #[must_use]
    pub fn timeout() -> Self {
        Self::Timeout {
            message: "request timed out".to_string(),
        }
    }

    /// Creates a [`Error::Api`] error.
    #[must_use]
    pub fn api(status: StatusCode, code: Option<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code,
            message: message.into(),
        }
    }

    /// Builds an API error from a non-2xx response body.
    ///
    /// A missing or unparsable envelope falls back to `HTTP <status>`.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let envelope: ErrorEnvelope = serde_json::from_slice(body).unwrap_or_default();
        let code = envelope.error.code.filter(|c| !c.is_empty());
        let message = envelope
            .error
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

        Self::api(status, code, message)
    }

    /// Returns the discriminant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Returns the human readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Network { message } | Self::Api { message, .. } | Self::Timeout { message } => {
                message
            }
        }
    }

    /// Returns the HTTP status for API errors.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the upstream error code for API errors that carry one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}
