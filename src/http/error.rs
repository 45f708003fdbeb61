//! Error types for HTTP transport operations.

use thiserror::Error;

/// Error type for a single HTTP exchange.
///
/// Describes what went wrong at the transport level without dictating
/// recovery strategy; the engine decides which variants are retried.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network connection failed.
    ///
    /// This includes DNS resolution failures, connection refused,
    /// and other network-level errors.
    #[error("Connection error: {0}")]
    Connection(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request timed out inside the transport.
    #[error("Request timed out")]
    Timeout,

    /// The provided URL is invalid.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response headers arrived but the body could not be read.
    #[error("Body read error: {0}")]
    Body(#[source] Box<dyn std::error::Error + Send + Sync>),
}
