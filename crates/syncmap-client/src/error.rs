//! Error types for the synchronization client.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during a synchronization exchange.
///
/// Every variant is recoverable: the worker logs the failure, skips the
/// merge for that cycle, and tries again on the next one.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure: refused, reset, DNS, or send error.
    #[error("transport error: {0}")]
    Transport(String),

    /// The aggregator answered with a non-success status.
    #[error("aggregator returned status {0}")]
    Status(u16),

    /// The response body could not be parsed as a snapshot.
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// The exchange did not complete within the configured bound.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The aggregator URL could not be parsed at construction.
    #[error("invalid aggregator url: {0}")]
    InvalidUrl(String),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
