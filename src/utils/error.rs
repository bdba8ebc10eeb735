//! Error types for the Formix engine

use thiserror::Error;

/// Main error type for form submission operations
#[derive(Debug, Error)]
pub enum FormixError {
    /// The action attribute could not be resolved to an absolute URL
    #[error("failed to resolve action URL: {0}")]
    Resolve(#[from] url::ParseError),
    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] NetworkError),
}

/// Network-specific errors
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request's cancellation scope was triggered mid-flight
    #[error("request cancelled")]
    Cancelled,
    /// The transport does not handle this URL scheme
    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),
    /// Connection-level failure
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Convenience Result type for Formix operations
pub type Result<T> = std::result::Result<T, FormixError>;
