// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for pooled-http
//!
//! Transport failures are surfaced to the caller. Malformed `Set-Cookie`
//! headers never show up here: they are dropped while the response is
//! processed and the call still succeeds.

use thiserror::Error;

/// Result type alias for pooled-http operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pooled-http
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP engine failure not covered by a more specific variant
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Read, write or connect timeout
    #[error("Operation timed out after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        url: Option<String>,
    },

    /// Connection could not be established
    #[error("Connection to {url} failed: {reason}")]
    Connect { url: String, reason: String },

    /// Response body exceeded the configured limit
    #[error("Response body from {url} exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    /// No connection slot became free within the wait timeout
    #[error("No connection slot for {host} after {waited_ms}ms")]
    PoolTimeout { host: String, waited_ms: u64 },

    /// Header name or value rejected
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// Request body could not be encoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a timeout error with URL
    pub fn timeout_with_url(
        operation: impl Into<String>,
        duration_ms: u64,
        url: impl Into<String>,
    ) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration_ms,
            url: Some(url.into()),
        }
    }

    /// Create a connect error
    pub fn connect(url: impl Into<String>, reason: impl ToString) -> Self {
        Error::Connect {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a timeout error (including pool wait timeouts)
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::PoolTimeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Check if this error came from the transport rather than the caller
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Timeout { .. }
                | Error::Connect { .. }
                | Error::BodyTooLarge { .. }
                | Error::PoolTimeout { .. }
        )
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Timeout { url: Some(u), .. } => Some(u),
            Error::Connect { url, .. } => Some(url),
            Error::BodyTooLarge { url, .. } => Some(url),
            Error::Http(e) => e.url().map(|u| u.as_str()),
            _ => None,
        }
    }
}
