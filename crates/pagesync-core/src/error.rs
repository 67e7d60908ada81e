//! Error types for Pagesync Core
//!
//! Provides the error taxonomy for page synchronization:
//! - Transport-level network failures (retryable)
//! - Server-side failures (retryable at 5xx)
//! - Authentication rejections (never retried)
//! - Envelope normalization failures (never retried)

use crate::phase::PhaseError;
use crate::retry::Retryable;

/// Failure of a single page fetch
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure before a response was received
    #[error("network error: {message}")]
    Network { message: String },

    /// Non-2xx response from the endpoint
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Credential missing or rejected (401/403)
    #[error("authentication rejected ({status})")]
    Auth { status: u16 },

    /// Response did not match any known pagination envelope
    #[error("malformed page envelope: {message}")]
    Validation { message: String },
}

impl FetchError {
    /// Create a network error
    #[inline]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a server error
    #[inline]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a validation error
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if error is an authentication rejection
    #[inline]
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Check if a retry could plausibly succeed
    ///
    /// Network failures and 5xx responses are transient; auth rejections
    /// and malformed envelopes are not.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Server { status, .. } => *status >= 500,
            Self::Auth { .. } | Self::Validation { .. } => false,
        }
    }
}

impl Retryable for FetchError {
    fn is_retryable(&self) -> bool {
        FetchError::is_retryable(self)
    }
}

/// Failure of a synchronizer operation
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The underlying page fetch failed after retries were exhausted
    #[error("page fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Illegal sync phase transition
    #[error("phase error: {0}")]
    Phase(#[from] PhaseError),
}
