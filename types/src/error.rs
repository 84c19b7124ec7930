//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for hashcash parsing, minting and digesting.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HashcashError {
    /// Structurally malformed token text.
    #[error("{0}")]
    Format(String),

    /// Illegal input when building a new token.
    #[error("{0}")]
    Validation(String),

    #[error("unsupported hash function: {0}")]
    UnsupportedHashFunction(String),

    /// The mint search was stopped by its cancellation flag or deadline.
    #[error("minting cancelled before a stamp was found")]
    Cancelled,
}

impl HashcashError {
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
