//! Identity error types

use thiserror::Error;

/// Errors from key handling and bech32 encoding.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A secret key failed curve validation or had the wrong length.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// A bech32 string failed to decode.
    #[error("invalid bech32: {0}")]
    InvalidBech32(String),

    /// A bech32 string carried an unexpected human-readable part.
    #[error("unexpected bech32 prefix: expected {expected}, found {found}")]
    WrongPrefix {
        /// The HRP the caller asked for.
        expected: &'static str,
        /// The HRP actually present.
        found: String,
    },

    /// Decoded key material had the wrong length.
    #[error("expected 32-byte key, found {0} bytes")]
    WrongLength(usize),
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, IdentityError>;
