//! Domain error types

use thiserror::Error;

/// Errors from event encoding and input parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Empty hex input.
    #[error("empty hex string")]
    EmptyHex,

    /// Hex input longer than 32 bytes.
    #[error("hex string too long (expected <= 32 bytes)")]
    HexTooLong,

    /// Non-hex characters in a hex input.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A destination string matched neither the xyz form nor a coord hex.
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    /// Canonical serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, DomainError>;
