//! Store error types

use thiserror::Error;

/// Errors from local state, config and chain-log persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Event encoding failure.
    #[error(transparent)]
    Domain(#[from] cyberspace_domain::DomainError),

    /// A chain with this label already exists and overwrite was not allowed.
    #[error("chain already exists: {0}")]
    ChainExists(String),

    /// The chain log for this label does not exist.
    #[error("unknown chain: {0}")]
    ChainNotFound(String),

    /// The appended event does not link to the current chain tail. The log
    /// is left unchanged.
    #[error("chain mismatch: tail id {expected} but event references {found}")]
    ChainMismatch {
        /// Id of the current tail event.
        expected: String,
        /// Id the new event claims as its predecessor.
        found: String,
    },

    /// Chain labels must be non-empty.
    #[error("label must be non-empty")]
    EmptyLabel,
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, StoreError>;
