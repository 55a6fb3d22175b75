//! Core error types

use thiserror::Error;

/// Error type for the deterministic protocol core.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Division by zero inside the decimal kernel.
    #[error("decimal division by zero")]
    DivisionByZero,

    /// Square root of a negative decimal.
    #[error("square root of a negative decimal")]
    NegativeSqrt,

    /// A decimal string could not be parsed.
    #[error("invalid decimal: {0}")]
    InvalidDecimal(String),

    /// The trig Taylor series failed to terminate within the iteration cap.
    /// Indicates a broken decimal context; there is no recovery.
    #[error("{func}() Taylor series did not converge within {iterations} iterations")]
    TrigNonConvergence {
        /// Which series failed.
        func: &'static str,
        /// The iteration cap that was exhausted.
        iterations: u32,
    },

    /// A Cantor subtree was requested above the caller's compute bound.
    #[error("height {height} exceeds max_compute_height {max}")]
    HeightTooLarge {
        /// Requested subtree height.
        height: u32,
        /// The caller's bound.
        max: u32,
    },

    /// A Cantor subtree would not fit in an in-memory level.
    #[error("subtree of height {height} exceeds the maximum collection size")]
    SubtreeTooLarge {
        /// Requested subtree height.
        height: u32,
    },

    /// Toward-pathing needs a height bound of at least one to make progress.
    #[error("max_lca_height must be >= 1 to make progress")]
    HeightBoundTooSmall,

    /// Toward-pathing is pinned at a block edge; the caller must either give
    /// up or issue a boundary-crossing hop.
    #[error("cannot progress from {current} toward {target} with max_lca_height={max_lca_height}")]
    CannotProgress {
        /// Pinned axis value.
        current: u128,
        /// Axis target.
        target: u128,
        /// The bound in force.
        max_lca_height: u32,
    },
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, CoreError>;
