//! Engine error types

use thiserror::Error;

/// Errors from the movement orchestrator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Core algorithm failure (proof bounds, pathing, decimal kernel).
    #[error(transparent)]
    Core(#[from] cyberspace_core::CoreError),

    /// Event encoding or input parsing failure.
    #[error(transparent)]
    Domain(#[from] cyberspace_domain::DomainError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] cyberspace_store::StoreError),

    /// Key handling failure.
    #[error(transparent)]
    Identity(#[from] cyberspace_identity::IdentityError),

    /// No state file; the agent has not spawned yet.
    #[error("no local state found; run `cyberspace spawn` first")]
    MissingState,

    /// State exists but no chain is selected.
    #[error("no active chain selected; create one with `cyberspace spawn`")]
    MissingActiveChain,

    /// The active chain log holds no events.
    #[error("chain is empty: {0}")]
    EmptyChain(String),

    /// A destination axis left the `[0, 2^85 - 1]` domain.
    #[error("destination out of axis range on {axis}: {value}")]
    AxisOutOfRange {
        /// Axis name.
        axis: char,
        /// Offending value (signed so relative underflows stay readable).
        value: String,
    },

    /// A single hop would exceed the LCA-height bound on some axis.
    #[error(
        "move too large for a single hop: LCA heights X={hx} Y={hy} Z={hz}, limit {limit}; \
         break it into smaller hops or raise --max-lca-height"
    )]
    HopTooLarge {
        /// X-axis LCA height.
        hx: u32,
        /// Y-axis LCA height.
        hy: u32,
        /// Z-axis LCA height.
        hz: u32,
        /// Height bound in force.
        limit: u32,
    },

    /// Plane flips must keep x, y and z unchanged.
    #[error("plane changes require x, y and z to stay unchanged")]
    PlaneChangeWithMotion,

    /// A boundary-crossing escape would still exceed the bumped bound.
    #[error("boundary escape on {axis} needs height {height}, above the allowed {limit}")]
    EscapeTooHigh {
        /// Axis name.
        axis: char,
        /// Height the one-step escape would cost.
        height: u32,
        /// The temporarily raised bound.
        limit: u32,
    },

    /// A toward-walk was requested with no destination and no active target.
    #[error("no destination given and no active target selected")]
    NoActiveTarget,

    /// The system clock is unusable.
    #[error("system clock error: {0}")]
    Clock(String),
}

/// Crate-local result alias.
pub type Result<T> = std::result::Result<T, EngineError>;
