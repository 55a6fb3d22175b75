//! Cyberspace movement engine.
//!
//! Sequential orchestration of spawns and hops over the local store: the
//! only component that mutates the current coordinate or appends chain
//! events.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod navigator;

pub use error::{EngineError, Result};
pub use navigator::{HopOutcome, Navigator, SpawnOutcome, WalkOutcome};
