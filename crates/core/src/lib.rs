//! Cyberspace protocol core.
//!
//! The deterministic algorithms every implementation must agree on bit for
//! bit: the 256-bit coordinate codec, the canonical GPS → dataspace pipeline,
//! Cantor-tree movement proofs, bounded toward-pathing and the sector grid.
//! Everything here is a pure function over its inputs; nothing suspends or
//! touches the environment.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cantor;
pub mod coords;
pub mod decimal;
pub mod error;
pub mod geodetic;
pub mod logging;
pub mod movement;
pub mod movement_debug;
pub mod sector;
pub mod toward;

pub use error::{CoreError, Result};
