//! Cyberspace domain model: chain events and input parsing.
//!
//! Pure data and encoding rules with no I/O. The event id rule and the tag
//! layout live here; everything that touches disks or keys lives in the
//! store and identity crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod event;
pub mod parsing;

pub use error::{DomainError, Result};
pub use event::{make_hop_event, make_spawn_event, Event, EVENT_KIND};
pub use parsing::{
    coord_from_hex, coord_to_hex, normalize_hex_32, parse_destination, ParsedDestination,
};
