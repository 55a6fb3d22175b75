//! End-to-end tests for the cyberspace protocol stack.
//!
//! This suite validates:
//! - the consensus-critical golden vectors across crate boundaries
//! - full spawn/move flows over a real (temporary) home directory
//! - chain invariants an independent implementation must reproduce

pub mod test_utils;

#[cfg(test)]
mod chain_walk_tests;

#[cfg(test)]
mod golden_vector_tests;
