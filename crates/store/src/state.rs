//! Local agent state.
//!
//! Field order matches the sorted-key JSON layout of the state file.

use serde::{Deserialize, Serialize};

/// State format version written by this crate.
pub const STATE_VERSION: &str = "cli-state-v3";

/// A remembered destination coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    /// Normalized 64-char coordinate hex.
    pub coord_hex: String,
    /// Filesystem-safe label.
    pub label: String,
}

/// The persistent local state: identity, position and chain selection.
///
/// The movement orchestrator mutates only `coord_hex` and appends chain
/// events; every other field has explicit creation and selection rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Label of the chain hops are appended to.
    pub active_chain_label: String,
    /// Label of the default toward-walk destination (empty for none).
    #[serde(default)]
    pub active_target_label: String,
    /// Current coordinate, 64-char hex.
    pub coord_hex: String,
    /// Secret key hex. Stored in plaintext; treat the state file like a hot
    /// wallet key.
    pub privkey_hex: String,
    /// 32-byte x-only public key hex.
    pub pubkey_hex: String,
    /// Remembered destinations.
    #[serde(default)]
    pub targets: Vec<Target>,
    /// State format version.
    pub version: String,
}
