//! Persistent configuration.

use serde::{Deserialize, Serialize};

/// Config format version written by this crate.
pub const CONFIG_VERSION: &str = "cli-config-v1";

/// Default per-hop LCA height bound for interactive moves.
pub const DEFAULT_MAX_LCA_HEIGHT: u32 = 16;

/// User configuration stored next to the state file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default `max_lca_height` for move commands.
    pub default_max_lca_height: u32,
    /// Config format version.
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_max_lca_height: DEFAULT_MAX_LCA_HEIGHT,
            version: CONFIG_VERSION.to_string(),
        }
    }
}
