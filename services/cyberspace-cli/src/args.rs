//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

/// Manage a local movement chain in cyberspace.
///
/// Publishing to relays is intentionally not implemented; every command
/// operates on the local state and chain logs under `~/.cyberspace`
/// (override with `CYBERSPACE_HOME`).
#[derive(Debug, Parser)]
#[command(name = "cyberspace", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate/import a keypair and create a new local chain with a spawn
    /// event.
    Spawn {
        /// Existing key as NIP-19 nsec... or 32-byte hex.
        #[arg(long = "from-key")]
        from_key: Option<String>,
        /// Chain label to create (default: chain-<unix_ts>).
        #[arg(long)]
        chain: Option<String>,
    },

    /// Show the current coordinate (and decoded x/y/z/plane).
    Whereami,

    /// Show the current sector id per axis (2^30 axis-units per sector).
    Sector,

    /// Convert GPS to a dataspace coordinate.
    Gps(GpsArgs),

    /// Debug Cantor movement/encryption numbers between two coordinates.
    Cantor(CantorArgs),

    /// Move locally by appending hop events to the active chain.
    ///
    /// With none of --to/--by/--toward, moves toward the active target.
    Move(MoveArgs),

    /// Show the active chain.
    History {
        /// Max events to print.
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Print raw event JSON objects (one per line).
        #[arg(long = "json")]
        json_out: bool,
    },

    /// Inspect and select chains.
    #[command(subcommand)]
    Chain(ChainCommand),

    /// Manage remembered target coordinates.
    #[command(subcommand)]
    Target(TargetCommand),

    /// Show or change persistent configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `gps`.
#[derive(Debug, Args)]
pub struct GpsArgs {
    /// Either 'lat,lon' (works with negative lon) or omit and use
    /// --lat/--lon.
    #[arg(allow_hyphen_values = true)]
    pub at: Option<String>,
    /// Latitude (alternative to 'lat,lon').
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<String>,
    /// Longitude (alternative to 'lat,lon').
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<String>,
    /// Altitude in meters.
    #[arg(long = "alt", default_value = "0", allow_hyphen_values = true)]
    pub altitude_m: String,
    /// Keep the given altitude instead of clamping to the WGS84 surface.
    #[arg(long = "no-clamp")]
    pub no_clamp: bool,
}

/// Arguments for `cantor`.
#[derive(Debug, Args)]
pub struct CantorArgs {
    /// 256-bit coord hex (with optional 0x; leading zeros optional).
    #[arg(long = "from-coord")]
    pub from_coord: Option<String>,
    /// 256-bit coord hex (with optional 0x; leading zeros optional).
    #[arg(long = "to-coord")]
    pub to_coord: Option<String>,
    /// x,y,z (u85 integers).
    #[arg(long = "from-xyz")]
    pub from_xyz: Option<String>,
    /// x,y,z (u85 integers).
    #[arg(long = "to-xyz")]
    pub to_xyz: Option<String>,
    /// Plane bit (only used with --from-xyz/--to-xyz).
    #[arg(long, default_value_t = 0)]
    pub plane: u8,
    /// Max LCA height to print full Cantor tree levels.
    #[arg(long = "max-height", default_value_t = 8)]
    pub max_height: u32,
    /// Refuse to compute Cantor roots if any axis LCA height exceeds this
    /// (O(2^h)).
    #[arg(long = "max-compute-height", default_value_t = 20)]
    pub max_compute_height: u32,
}

/// Arguments for `move`.
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Destination as x,y,z[,plane] OR 256-bit coord hex.
    #[arg(long, allow_hyphen_values = true)]
    pub to: Option<String>,
    /// Relative dx,dy,dz[,plane] as comma-separated ints.
    #[arg(long, allow_hyphen_values = true)]
    pub by: Option<String>,
    /// Continuously make hops toward a destination (x,y,z[,plane] or coord
    /// hex).
    #[arg(long, allow_hyphen_values = true)]
    pub toward: Option<String>,
    /// Refuse moves if any axis LCA height exceeds this (defaults to the
    /// configured value).
    #[arg(long = "max-lca-height")]
    pub max_lca_height: Option<u32>,
    /// Stop after this many hops when walking toward (0 means until
    /// reached).
    #[arg(long = "max-hops", default_value_t = 0)]
    pub max_hops: u64,
}

/// `chain` subcommands.
#[derive(Debug, Subcommand)]
pub enum ChainCommand {
    /// List known local chains and show which is active.
    List,
    /// Set the active chain label in local state.
    Use {
        /// Chain label.
        label: String,
    },
    /// Show active chain status (length + delta from spawn in X/Y/Z).
    Status,
}

/// `target` subcommands.
#[derive(Debug, Subcommand)]
pub enum TargetCommand {
    /// Remember a coordinate and make it the active target.
    Set {
        /// 256-bit coord hex (with optional 0x; leading zeros optional).
        coord: String,
        /// Label for the target (default: unnamed_N).
        #[arg(long)]
        label: Option<String>,
    },
    /// List remembered targets.
    List,
    /// Select an existing target by label.
    Use {
        /// Target label.
        label: String,
    },
}

/// `config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show,
    /// Set the default per-hop LCA height bound.
    SetMaxLcaHeight {
        /// New default (a small positive integer).
        value: u32,
    },
}
