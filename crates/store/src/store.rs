//! Filesystem store: home-directory layout, state/config files and
//! append-only chain logs.
//!
//! Layout under the home directory (default `~/.cyberspace`, overridable via
//! `CYBERSPACE_HOME`):
//!
//! - `state.json` — local agent state, rewritten atomically
//! - `config.json` — user configuration, rewritten atomically
//! - `chains/<label>.jsonl` — one compact-JSON event per line
//!
//! The store is constructed from an explicit home path so tests never race
//! on environment variables; [`Store::from_env`] applies the overrides the
//! CLI honors. Writers must be serialized per label; appends are single
//! whole-line writes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use cyberspace_domain::Event;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::state::State;

/// Environment variable overriding the home directory.
pub const HOME_ENV: &str = "CYBERSPACE_HOME";

/// Environment variable overriding the state file path (useful for tests).
pub const STATE_PATH_ENV: &str = "CYBERSPACE_STATE_PATH";

/// Handle on the on-disk layout.
#[derive(Debug, Clone)]
pub struct Store {
    home: PathBuf,
    state_path: PathBuf,
}

impl Store {
    /// Store rooted at an explicit home directory.
    pub fn new(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        let state_path = home.join("state.json");
        Self { home, state_path }
    }

    /// Store honoring `CYBERSPACE_HOME` and `CYBERSPACE_STATE_PATH`.
    pub fn from_env() -> Self {
        let home = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".cyberspace")
            });
        let mut store = Self::new(home);
        if let Some(p) = std::env::var_os(STATE_PATH_ENV) {
            store.state_path = PathBuf::from(p);
        }
        store
    }

    /// The home directory backing this store.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Path of the state file.
    pub fn state_path(&self) -> &Path {
        &self.state_path
    }

    /// Path of the config file.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.json")
    }

    /// Directory holding one log file per chain label.
    pub fn chains_dir(&self) -> PathBuf {
        self.home.join("chains")
    }

    /// Path of the log for a (normalized) chain label.
    pub fn chain_path(&self, label: &str) -> Result<PathBuf> {
        Ok(self.chains_dir().join(format!("{}.jsonl", normalize_label(label)?)))
    }

    // ----- state -----

    /// Load the state file, or `None` if it does not exist yet.
    pub fn load_state(&self) -> Result<Option<State>> {
        if !self.state_path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.state_path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Rewrite the state file atomically (write-temp then rename).
    pub fn save_state(&self, state: &State) -> Result<()> {
        let json = format!("{}\n", serde_json::to_string_pretty(state)?);
        write_atomic(&self.state_path, json.as_bytes())?;
        debug!(path = %self.state_path.display(), "state saved");
        Ok(())
    }

    // ----- config -----

    /// Load the config file; missing or unreadable config yields defaults.
    pub fn load_config(&self) -> Config {
        let path = self.config_path();
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!(path = %path.display(), error = %e, "malformed config, using defaults");
                Config::default()
            }),
            Err(_) => Config::default(),
        }
    }

    /// Rewrite the config file atomically.
    pub fn save_config(&self, config: &Config) -> Result<()> {
        let json = format!("{}\n", serde_json::to_string_pretty(config)?);
        write_atomic(&self.config_path(), json.as_bytes())
    }

    // ----- chains -----

    /// Create a new chain log seeded with its genesis event.
    pub fn create_chain(&self, label: &str, genesis: &Event, overwrite: bool) -> Result<()> {
        let path = self.chain_path(label)?;
        if path.exists() && !overwrite {
            return Err(StoreError::ChainExists(normalize_label(label)?));
        }
        ensure_parent(&path)?;
        let line = format!("{}\n", genesis.to_json_line()?);
        write_atomic(&path, line.as_bytes())
    }

    /// Append a hop event to a chain log.
    ///
    /// The event's `previous` reference must match the id of the current
    /// tail event; on mismatch the log is left unchanged.
    pub fn append_event(&self, label: &str, event: &Event) -> Result<()> {
        let path = self.chain_path(label)?;
        if !path.exists() {
            return Err(StoreError::ChainNotFound(normalize_label(label)?));
        }

        let events = self.read_events(label)?;
        let tail_id = match events.last() {
            Some(e) => e.id.clone(),
            None => return Err(StoreError::ChainNotFound(normalize_label(label)?)),
        };
        let claimed = event.previous_ref().unwrap_or_default();
        if claimed != tail_id {
            return Err(StoreError::ChainMismatch {
                expected: tail_id,
                found: claimed.to_string(),
            });
        }

        // One complete line per write call; single writer per label.
        let line = format!("{}\n", event.to_json_line()?);
        let mut file = fs::OpenOptions::new().append(true).open(&path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Read every event in a chain log, in append order.
    pub fn read_events(&self, label: &str) -> Result<Vec<Event>> {
        let path = self.chain_path(label)?;
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path)?;
        raw.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| serde_json::from_str(l).map_err(StoreError::from))
            .collect()
    }

    /// Number of events in a chain log (0 for a missing chain).
    pub fn chain_length(&self, label: &str) -> Result<usize> {
        let path = self.chain_path(label)?;
        if !path.exists() {
            return Ok(0);
        }
        let raw = fs::read_to_string(&path)?;
        Ok(raw.lines().filter(|l| !l.trim().is_empty()).count())
    }

    /// Sorted labels of every chain log under the chains directory.
    pub fn list_chain_labels(&self) -> Result<Vec<String>> {
        let dir = self.chains_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut labels = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("jsonl") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    labels.push(stem.to_string());
                }
            }
        }
        labels.sort();
        Ok(labels)
    }
}

/// Normalize a chain label into a filesystem-safe identifier: runs of
/// characters outside `[A-Za-z0-9._-]` collapse to a single `_`.
pub fn normalize_label(label: &str) -> Result<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyLabel);
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut in_bad_run = false;
    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
            in_bad_run = false;
        } else if !in_bad_run {
            out.push('_');
            in_bad_run = true;
        }
    }
    Ok(out)
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a file via a temp sibling and atomic rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
