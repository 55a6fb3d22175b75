//! Movement-chain events with deterministic, content-addressed ids.
//!
//! An event id is the SHA-256 of the canonical serialization
//! `[0, pubkey, created_at, kind, tags, content]` rendered as compact JSON
//! (`,`/`:` separators, no whitespace) with non-ASCII emitted literally.
//! Any change to key order, whitespace or tag order changes the id, so the
//! serializer below is part of the consensus surface.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use cyberspace_core::coords::coord_to_xyz;
use cyberspace_core::sector::{xyz_to_sector_id, SECTOR_BITS};

use crate::error::{DomainError, Result};
use crate::parsing::coord_from_hex;

/// Event kind for movement-chain events.
pub const EVENT_KIND: u32 = 3333;

/// A chain event.
///
/// `sig` is intentionally left empty by this crate; signing happens at
/// publish time, and the id rule does not cover the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// SHA-256 hex of the canonical serialization.
    pub id: String,
    /// 32-byte x-only public key, hex.
    pub pubkey: String,
    /// Unix seconds; informational only, need not be monotonic.
    pub created_at: u64,
    /// Event kind ([`EVENT_KIND`] for movement events).
    pub kind: u32,
    /// Ordered tag list; order is id-relevant.
    pub tags: Vec<Vec<String>>,
    /// Event content (empty for movement events).
    pub content: String,
    /// Reserved for a future Schnorr signature.
    pub sig: String,
}

impl Event {
    /// First value of the first tag with the given key, if any.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.len() >= 2 && t[0] == key)
            .map(|t| t[1].as_str())
    }

    /// Id of the genesis event this hop references, if any.
    pub fn genesis_ref(&self) -> Option<&str> {
        self.event_ref("genesis")
    }

    /// Id of the immediately preceding event this hop references, if any.
    pub fn previous_ref(&self) -> Option<&str> {
        self.event_ref("previous")
    }

    fn event_ref(&self, marker: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.len() >= 4 && t[0] == "e" && t[3] == marker)
            .map(|t| t[1].as_str())
    }

    /// Compact JSON rendering for chain-log lines.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| DomainError::Serialization(e.to_string()))
    }
}

/// Canonical serialization bytes used for the event id.
pub fn serialize_event_for_id(
    pubkey_hex: &str,
    created_at: u64,
    kind: u32,
    tags: &[Vec<String>],
    content: &str,
) -> Result<Vec<u8>> {
    let payload = (0u8, pubkey_hex, created_at, kind, tags, content);
    let json =
        serde_json::to_string(&payload).map_err(|e| DomainError::Serialization(e.to_string()))?;
    Ok(json.into_bytes())
}

/// Event id: SHA-256 hex of the canonical serialization.
pub fn compute_event_id_hex(
    pubkey_hex: &str,
    created_at: u64,
    kind: u32,
    tags: &[Vec<String>],
    content: &str,
) -> Result<String> {
    let bytes = serialize_event_for_id(pubkey_hex, created_at, kind, tags, content)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Build an event with its id computed and an empty signature.
pub fn new_event(
    pubkey_hex: &str,
    created_at: u64,
    kind: u32,
    tags: Vec<Vec<String>>,
    content: &str,
) -> Result<Event> {
    let id = compute_event_id_hex(pubkey_hex, created_at, kind, &tags, content)?;
    Ok(Event {
        id,
        pubkey: pubkey_hex.to_string(),
        created_at,
        kind,
        tags,
        content: content.to_string(),
        sig: String::new(),
    })
}

/// Per-coordinate sector tags: `X`, `Y`, `Z` and the combined `S` tag.
fn sector_tags_from_coord_hex(coord_hex: &str) -> Result<Vec<Vec<String>>> {
    let coord = coord_from_hex(coord_hex)?;
    let (x, y, z, _plane) = coord_to_xyz(&coord);
    let id = xyz_to_sector_id(x, y, z, SECTOR_BITS);
    Ok(vec![
        vec!["X".to_string(), id.sx.to_string()],
        vec!["Y".to_string(), id.sy.to_string()],
        vec!["Z".to_string(), id.sz.to_string()],
        vec!["S".to_string(), id.tag()],
    ])
}

/// Build a spawn (genesis) event carrying the initial coordinate.
pub fn make_spawn_event(pubkey_hex: &str, created_at: u64, coord_hex: &str) -> Result<Event> {
    let mut tags = vec![
        vec!["A".to_string(), "spawn".to_string()],
        vec!["C".to_string(), coord_hex.to_string()],
    ];
    tags.extend(sector_tags_from_coord_hex(coord_hex)?);
    new_event(pubkey_hex, created_at, EVENT_KIND, tags, "")
}

/// Build a hop event linking back to the genesis and previous events.
pub fn make_hop_event(
    pubkey_hex: &str,
    created_at: u64,
    genesis_event_id: &str,
    previous_event_id: &str,
    prev_coord_hex: &str,
    coord_hex: &str,
    proof_hash_hex: &str,
) -> Result<Event> {
    let mut tags = vec![
        vec!["A".to_string(), "hop".to_string()],
        vec![
            "e".to_string(),
            genesis_event_id.to_string(),
            String::new(),
            "genesis".to_string(),
        ],
        vec![
            "e".to_string(),
            previous_event_id.to_string(),
            String::new(),
            "previous".to_string(),
        ],
        vec!["c".to_string(), prev_coord_hex.to_string()],
        vec!["C".to_string(), coord_hex.to_string()],
        vec!["proof".to_string(), proof_hash_hex.to_string()],
    ];
    tags.extend(sector_tags_from_coord_hex(coord_hex)?);
    new_event(pubkey_hex, created_at, EVENT_KIND, tags, "")
}
