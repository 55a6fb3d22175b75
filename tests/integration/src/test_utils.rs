//! Test fixtures shared by the end-to-end suites.

use cyberspace_core::coords::xyz_to_coord;
use cyberspace_domain::{coord_to_hex, make_spawn_event};
use cyberspace_engine::Navigator;
use cyberspace_store::{State, Store, STATE_VERSION};
use tempfile::TempDir;

/// Deterministic test identity (not a real key; state-only tests skip curve
/// validation by construction).
pub const TEST_PUBKEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";

/// Matching throwaway private key hex.
pub const TEST_PRIVKEY: &str = "2222222222222222222222222222222222222222222222222222222222222222";

/// A navigator over a fresh temp home, spawned at the given position with a
/// chain labeled `t`.
pub fn navigator_at(x: u128, y: u128, z: u128, plane: u8) -> (TempDir, Navigator) {
    let dir = TempDir::new().expect("temp home");
    let store = Store::new(dir.path());

    let coord_hex = coord_to_hex(&xyz_to_coord(x, y, z, plane));
    let genesis = make_spawn_event(TEST_PUBKEY, 1700000000, &coord_hex).expect("genesis event");
    store.create_chain("t", &genesis, false).expect("chain");

    store
        .save_state(&State {
            active_chain_label: "t".to_string(),
            active_target_label: String::new(),
            coord_hex,
            privkey_hex: TEST_PRIVKEY.to_string(),
            pubkey_hex: TEST_PUBKEY.to_string(),
            targets: vec![],
            version: STATE_VERSION.to_string(),
        })
        .expect("state");

    (dir, Navigator::new(store))
}
