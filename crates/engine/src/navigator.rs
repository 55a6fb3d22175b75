//! Movement orchestrator.
//!
//! Replays a user-issued absolute, relative or toward move into one or more
//! hops. Each successful hop appends its event to the active chain and
//! rewrites local state before the next hop begins; an interrupted walk is
//! consistent up to the last appended hop. Writers are sequential — there is
//! no concurrent access to a chain within the engine.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use cyberspace_core::coords::{coord_to_xyz, xyz_to_coord, AXIS_MAX};
use cyberspace_core::movement::{compute_movement_proof_xyz, find_lca_height};
use cyberspace_core::toward::choose_next_axis_value_toward;
use cyberspace_core::CoreError;
use cyberspace_domain::{
    coord_from_hex, coord_to_hex, make_hop_event, make_spawn_event, ParsedDestination,
};
use cyberspace_identity::{
    encode_nsec, generate_secret_key, npub_from_hex, secret_key_from_nsec_or_hex, secret_key_hex,
    xonly_pubkey_hex,
};
use cyberspace_store::{normalize_label, State, Store, STATE_VERSION};

use crate::error::{EngineError, Result};

/// The movement orchestrator: owns the store handle and issues hops.
pub struct Navigator {
    store: Store,
}

/// Result of creating an identity and genesis chain.
#[derive(Debug, Clone)]
pub struct SpawnOutcome {
    /// Normalized label of the created chain.
    pub chain_label: String,
    /// Spawn coordinate (the pubkey hex).
    pub coord_hex: String,
    /// 32-byte x-only public key hex.
    pub pubkey_hex: String,
    /// bech32 public key.
    pub npub: String,
    /// bech32 secret key.
    pub nsec: String,
}

/// Result of a single appended hop.
#[derive(Debug, Clone)]
pub struct HopOutcome {
    /// New coordinate, 64-char hex.
    pub coord_hex: String,
    /// Proof hash recorded in the hop event.
    pub proof_hash: String,
    /// Chain length after the append.
    pub chain_length: usize,
}

/// Result of a toward-walk.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Hops successfully appended.
    pub hops: u64,
    /// Whether the walk reached the target (coordinate and plane).
    pub arrived: bool,
    /// Whether the walk stopped at the `max_hops` cap.
    pub capped: bool,
    /// Coordinate after the walk, 64-char hex.
    pub coord_hex: String,
}

/// In-memory view of the current position and chain tail during a move.
struct Session {
    state: State,
    label: String,
    genesis_id: String,
    prev_event_id: String,
    x: u128,
    y: u128,
    z: u128,
    plane: u8,
}

impl Navigator {
    /// Orchestrator over a store handle.
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// The backing store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Generate (or import) a keypair and create a fresh chain whose genesis
    /// spawn event carries the pubkey as the initial coordinate.
    pub fn spawn(&self, from_key: Option<&str>, chain_label: Option<&str>) -> Result<SpawnOutcome> {
        let secret = match from_key {
            Some(key) => secret_key_from_nsec_or_hex(key)?,
            None => generate_secret_key(),
        };
        let pubkey_hex = xonly_pubkey_hex(&secret);
        let coord_hex = pubkey_hex.clone();

        let created_at = unix_now()?;
        let label = match chain_label {
            Some(l) => normalize_label(l)?,
            None => format!("chain-{created_at}"),
        };

        let spawn_event = make_spawn_event(&pubkey_hex, created_at, &coord_hex)?;
        self.store.create_chain(&label, &spawn_event, false)?;

        let state = State {
            active_chain_label: label.clone(),
            active_target_label: String::new(),
            coord_hex: coord_hex.clone(),
            privkey_hex: secret_key_hex(&secret),
            pubkey_hex: pubkey_hex.clone(),
            targets: Vec::new(),
            version: STATE_VERSION.to_string(),
        };
        self.store.save_state(&state)?;

        info!(chain = %label, "spawned");

        Ok(SpawnOutcome {
            chain_label: label,
            coord_hex,
            npub: npub_from_hex(&pubkey_hex)?,
            nsec: encode_nsec(&secret)?,
            pubkey_hex,
        })
    }

    /// Single hop to an absolute destination.
    pub fn move_to(&self, dest: &ParsedDestination, max_lca_height: u32) -> Result<HopOutcome> {
        let mut session = self.open_session()?;
        self.hop(&mut session, dest.x, dest.y, dest.z, dest.plane, max_lca_height)
    }

    /// Single hop by a relative delta, with an optional absolute plane.
    pub fn move_by(
        &self,
        dx: i128,
        dy: i128,
        dz: i128,
        plane: Option<u8>,
        max_lca_height: u32,
    ) -> Result<HopOutcome> {
        let mut session = self.open_session()?;
        let x2 = apply_delta(session.x, dx, 'x')?;
        let y2 = apply_delta(session.y, dy, 'y')?;
        let z2 = apply_delta(session.z, dz, 'z')?;
        let plane2 = plane.unwrap_or(session.plane);
        self.hop(&mut session, x2, y2, z2, plane2, max_lca_height)
    }

    /// Walk toward a destination (or the active target) in bounded hops.
    ///
    /// When an axis is pinned at a block edge, one boundary-crossing hop
    /// steps the pinned axes by one toward their targets under a temporary
    /// bound of `max_lca_height + 1`. If the target plane differs, the
    /// final hop once x = y = z = target is the plane switch.
    /// `max_hops` of zero means unbounded.
    pub fn move_toward(
        &self,
        dest: Option<&ParsedDestination>,
        max_lca_height: u32,
        max_hops: u64,
    ) -> Result<WalkOutcome> {
        let mut session = self.open_session()?;

        let (tx, ty, tz, tplane) = match dest {
            Some(d) => (d.x, d.y, d.z, d.plane),
            None => {
                let target = cyberspace_store::targets::current_target(&session.state)
                    .ok_or(EngineError::NoActiveTarget)?;
                let coord = coord_from_hex(&target.coord_hex)?;
                coord_to_xyz(&coord)
            }
        };
        for (axis, value) in [('x', tx), ('y', ty), ('z', tz)] {
            if value > AXIS_MAX {
                return Err(EngineError::AxisOutOfRange {
                    axis,
                    value: value.to_string(),
                });
            }
        }

        let mut hops = 0u64;
        loop {
            if (session.x, session.y, session.z) == (tx, ty, tz) {
                if session.plane == tplane {
                    return Ok(WalkOutcome {
                        hops,
                        arrived: true,
                        capped: false,
                        coord_hex: session.state.coord_hex.clone(),
                    });
                }
                if max_hops != 0 && hops >= max_hops {
                    break;
                }
                // Final plane switch with zero xyz delta.
                self.hop(&mut session, tx, ty, tz, tplane, max_lca_height)?;
                hops += 1;
                continue;
            }

            if max_hops != 0 && hops >= max_hops {
                break;
            }

            let mut pinned = [false; 3];
            let nx = next_axis_value(session.x, tx, max_lca_height, &mut pinned[0])?;
            let ny = next_axis_value(session.y, ty, max_lca_height, &mut pinned[1])?;
            let nz = next_axis_value(session.z, tz, max_lca_height, &mut pinned[2])?;

            let allowed = if pinned.iter().any(|p| *p) {
                let limit = max_lca_height + 1;
                for (axis, current, next, was_pinned) in [
                    ('x', session.x, nx, pinned[0]),
                    ('y', session.y, ny, pinned[1]),
                    ('z', session.z, nz, pinned[2]),
                ] {
                    let height = find_lca_height(current, next);
                    if was_pinned && height > limit {
                        return Err(EngineError::EscapeTooHigh {
                            axis,
                            height,
                            limit,
                        });
                    }
                }
                info!(
                    max_lca_height = limit,
                    "LCA boundary encountered; temporarily increasing max_lca_height for one hop"
                );
                limit
            } else {
                max_lca_height
            };

            let plane = session.plane;
            self.hop(&mut session, nx, ny, nz, plane, allowed)?;
            hops += 1;
        }

        Ok(WalkOutcome {
            hops,
            arrived: false,
            capped: true,
            coord_hex: session.state.coord_hex.clone(),
        })
    }

    fn open_session(&self) -> Result<Session> {
        let state = self
            .store
            .load_state()?
            .ok_or(EngineError::MissingState)?;
        let label = state.active_chain_label.trim().to_string();
        if label.is_empty() {
            return Err(EngineError::MissingActiveChain);
        }

        let events = self.store.read_events(&label)?;
        let genesis_id = events
            .first()
            .map(|e| e.id.clone())
            .ok_or_else(|| EngineError::EmptyChain(label.clone()))?;
        let prev_event_id = events
            .last()
            .map(|e| e.id.clone())
            .unwrap_or_else(|| genesis_id.clone());

        let coord = coord_from_hex(&state.coord_hex)?;
        let (x, y, z, plane) = coord_to_xyz(&coord);

        Ok(Session {
            state,
            label,
            genesis_id,
            prev_event_id,
            x,
            y,
            z,
            plane,
        })
    }

    /// Perform one hop: validate, prove, append the event, rewrite state.
    fn hop(
        &self,
        session: &mut Session,
        x2: u128,
        y2: u128,
        z2: u128,
        plane2: u8,
        allowed_height: u32,
    ) -> Result<HopOutcome> {
        if plane2 != session.plane && (x2, y2, z2) != (session.x, session.y, session.z) {
            return Err(EngineError::PlaneChangeWithMotion);
        }
        for (axis, value) in [('x', x2), ('y', y2), ('z', z2)] {
            if value > AXIS_MAX {
                return Err(EngineError::AxisOutOfRange {
                    axis,
                    value: value.to_string(),
                });
            }
        }

        // The LCA height drives O(2^h) proof compute; gate before computing.
        let hx = find_lca_height(session.x, x2);
        let hy = find_lca_height(session.y, y2);
        let hz = find_lca_height(session.z, z2);
        if hx.max(hy).max(hz) > allowed_height {
            return Err(EngineError::HopTooLarge {
                hx,
                hy,
                hz,
                limit: allowed_height,
            });
        }

        let proof = compute_movement_proof_xyz(
            session.x,
            session.y,
            session.z,
            x2,
            y2,
            z2,
            allowed_height,
        )?;

        let coord_hex = coord_to_hex(&xyz_to_coord(x2, y2, z2, plane2));
        let created_at = unix_now()?;
        let event = make_hop_event(
            &session.state.pubkey_hex,
            created_at,
            &session.genesis_id,
            &session.prev_event_id,
            &session.state.coord_hex,
            &coord_hex,
            &proof.proof_hash,
        )?;

        self.store.append_event(&session.label, &event)?;
        session.state.coord_hex = coord_hex.clone();
        self.store.save_state(&session.state)?;

        session.prev_event_id = event.id;
        session.x = x2;
        session.y = y2;
        session.z = z2;
        session.plane = plane2;

        let chain_length = self.store.chain_length(&session.label)?;
        debug!(
            chain = %session.label,
            len = chain_length,
            coord = %coord_hex,
            proof = %proof.proof_hash,
            "hop appended"
        );

        Ok(HopOutcome {
            coord_hex,
            proof_hash: proof.proof_hash,
            chain_length,
        })
    }
}

/// Next value on one axis, stepping by one out of the block when pinned.
fn next_axis_value(current: u128, target: u128, max_lca_height: u32, pinned: &mut bool) -> Result<u128> {
    match choose_next_axis_value_toward(current, target, max_lca_height) {
        Ok(step) => Ok(step.next),
        Err(CoreError::CannotProgress { .. }) => {
            *pinned = true;
            Ok(if target > current {
                current + 1
            } else {
                current - 1
            })
        }
        Err(e) => Err(e.into()),
    }
}

fn apply_delta(current: u128, delta: i128, axis: char) -> Result<u128> {
    let moved = (current as i128).checked_add(delta);
    match moved {
        Some(v) if v >= 0 && (v as u128) <= AXIS_MAX => Ok(v as u128),
        Some(v) => Err(EngineError::AxisOutOfRange {
            axis,
            value: v.to_string(),
        }),
        None => Err(EngineError::AxisOutOfRange {
            axis,
            value: format!("{current} + {delta}"),
        }),
    }
}

fn unix_now() -> Result<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| EngineError::Clock(e.to_string()))
}
