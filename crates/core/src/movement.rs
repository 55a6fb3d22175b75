//! Movement proofs.
//!
//! The cost of moving between two axis values is the Cantor root of their
//! least-common-ancestor subtree in the binary axis tree: `2^h` consecutive
//! leaves reduced pairwise, bottom-up, with the Cantor pairing function.
//! There is exactly one root per `(base, height)` — no randomized or
//! order-dependent folding — so independent implementations agree bit for
//! bit.

use num_bigint::BigUint;

use crate::cantor::{cantor_pair, sha256_hex, sha256_int_hex};
use crate::error::{CoreError, Result};

/// Default refusal bound for subtree computation. The reduction is `O(2^h)`
/// in both time and memory; this gate is the only defense against an
/// accidental denial of service.
pub const DEFAULT_MAX_COMPUTE_HEIGHT: u32 = 20;

/// LCA height between two axis values: 0 iff equal, else the bit length of
/// their XOR — the smallest `h` with `v1 >> h == v2 >> h`.
pub fn find_lca_height(v1: u128, v2: u128) -> u32 {
    if v1 == v2 {
        0
    } else {
        128 - (v1 ^ v2).leading_zeros()
    }
}

/// Cantor root of the subtree of `2^height` leaves starting at `base`.
///
/// Refuses heights above `max_compute_height`, and heights whose leaf count
/// would not fit in an in-memory level, before allocating anything.
pub fn compute_subtree_cantor(base: u128, height: u32, max_compute_height: u32) -> Result<BigUint> {
    if height > max_compute_height {
        return Err(CoreError::HeightTooLarge {
            height,
            max: max_compute_height,
        });
    }
    if height == 0 {
        return Ok(BigUint::from(base));
    }
    if height >= usize::BITS {
        return Err(CoreError::SubtreeTooLarge { height });
    }

    let leaf_count = 1usize << height;
    let mut values: Vec<BigUint> = (0..leaf_count as u128)
        .map(|i| BigUint::from(base + i))
        .collect();
    while values.len() > 1 {
        values = values
            .chunks(2)
            .map(|pair| cantor_pair(&pair[0], &pair[1]))
            .collect();
    }
    Ok(values.remove(0))
}

/// Cantor root of the LCA subtree between two values on one axis.
pub fn compute_axis_cantor(v1: u128, v2: u128, max_compute_height: u32) -> Result<BigUint> {
    let h = find_lca_height(v1, v2);
    let base = (v1 >> h) << h;
    compute_subtree_cantor(base, h, max_compute_height)
}

/// A 3D movement proof between two coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementProof {
    /// Cantor root of the X-axis LCA subtree.
    pub cantor_x: BigUint,
    /// Cantor root of the Y-axis LCA subtree.
    pub cantor_y: BigUint,
    /// Cantor root of the Z-axis LCA subtree.
    pub cantor_z: BigUint,
    /// `pair(pair(cx, cy), cz)`.
    pub combined: BigUint,
    /// SHA-256 hex of the minimal big-endian bytes of `combined`. Doubles as
    /// the encryption key for location-based lookups.
    pub proof_hash: String,
}

impl MovementProof {
    /// Discovery id: one additional hash over the proof-hash bytes.
    pub fn discovery_id(&self) -> String {
        discovery_id_from_key_hex(&self.proof_hash)
    }
}

/// `sha256(key_bytes)` for a 64-hex-char encryption key / proof hash.
///
/// The key is produced by this crate, so it is always valid hex.
pub fn discovery_id_from_key_hex(key_hex: &str) -> String {
    let bytes = hex::decode(key_hex).unwrap_or_default();
    sha256_hex(&bytes)
}

/// Compute the movement proof between `(x1,y1,z1)` and `(x2,y2,z2)`.
pub fn compute_movement_proof_xyz(
    x1: u128,
    y1: u128,
    z1: u128,
    x2: u128,
    y2: u128,
    z2: u128,
    max_compute_height: u32,
) -> Result<MovementProof> {
    let cantor_x = compute_axis_cantor(x1, x2, max_compute_height)?;
    let cantor_y = compute_axis_cantor(y1, y2, max_compute_height)?;
    let cantor_z = compute_axis_cantor(z1, z2, max_compute_height)?;
    let combined = cantor_pair(&cantor_pair(&cantor_x, &cantor_y), &cantor_z);
    let proof_hash = sha256_int_hex(&combined);
    Ok(MovementProof {
        cantor_x,
        cantor_y,
        cantor_z,
        combined,
        proof_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_lca_height_basics() {
        assert_eq!(find_lca_height(0, 0), 0);
        assert_eq!(find_lca_height(7, 7), 0);
        assert_eq!(find_lca_height(0, 1), 1);
        assert_eq!(find_lca_height(2, 3), 1);
        assert_eq!(find_lca_height(0, 3), 2);
        // Crossing the 2^4 boundary costs height 5.
        assert_eq!(find_lca_height(15, 16), 5);
        assert_eq!(find_lca_height(16, 15), 5);
    }

    #[test]
    fn test_lca_height_shifts_agree() {
        for (a, b) in [(5u128, 9), (100, 101), (1 << 40, (1 << 40) + 12345)] {
            let h = find_lca_height(a, b);
            assert_eq!(a >> h, b >> h);
            if h > 0 {
                assert_ne!(a >> (h - 1), b >> (h - 1));
            }
        }
    }

    #[test]
    fn test_subtree_cantor_height_zero_is_base() {
        assert_eq!(
            compute_subtree_cantor(42, 0, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap(),
            BigUint::from(42u32)
        );
    }

    #[test]
    fn test_subtree_cantor_height_one() {
        // pair(4, 5) = 9*10/2 + 5 = 50.
        assert_eq!(
            compute_subtree_cantor(4, 1, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap(),
            BigUint::from(50u32)
        );
    }

    #[test]
    fn test_subtree_cantor_deterministic_per_block() {
        // Any two values inside the same aligned block share a root.
        let a = compute_axis_cantor(8, 11, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap();
        let b = compute_axis_cantor(10, 9, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_subtree_cantor_refuses_large_heights() {
        assert_eq!(
            compute_subtree_cantor(0, 21, 20),
            Err(CoreError::HeightTooLarge { height: 21, max: 20 })
        );
    }

    #[test]
    fn test_movement_proof_doc_example() {
        // (0,0,0) -> (3,2,1)
        let proof =
            compute_movement_proof_xyz(0, 0, 0, 3, 2, 1, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap();
        assert_eq!(proof.cantor_x, BigUint::from(228u32));
        assert_eq!(proof.cantor_y, BigUint::from(228u32));
        assert_eq!(proof.cantor_z, BigUint::from(2u32));
        assert_eq!(proof.combined, BigUint::from(5452446953u64));
        assert_eq!(
            proof.proof_hash,
            "9306cfcf163adfa9a1f34933091a445bbbc77de02a1e504eba9d6bcd5950b414"
        );
        assert_eq!(
            proof.discovery_id(),
            "1247b1caeb69145100d6adbb52943c36d72023b10a0f5f434d41311d0b0b339c"
        );
    }

    #[test]
    fn test_movement_proof_nearby_coords() {
        // (100,200,300) -> (101,200,300): x crosses within a height-1 block.
        let proof =
            compute_movement_proof_xyz(100, 200, 300, 101, 200, 300, DEFAULT_MAX_COMPUTE_HEIGHT)
                .unwrap();
        assert_eq!(proof.cantor_x, BigUint::from(20402u32));
        assert_eq!(proof.cantor_y, BigUint::from(200u32));
        assert_eq!(proof.cantor_z, BigUint::from(300u32));
        assert_eq!(
            proof.proof_hash,
            "4e02171a1986de2299e3abe37a00b419d853da9bcab7139d76189f5506b138f6"
        );
        assert_eq!(
            proof.discovery_id(),
            "b3e3141659d48d3f7e39a684ab9f193badc11497ea6c3d0f89fefd8e9dbc85c5"
        );
    }

    #[test]
    fn test_proof_of_stationary_move_uses_raw_values() {
        let proof =
            compute_movement_proof_xyz(7, 8, 9, 7, 8, 9, DEFAULT_MAX_COMPUTE_HEIGHT).unwrap();
        assert_eq!(proof.cantor_x, BigUint::from(7u32));
        assert_eq!(proof.cantor_y, BigUint::from(8u32));
        assert_eq!(proof.cantor_z, BigUint::from(9u32));
    }
}
