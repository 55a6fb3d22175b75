//! Full Cantor reduction trees for debugging.
//!
//! Builds every level of the LCA subtree reduction so the CLI can print the
//! whole pairing tree for small heights. `O(2^h)`; intended for debugging
//! only, with a tighter default cap than the proof path.

use num_bigint::BigUint;

use crate::cantor::cantor_pair;
use crate::error::{CoreError, Result};
use crate::movement::find_lca_height;

/// Default cap for printing full tree levels.
pub const DEFAULT_MAX_DEBUG_HEIGHT: u32 = 16;

/// The LCA subtree between two axis values, with all reduction levels.
#[derive(Debug, Clone)]
pub struct AxisCantorDebug {
    /// First endpoint.
    pub v1: u128,
    /// Second endpoint.
    pub v2: u128,
    /// LCA height between the endpoints.
    pub height: u32,
    /// Aligned subtree base: `(v1 >> height) << height`.
    pub base: u128,
    /// `2^height`.
    pub leaf_count: u128,
    /// Lowest leaf (the base).
    pub leaf_min: u128,
    /// Highest leaf.
    pub leaf_max: u128,
    /// `levels[0]` holds the `2^h` leaves; `levels[h]` holds the root.
    pub levels: Vec<Vec<BigUint>>,
    /// The subtree's Cantor root.
    pub root: BigUint,
}

/// Build every level of the Cantor reduction for a subtree.
pub fn build_cantor_levels(base: u128, height: u32, max_height: u32) -> Result<Vec<Vec<BigUint>>> {
    if height > max_height {
        return Err(CoreError::HeightTooLarge {
            height,
            max: max_height,
        });
    }
    if height >= usize::BITS {
        return Err(CoreError::SubtreeTooLarge { height });
    }

    let leaf_count = 1usize << height;
    let mut cur: Vec<BigUint> = (0..leaf_count as u128)
        .map(|i| BigUint::from(base + i))
        .collect();
    let mut levels = vec![cur.clone()];
    for _ in 0..height {
        cur = cur
            .chunks(2)
            .map(|pair| cantor_pair(&pair[0], &pair[1]))
            .collect();
        levels.push(cur.clone());
    }
    Ok(levels)
}

/// Compute the LCA subtree root between two axis values along with the full
/// tree levels.
pub fn axis_cantor_debug(v1: u128, v2: u128, max_height: u32) -> Result<AxisCantorDebug> {
    let height = find_lca_height(v1, v2);
    let base = (v1 >> height) << height;
    let leaf_count = 1u128 << height;
    let leaf_min = base;
    let leaf_max = base + leaf_count - 1;

    let levels = build_cantor_levels(base, height, max_height)?;
    let root = levels
        .last()
        .and_then(|level| level.first())
        .cloned()
        .unwrap_or_else(|| BigUint::from(base));

    Ok(AxisCantorDebug {
        v1,
        v2,
        height,
        base,
        leaf_count,
        leaf_min,
        leaf_max,
        levels,
        root,
    })
}
