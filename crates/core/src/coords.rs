//! Bit-interleaved 256-bit coordinates.
//!
//! A coordinate packs three 85-bit unsigned axis values and one plane bit:
//! bit 0 is the plane, and for each `i` in `0..85` bit `1 + 3i` carries z-bit
//! `i`, bit `2 + 3i` carries y-bit `i` and bit `3 + 3i` carries x-bit `i`
//! (1 + 3*85 = 256 bits total).
//!
//! Axis orientation for the GPS mapping starts from the standard
//! Earth-Centered, Earth-Fixed frame and permutes axes to the cyberspace
//! naming convention:
//!
//! - `+X_cs = +X_ecef` (equator at the prime meridian)
//! - `+Y_cs = +Z_ecef` (up through the poles; north is +Y)
//! - `+Z_cs = +Y_ecef` (east; lon=+90 at the equator)

use num_bigint::BigUint;

/// Bits per axis value.
pub const AXIS_BITS: u32 = 85;

/// Number of representable values per axis: `2^85`.
pub const AXIS_UNITS: u128 = 1 << AXIS_BITS;

/// Largest valid axis value.
pub const AXIS_MAX: u128 = AXIS_UNITS - 1;

/// Axis midpoint: `2^84`. The Earth's center maps here.
pub const AXIS_CENTER: u128 = 1 << (AXIS_BITS - 1);

/// Plane bit value for dataspace (the GPS mapping lands here).
pub const PLANE_DATASPACE: u8 = 0;

/// Plane bit value for ideaspace.
pub const PLANE_IDEASPACE: u8 = 1;

/// Human label for a plane bit.
pub fn plane_label(plane: u8) -> &'static str {
    match plane {
        PLANE_DATASPACE => "dataspace",
        PLANE_IDEASPACE => "ideaspace",
        _ => "unknown",
    }
}

/// Interleave `(x, y, z, plane)` into a 256-bit coordinate.
///
/// Axis bits above [`AXIS_BITS`] are ignored; callers validate range.
pub fn xyz_to_coord(x: u128, y: u128, z: u128, plane: u8) -> BigUint {
    let mut bytes = [0u8; 32];
    if plane & 1 == 1 {
        set_bit(&mut bytes, 0);
    }
    for i in 0..AXIS_BITS {
        if (z >> i) & 1 == 1 {
            set_bit(&mut bytes, 1 + i * 3);
        }
        if (y >> i) & 1 == 1 {
            set_bit(&mut bytes, 2 + i * 3);
        }
        if (x >> i) & 1 == 1 {
            set_bit(&mut bytes, 3 + i * 3);
        }
    }
    BigUint::from_bytes_be(&bytes)
}

/// Demultiplex a 256-bit coordinate back into `(x, y, z, plane)`.
///
/// Coordinates are at most 32 bytes by construction (hex input is capped at
/// 64 characters and [`xyz_to_coord`] emits 256 bits).
pub fn coord_to_xyz(coord: &BigUint) -> (u128, u128, u128, u8) {
    let raw = coord.to_bytes_be();
    let mut bytes = [0u8; 32];
    let take = raw.len().min(32);
    bytes[32 - take..].copy_from_slice(&raw[raw.len() - take..]);

    let plane = bytes[31] & 1;
    let mut x = 0u128;
    let mut y = 0u128;
    let mut z = 0u128;
    for i in 0..AXIS_BITS {
        z |= u128::from(get_bit(&bytes, 1 + i * 3)) << i;
        y |= u128::from(get_bit(&bytes, 2 + i * 3)) << i;
        x |= u128::from(get_bit(&bytes, 3 + i * 3)) << i;
    }
    (x, y, z, plane)
}

fn set_bit(bytes: &mut [u8; 32], idx: u32) {
    bytes[31 - (idx / 8) as usize] |= 1 << (idx % 8);
}

fn get_bit(bytes: &[u8; 32], idx: u32) -> u8 {
    (bytes[31 - (idx / 8) as usize] >> (idx % 8)) & 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interleave_doc_example() {
        // (100, 200, 300, plane=0) interleaves to 0x2b50e80.
        let coord = xyz_to_coord(100, 200, 300, PLANE_DATASPACE);
        assert_eq!(coord, BigUint::from(0x2b50e80u64));
        assert_eq!(coord_to_xyz(&coord), (100, 200, 300, 0));
    }

    #[test]
    fn test_plane_bit_is_bit_zero() {
        let c0 = xyz_to_coord(0, 0, 0, PLANE_DATASPACE);
        let c1 = xyz_to_coord(0, 0, 0, PLANE_IDEASPACE);
        assert_eq!(c0, BigUint::from(0u32));
        assert_eq!(c1, BigUint::from(1u32));
    }

    #[test]
    fn test_axis_extremes_round_trip() {
        let coord = xyz_to_coord(AXIS_MAX, 0, AXIS_MAX, PLANE_IDEASPACE);
        assert_eq!(coord_to_xyz(&coord), (AXIS_MAX, 0, AXIS_MAX, 1));

        let coord = xyz_to_coord(AXIS_CENTER, AXIS_CENTER, AXIS_CENTER, PLANE_DATASPACE);
        assert_eq!(
            coord_to_xyz(&coord),
            (AXIS_CENTER, AXIS_CENTER, AXIS_CENTER, 0)
        );
    }

    #[test]
    fn test_single_axis_bits_land_in_distinct_positions() {
        let x = xyz_to_coord(1, 0, 0, 0);
        let y = xyz_to_coord(0, 1, 0, 0);
        let z = xyz_to_coord(0, 0, 1, 0);
        assert_eq!(x, BigUint::from(8u32));
        assert_eq!(y, BigUint::from(4u32));
        assert_eq!(z, BigUint::from(2u32));
    }

    proptest! {
        #[test]
        fn prop_round_trip(x in 0..=AXIS_MAX, y in 0..=AXIS_MAX, z in 0..=AXIS_MAX, plane in 0u8..=1) {
            let coord = xyz_to_coord(x, y, z, plane);
            prop_assert_eq!(coord_to_xyz(&coord), (x, y, z, plane));
        }
    }
}
