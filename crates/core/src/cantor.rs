//! Big-integer hashing primitives: minimal big-endian serialization, SHA-256
//! wrappers and the Cantor pairing function.
//!
//! Proof hashes are computed over the *minimal* big-endian byte string of an
//! unbounded integer, so the serialization here is part of the consensus
//! surface: zero is a single zero byte, everything else drops leading zeros.

use num_bigint::BigUint;
use num_traits::Zero;
use sha2::{Digest, Sha256};

/// Minimal big-endian bytes of a non-negative integer (`[0]` for zero).
pub fn int_to_bytes_be_min(n: &BigUint) -> Vec<u8> {
    if n.is_zero() {
        vec![0]
    } else {
        n.to_bytes_be()
    }
}

/// `0x`-prefixed hex of the minimal big-endian bytes (`0x00` for zero).
///
/// Cantor roots grow far beyond 256 bits; hex over the minimal bytes stays
/// readable where a base-10 rendering would not.
pub fn int_to_hex_be_min(n: &BigUint) -> String {
    format!("0x{}", hex::encode(int_to_bytes_be_min(n)))
}

/// SHA-256 digest of a byte string.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 digest as 64 lowercase hex characters.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

/// SHA-256 hex of the minimal big-endian bytes of an integer.
pub fn sha256_int_hex(n: &BigUint) -> String {
    sha256_hex(&int_to_bytes_be_min(n))
}

/// Cantor pairing: `pair(a, b) = (a + b)(a + b + 1)/2 + b`.
pub fn cantor_pair(a: &BigUint, b: &BigUint) -> BigUint {
    let s = a + b;
    (&s * (&s + 1u32)) / 2u32 + b
}
