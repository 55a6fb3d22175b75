//! Avatar keypairs.
//!
//! An avatar identity is a secp256k1 keypair; the 32-byte x-only public key
//! is both the wire identity and the spawn coordinate. Keys travel as hex or
//! as bech32 `npub`/`nsec` strings.

use bech32::{Bech32, Hrp};
use secp256k1::{Keypair, Secp256k1, SecretKey, XOnlyPublicKey};
use zeroize::Zeroizing;

use crate::error::{IdentityError, Result};

const NSEC_HRP: &str = "nsec";
const NPUB_HRP: &str = "npub";

/// Generate a fresh random secret key.
pub fn generate_secret_key() -> SecretKey {
    SecretKey::new(&mut rand::thread_rng())
}

/// Hex of the 32-byte x-only public key for a secret key.
pub fn xonly_pubkey_hex(secret: &SecretKey) -> String {
    let secp = Secp256k1::new();
    let keypair = Keypair::from_secret_key(&secp, secret);
    let (xonly, _parity) = XOnlyPublicKey::from_keypair(&keypair);
    hex::encode(xonly.serialize())
}

/// Hex of the secret key bytes.
pub fn secret_key_hex(secret: &SecretKey) -> String {
    hex::encode(secret.secret_bytes())
}

/// Encode a secret key as a bech32 `nsec` string.
pub fn encode_nsec(secret: &SecretKey) -> Result<String> {
    encode_key(NSEC_HRP, &secret.secret_bytes())
}

/// Encode a 32-byte x-only public key as a bech32 `npub` string.
pub fn encode_npub(pubkey: &[u8; 32]) -> Result<String> {
    encode_key(NPUB_HRP, pubkey)
}

/// Encode a 64-char x-only public key hex as a bech32 `npub` string.
pub fn npub_from_hex(pubkey_hex: &str) -> Result<String> {
    let raw = hex::decode(pubkey_hex).map_err(|e| IdentityError::InvalidBech32(e.to_string()))?;
    let bytes: [u8; 32] = raw
        .try_into()
        .map_err(|v: Vec<u8>| IdentityError::WrongLength(v.len()))?;
    encode_npub(&bytes)
}

fn encode_key(hrp: &'static str, bytes: &[u8; 32]) -> Result<String> {
    let hrp = Hrp::parse(hrp).map_err(|e| IdentityError::InvalidBech32(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, bytes).map_err(|e| IdentityError::InvalidBech32(e.to_string()))
}

/// Decode and validate a bech32 `nsec` string.
pub fn decode_nsec(nsec: &str) -> Result<SecretKey> {
    let bytes = decode_key(NSEC_HRP, nsec)?;
    SecretKey::from_slice(&bytes).map_err(|e| IdentityError::InvalidSecretKey(e.to_string()))
}

/// Decode a bech32 `npub` string into the 32 x-only public key bytes.
pub fn decode_npub(npub: &str) -> Result<[u8; 32]> {
    let bytes = decode_key(NPUB_HRP, npub)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

fn decode_key(expected_hrp: &'static str, encoded: &str) -> Result<Zeroizing<Vec<u8>>> {
    let (hrp, data) =
        bech32::decode(encoded).map_err(|e| IdentityError::InvalidBech32(e.to_string()))?;
    let data = Zeroizing::new(data);
    if hrp.as_str() != expected_hrp {
        return Err(IdentityError::WrongPrefix {
            expected: expected_hrp,
            found: hrp.to_string(),
        });
    }
    if data.len() != 32 {
        return Err(IdentityError::WrongLength(data.len()));
    }
    Ok(data)
}

/// Import a secret key from either an `nsec1...` string or 32-byte hex.
pub fn secret_key_from_nsec_or_hex(input: &str) -> Result<SecretKey> {
    let s = input.trim();
    if s.starts_with("nsec1") {
        return decode_nsec(s);
    }
    let h = s.strip_prefix("0x").unwrap_or(s);
    let raw = Zeroizing::new(
        hex::decode(h).map_err(|e| IdentityError::InvalidSecretKey(e.to_string()))?,
    );
    if raw.len() != 32 {
        return Err(IdentityError::WrongLength(raw.len()));
    }
    SecretKey::from_slice(&raw).map_err(|e| IdentityError::InvalidSecretKey(e.to_string()))
}
