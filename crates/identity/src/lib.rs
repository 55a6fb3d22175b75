//! Cyberspace avatar identity: secp256k1 keys and bech32 encodings.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod keys;

pub use error::{IdentityError, Result};
pub use keys::{
    decode_npub, decode_nsec, encode_npub, encode_nsec, generate_secret_key, npub_from_hex,
    secret_key_from_nsec_or_hex, secret_key_hex, xonly_pubkey_hex,
};
