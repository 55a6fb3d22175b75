//! Coordinate-hex normalization and destination parsing.

use num_bigint::BigUint;

use cyberspace_core::coords::coord_to_xyz;

use crate::error::{DomainError, Result};

/// Normalize a hex string into exactly 32 bytes (64 lowercase hex chars).
///
/// Accepts inputs with or without a leading `0x`, with or without leading
/// zeros, and odd lengths: `"0x1"` becomes 63 zeros followed by `1`.
/// Rejects inputs longer than 32 bytes or containing non-hex characters.
pub fn normalize_hex_32(input: &str) -> Result<String> {
    let s = input.trim().to_ascii_lowercase();
    let s = s.strip_prefix("0x").unwrap_or(&s);
    if s.is_empty() {
        return Err(DomainError::EmptyHex);
    }
    if s.len() > 64 {
        return Err(DomainError::HexTooLong);
    }
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DomainError::InvalidHex(input.trim().to_string()));
    }
    Ok(format!("{s:0>64}"))
}

/// Parse a normalized (or normalizable) coordinate hex into its integer.
pub fn coord_from_hex(input: &str) -> Result<BigUint> {
    let norm = normalize_hex_32(input)?;
    BigUint::parse_bytes(norm.as_bytes(), 16)
        .ok_or_else(|| DomainError::InvalidHex(input.to_string()))
}

/// Render a coordinate as 64 lowercase hex characters.
pub fn coord_to_hex(coord: &BigUint) -> String {
    format!("{coord:064x}")
}

/// A parsed move destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDestination {
    /// X-axis value.
    pub x: u128,
    /// Y-axis value.
    pub y: u128,
    /// Z-axis value.
    pub z: u128,
    /// Plane bit.
    pub plane: u8,
    /// Which input form produced this destination.
    pub kind: DestinationKind,
}

/// Input form of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// `x,y,z` or `x,y,z,plane`.
    Xyz,
    /// A 256-bit coordinate hex string.
    Coord,
}

/// Parse a destination string.
///
/// Accepted forms:
/// - `"x,y,z"` or `"x,y,z,plane"` (decimal or `0x`-prefixed integers);
///   without a plane element, `default_plane` is used
/// - a 256-bit coordinate hex string (optional `0x`, leading zeros optional)
pub fn parse_destination(value: &str, default_plane: u8) -> Result<ParsedDestination> {
    let v = value.trim();

    if v.contains(',') {
        let signed = parse_csv_i128(v)?;
        let ints = signed
            .into_iter()
            .map(|i| {
                u128::try_from(i).map_err(|_| {
                    DomainError::InvalidDestination(format!("axis value must be non-negative: {i}"))
                })
            })
            .collect::<Result<Vec<u128>>>()?;

        return match ints.as_slice() {
            [x, y, z] => Ok(ParsedDestination {
                x: *x,
                y: *y,
                z: *z,
                plane: default_plane,
                kind: DestinationKind::Xyz,
            }),
            [x, y, z, plane] => Ok(ParsedDestination {
                x: *x,
                y: *y,
                z: *z,
                plane: (*plane & 1) as u8,
                kind: DestinationKind::Xyz,
            }),
            _ => Err(DomainError::InvalidDestination(
                "xyz form expects 3 or 4 comma-separated integers".to_string(),
            )),
        };
    }

    let coord = coord_from_hex(v)?;
    let (x, y, z, plane) = coord_to_xyz(&coord);
    Ok(ParsedDestination {
        x,
        y,
        z,
        plane,
        kind: DestinationKind::Coord,
    })
}

/// Parse a single non-negative integer, decimal or `0x`-prefixed hex.
pub fn parse_u128_any_radix(s: &str) -> Result<u128> {
    let t = s.trim();
    let parsed = if let Some(h) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        u128::from_str_radix(h, 16)
    } else {
        t.parse()
    };
    parsed.map_err(|_| DomainError::InvalidDestination(format!("invalid integer: {t}")))
}

/// Parse a comma-separated list of signed integers (for relative moves).
pub fn parse_csv_i128(s: &str) -> Result<Vec<i128>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let (negative, body) = match p.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, p),
            };
            let mag = parse_u128_any_radix(body)?;
            let v = i128::try_from(mag)
                .map_err(|_| DomainError::InvalidDestination(format!("integer out of range: {p}")))?;
            Ok(if negative { -v } else { v })
        })
        .collect()
}
