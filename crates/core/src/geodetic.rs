//! Canonical GPS → dataspace pipeline.
//!
//! WGS84 geodetic (lat, lon, altitude) → ECEF meters → kilometers → permuted
//! cyberspace axes → unsigned 85-bit axis values. Every step runs in the
//! 96-digit half-even decimal context from [`crate::decimal`]; see that
//! module for why floats are banned from this path.
//!
//! Dataspace cube sizing: the full axis spans 96,056 km, so the Earth's
//! center (kilometer zero on every axis) maps to the axis midpoint `2^84`.

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use once_cell::sync::Lazy;

use crate::coords::{xyz_to_coord, AXIS_CENTER, AXIS_MAX, AXIS_UNITS, PLANE_DATASPACE};
use crate::decimal::{sin_cos, Dec, PI};
use crate::error::Result;

/// Full dataspace axis length in kilometers.
pub const DATASPACE_AXIS_KM: u64 = 96_056;

/// WGS84 semi-major axis in meters.
static WGS84_A_M: Lazy<Dec> = Lazy::new(|| Dec::from_u64(6_378_137));

/// WGS84 flattening `f = 1/298.257223563`, derived in the working context.
static WGS84_F: Lazy<Dec> = Lazy::new(|| {
    Dec::one()
        .div(&Dec::parse("298.257223563").expect("WGS84 flattening constant"))
        .expect("nonzero denominator")
});

/// WGS84 first eccentricity squared `e^2 = f(2 - f)`.
static WGS84_E2: Lazy<Dec> =
    Lazy::new(|| &*WGS84_F * &(&Dec::from_u64(2) - &*WGS84_F));

/// Axis units per kilometer: `2^85 / 96056`.
static UNITS_PER_KM: Lazy<Dec> = Lazy::new(|| {
    Dec::from_u128(AXIS_UNITS)
        .div(&Dec::from_u64(DATASPACE_AXIS_KM))
        .expect("nonzero denominator")
});

static D180: Lazy<Dec> = Lazy::new(|| Dec::from_u64(180));
static D360: Lazy<Dec> = Lazy::new(|| Dec::from_u64(360));

/// Wrap longitude into `[-180, 180)` degrees: `(lon + 180) mod 360 - 180`
/// with a floored (non-negative) modulus, so the invariant holds for every
/// input.
fn wrap_lon_deg(lon: &Dec) -> Result<Dec> {
    let shifted = lon + &*D180;
    let mut r = shifted.rem_trunc(&D360)?;
    if r < Dec::zero() {
        r = &r + &*D360;
    }
    Ok(&r - &*D180)
}

/// WGS84 geodetic (degrees, meters) → ECEF (x, y, z) meters.
///
/// Latitude is clamped to `[-90, 90]`; longitude is wrapped to `[-180, 180)`.
pub fn geodetic_to_ecef_m(lat_deg: &Dec, lon_deg: &Dec, alt_m: &Dec) -> Result<(Dec, Dec, Dec)> {
    let ninety = Dec::from_u64(90);
    let neg_ninety = -&ninety;
    let lat_d = if *lat_deg < neg_ninety {
        neg_ninety
    } else if *lat_deg > ninety {
        ninety
    } else {
        lat_deg.clone()
    };
    let lon_d = wrap_lon_deg(lon_deg)?;

    // degrees -> radians
    let lat = (&lat_d * &*PI).div(&D180)?;
    let lon = (&lon_d * &*PI).div(&D180)?;

    let (sin_lat, cos_lat) = sin_cos(&lat)?;
    let (sin_lon, cos_lon) = sin_cos(&lon)?;

    // Radius of curvature in the prime vertical.
    let one = Dec::one();
    let e2_sin2 = &(&*WGS84_E2 * &sin_lat) * &sin_lat;
    let n = WGS84_A_M.div(&(&one - &e2_sin2).sqrt()?)?;

    let n_plus_h = &n + alt_m;
    let x = &(&n_plus_h * &cos_lat) * &cos_lon;
    let y = &(&n_plus_h * &cos_lat) * &sin_lon;
    let z = &(&(&n * &(&one - &*WGS84_E2)) + alt_m) * &sin_lat;
    Ok((x, y, z))
}

/// Map kilometers-from-center into an unsigned 85-bit axis value.
///
/// The half-even rounding here is the consensus-critical final step.
fn km_to_axis_u(km_from_center: &Dec) -> u128 {
    let u = &(km_from_center * &*UNITS_PER_KM) + &Dec::from_u128(AXIS_CENTER);
    let rounded = u.to_integral_half_even();
    clamp_axis(rounded)
}

fn clamp_axis(v: BigInt) -> u128 {
    if v < BigInt::from(0u32) {
        0
    } else if v > BigInt::from(AXIS_MAX) {
        AXIS_MAX
    } else {
        v.to_u128().unwrap_or(AXIS_MAX)
    }
}

/// ECEF kilometers → dataspace (x, y, z) axis values, applying the axis
/// permutation `X_cs = X_ecef`, `Y_cs = Z_ecef`, `Z_cs = Y_ecef`.
pub fn ecef_km_to_dataspace_xyz(x_km: &Dec, y_km: &Dec, z_km: &Dec) -> (u128, u128, u128) {
    (km_to_axis_u(x_km), km_to_axis_u(z_km), km_to_axis_u(y_km))
}

/// Convert a GPS coordinate to dataspace (x, y, z) axis values.
///
/// `clamp_to_surface` forces altitude to zero (the WGS84 ellipsoid surface).
pub fn gps_to_dataspace_xyz(
    lat_deg: &Dec,
    lon_deg: &Dec,
    altitude_m: &Dec,
    clamp_to_surface: bool,
) -> Result<(u128, u128, u128)> {
    let alt = if clamp_to_surface {
        Dec::zero()
    } else {
        altitude_m.clone()
    };
    let (x_m, y_m, z_m) = geodetic_to_ecef_m(lat_deg, lon_deg, &alt)?;

    let km = Dec::from_u64(1000);
    Ok(ecef_km_to_dataspace_xyz(
        &x_m.div(&km)?,
        &y_m.div(&km)?,
        &z_m.div(&km)?,
    ))
}

/// Convert a GPS coordinate to an interleaved 256-bit dataspace coordinate.
pub fn gps_to_dataspace_coord(
    lat_deg: &Dec,
    lon_deg: &Dec,
    altitude_m: &Dec,
    clamp_to_surface: bool,
) -> Result<BigUint> {
    let (x, y, z) = gps_to_dataspace_xyz(lat_deg, lon_deg, altitude_m, clamp_to_surface)?;
    Ok(xyz_to_coord(x, y, z, PLANE_DATASPACE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Dec {
        Dec::parse(s).unwrap()
    }

    fn gps_hex(lat: &str, lon: &str) -> String {
        let coord = gps_to_dataspace_coord(&dec(lat), &dec(lon), &Dec::zero(), true).unwrap();
        format!("{coord:064x}")
    }

    #[test]
    fn test_wrap_lon_identity_in_range() {
        assert_eq!(wrap_lon_deg(&dec("0")).unwrap(), dec("0"));
        assert_eq!(wrap_lon_deg(&dec("-180")).unwrap(), dec("-180"));
        assert_eq!(wrap_lon_deg(&dec("179.5")).unwrap(), dec("179.5"));
    }

    #[test]
    fn test_wrap_lon_out_of_range() {
        assert_eq!(wrap_lon_deg(&dec("180")).unwrap(), dec("-180"));
        assert_eq!(wrap_lon_deg(&dec("360")).unwrap(), dec("0"));
        assert_eq!(wrap_lon_deg(&dec("-200")).unwrap(), dec("160"));
        assert_eq!(wrap_lon_deg(&dec("540")).unwrap(), dec("-180"));
    }

    #[test]
    fn test_wrap_lon_idempotent() {
        for lon in ["-723.25", "-180", "-0.1278", "359.9", "1234"] {
            let once = wrap_lon_deg(&dec(lon)).unwrap();
            let twice = wrap_lon_deg(&once).unwrap();
            assert_eq!(once, twice, "wrap not idempotent for {lon}");
            assert!(once >= dec("-180"));
            assert!(once < dec("180"));
        }
    }

    #[test]
    fn test_ecef_origin_equator_prime_meridian() {
        // (0, 0): x is the semi-major axis, y and z vanish to series noise.
        let (x, y, z) = geodetic_to_ecef_m(&dec("0"), &dec("0"), &Dec::zero()).unwrap();
        assert_eq!(x, dec("6378137"));
        assert!(y.abs() < dec("1e-60"));
        assert!(z.abs() < dec("1e-60"));
    }

    #[test]
    fn test_ecef_north_pole_height() {
        // At the pole, z is the semi-minor axis b = a(1 - f) ~ 6356752.31 m.
        let (_x, _y, z) = geodetic_to_ecef_m(&dec("90"), &dec("0"), &Dec::zero()).unwrap();
        assert!(z > dec("6356752.3"));
        assert!(z < dec("6356752.4"));
    }

    #[test]
    fn test_lat_clamped() {
        let a = gps_hex("90", "0");
        let b = gps_hex("95", "0");
        assert_eq!(a, b);
    }

    #[test]
    fn test_gps_golden_vectors() {
        // Consensus-critical outputs; any change here is a protocol fork.
        assert_eq!(
            gps_hex("0", "0"),
            "e040009249248048201201000049208000201009201200000040049201048240"
        );
        assert_eq!(
            gps_hex("90", "0"),
            "e020004920020000120820120124900900100024124904920904124120100124"
        );
        assert_eq!(
            gps_hex("51.5074", "-0.1278"),
            "c49eeba5feb124bd3ec0f3a132977c8c33edbb111fdfd02cb35cea53075b9846"
        );
        assert_eq!(
            gps_hex("40.7128", "-74.0060"),
            "c4943fa01bb22b95946ec1605717047a3b79bd717d5d84e35a12cb56df76134a"
        );
    }

    #[test]
    fn test_surface_clamp_forces_zero_altitude() {
        let with_alt =
            gps_to_dataspace_xyz(&dec("10"), &dec("20"), &dec("8848"), true).unwrap();
        let without_alt =
            gps_to_dataspace_xyz(&dec("10"), &dec("20"), &Dec::zero(), false).unwrap();
        assert_eq!(with_alt, without_alt);

        let raised = gps_to_dataspace_xyz(&dec("10"), &dec("20"), &dec("8848"), false).unwrap();
        assert_ne!(with_alt, raised);
    }
}
