//! Deterministic arbitrary-precision decimal arithmetic.
//!
//! The GPS → dataspace pipeline is consensus-critical: independent nodes must
//! agree on every low bit of a coordinate, and binary floating point can
//! quantize a point across a sector boundary. Every value that influences the
//! final axis rounding is therefore carried as a decimal with a fixed working
//! precision of 96 significant digits and half-even rounding.
//!
//! Each arithmetic operation computes the exact result and rounds it to the
//! working precision; comparisons and absolute value are exact. Division and
//! square root are correctly rounded.

use std::cmp::Ordering;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};
use once_cell::sync::Lazy;

use crate::error::{CoreError, Result};

/// Working precision in significant digits.
pub const PRECISION: u64 = 96;

/// Hard iteration cap for the trig Taylor series. Exceeding it is fatal.
pub const TRIG_MAX_ITER: u32 = 256;

/// Canonical pi, truncated (not rounded) after 100 fractional digits.
///
/// The digits beyond the working precision decide the rounding direction for
/// points that land near an axis rounding boundary, so this exact string is
/// part of the consensus surface.
pub const PI_STR: &str = "3.1415926535897932384626433832795028841971693993751058209749445923078164062862089986280348253421170679";

/// Pi as an exact (unrounded) decimal.
pub static PI: Lazy<Dec> = Lazy::new(|| Dec::parse(PI_STR).expect("canonical pi constant"));

/// `2*pi` derived in the working context.
pub static TWO_PI: Lazy<Dec> = Lazy::new(|| &*PI * &Dec::from_u64(2));

/// `pi/2` derived in the working context.
pub static HALF_PI: Lazy<Dec> = Lazy::new(|| &*PI * &Dec::from_parts(BigInt::from(5), -1));

/// Taylor series termination threshold: `10^-88`.
pub static TRIG_EPS: Lazy<Dec> = Lazy::new(|| Dec::from_parts(BigInt::one(), -88));

/// An arbitrary-precision decimal: `mant * 10^exp`.
///
/// Values produced by arithmetic carry at most [`PRECISION`] significant
/// digits; values produced by [`Dec::parse`] are exact.
#[derive(Clone, Debug)]
pub struct Dec {
    mant: BigInt,
    exp: i64,
}

impl Dec {
    /// Build a decimal from a raw mantissa and power-of-ten exponent, exactly.
    pub fn from_parts(mant: BigInt, exp: i64) -> Self {
        Self { mant, exp }
    }

    /// The decimal zero.
    pub fn zero() -> Self {
        Self::from_parts(BigInt::zero(), 0)
    }

    /// The decimal one.
    pub fn one() -> Self {
        Self::from_parts(BigInt::one(), 0)
    }

    /// Exact conversion from an unsigned integer.
    pub fn from_u64(v: u64) -> Self {
        Self::from_parts(BigInt::from(v), 0)
    }

    /// Exact conversion from an unsigned 128-bit integer.
    pub fn from_u128(v: u128) -> Self {
        Self::from_parts(BigInt::from(v), 0)
    }

    /// Parse a decimal string exactly (no rounding).
    ///
    /// Accepts an optional sign, an optional fractional part and an optional
    /// `e`/`E` exponent: `-74.0060`, `1e-88`, `+0.5`.
    pub fn parse(s: &str) -> Result<Self> {
        let t = s.trim();
        if t.is_empty() {
            return Err(CoreError::InvalidDecimal(s.to_string()));
        }

        let (number, exp_part) = match t.find(['e', 'E']) {
            Some(i) => (&t[..i], Some(&t[i + 1..])),
            None => (t, None),
        };

        let exp_shift: i64 = match exp_part {
            Some(e) => e
                .parse()
                .map_err(|_| CoreError::InvalidDecimal(s.to_string()))?,
            None => 0,
        };

        let (sign, digits) = match number.as_bytes().first() {
            Some(b'+') => (Sign::Plus, &number[1..]),
            Some(b'-') => (Sign::Minus, &number[1..]),
            _ => (Sign::Plus, number),
        };

        let (int_part, frac_part) = match digits.find('.') {
            Some(i) => (&digits[..i], &digits[i + 1..]),
            None => (digits, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(CoreError::InvalidDecimal(s.to_string()));
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(CoreError::InvalidDecimal(s.to_string()));
        }

        let joined = format!("{int_part}{frac_part}");
        let mag = BigUint::parse_bytes(joined.as_bytes(), 10)
            .ok_or_else(|| CoreError::InvalidDecimal(s.to_string()))?;

        Ok(Self::from_parts(
            BigInt::from_biguint(sign, mag),
            exp_shift - frac_part.len() as i64,
        ))
    }

    /// Whether the value is numerically zero.
    pub fn is_zero(&self) -> bool {
        self.mant.is_zero()
    }

    /// Absolute value (exact).
    pub fn abs(&self) -> Self {
        Self::from_parts(self.mant.abs(), self.exp)
    }

    /// Exact numeric comparison (no rounding).
    fn cmp_dec(&self, other: &Self) -> Ordering {
        let e = self.exp.min(other.exp);
        let a = &self.mant * pow10_int((self.exp - e) as u64);
        let b = &other.mant * pow10_int((other.exp - e) as u64);
        a.cmp(&b)
    }

    /// Exact quotient correctly rounded to the working precision.
    pub fn div(&self, rhs: &Self) -> Result<Self> {
        if rhs.mant.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        if self.mant.is_zero() {
            return Ok(Self::zero());
        }

        let negative = self.mant.is_negative() != rhs.mant.is_negative();
        let mut num = self.mant.magnitude().clone();
        let mut den = rhs.mant.magnitude().clone();

        // Scale the quotient to at least PRECISION + 1 digits, then round.
        let shift = dec_digits(&den) as i64 - dec_digits(&num) as i64 + PRECISION as i64 + 1;
        if shift > 0 {
            num *= pow10(shift as u64);
        } else if shift < 0 {
            den *= pow10((-shift) as u64);
        }

        let q = &num / &den;
        let sticky = !(&num % &den).is_zero();
        let exp = self.exp - rhs.exp - shift;

        let drop = dec_digits(&q) - PRECISION;
        let (q, exp) = round_mag(q, exp, drop, sticky);
        Ok(rebuild(negative, q, exp))
    }

    /// Truncating remainder: the result carries the sign of the dividend, as
    /// in the decimal specification. Used for trig range reduction.
    pub fn rem_trunc(&self, rhs: &Self) -> Result<Self> {
        if rhs.mant.is_zero() {
            return Err(CoreError::DivisionByZero);
        }
        let e = self.exp.min(rhs.exp);
        let a = &self.mant * pow10_int((self.exp - e) as u64);
        let b = &rhs.mant * pow10_int((rhs.exp - e) as u64);
        Ok(rounded(&a % &b, e))
    }

    /// Square root, correctly rounded to the working precision.
    pub fn sqrt(&self) -> Result<Self> {
        if self.mant.is_negative() {
            return Err(CoreError::NegativeSqrt);
        }
        if self.mant.is_zero() {
            return Ok(Self::zero());
        }

        let mut m = self.mant.magnitude().clone();
        let mut e = self.exp;
        if e.rem_euclid(2) == 1 {
            m *= 10u32;
            e -= 1;
        }

        // Scale so the integer root carries more than PRECISION digits.
        let target = 2 * (PRECISION as i64 + 2) - 1;
        let d = dec_digits(&m) as i64;
        let j = if d < target { (target - d + 1) / 2 } else { 0 };
        let scaled = &m * pow10((2 * j) as u64);

        let t = isqrt(&scaled);
        let exact = (&t * &t) == scaled;
        let exp = e / 2 - j;

        let drop = dec_digits(&t).saturating_sub(PRECISION);
        let (q, exp) = round_mag(t, exp, drop, !exact);
        Ok(rebuild(false, q, exp))
    }

    /// Round to the nearest integer, ties to even.
    pub fn to_integral_half_even(&self) -> BigInt {
        if self.exp >= 0 {
            return &self.mant * pow10_int(self.exp as u64);
        }
        let negative = self.mant.is_negative();
        let mag = self.mant.magnitude();
        let p = pow10((-self.exp) as u64);
        let q = mag / &p;
        let r = mag % &p;
        let q = if round_up(&q, &r, &p, false) { q + 1u32 } else { q };
        rebuild_int(negative, q)
    }
}

impl PartialEq for Dec {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_dec(other) == Ordering::Equal
    }
}

impl Eq for Dec {}

impl PartialOrd for Dec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dec {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_dec(other)
    }
}

impl Add for &Dec {
    type Output = Dec;

    fn add(self, rhs: &Dec) -> Dec {
        let (m, e) = match self.exp.cmp(&rhs.exp) {
            Ordering::Equal => (&self.mant + &rhs.mant, self.exp),
            Ordering::Greater => (
                &self.mant * pow10_int((self.exp - rhs.exp) as u64) + &rhs.mant,
                rhs.exp,
            ),
            Ordering::Less => (
                &rhs.mant * pow10_int((rhs.exp - self.exp) as u64) + &self.mant,
                self.exp,
            ),
        };
        rounded(m, e)
    }
}

impl Sub for &Dec {
    type Output = Dec;

    fn sub(self, rhs: &Dec) -> Dec {
        self + &(-rhs)
    }
}

impl Mul for &Dec {
    type Output = Dec;

    fn mul(self, rhs: &Dec) -> Dec {
        rounded(&self.mant * &rhs.mant, self.exp + rhs.exp)
    }
}

impl Neg for &Dec {
    type Output = Dec;

    fn neg(self) -> Dec {
        Dec::from_parts(-&self.mant, self.exp)
    }
}

/// Deterministic sine and cosine of a decimal radian value.
///
/// Range-reduces modulo `2*pi` into `(-pi, pi]`, folds into
/// `[-pi/2, pi/2]` tracking the cosine sign, then runs independent Taylor
/// series for sin and cos until the current term drops below [`TRIG_EPS`].
pub fn sin_cos(x: &Dec) -> Result<(Dec, Dec)> {
    let pi = &*PI;
    let two_pi = &*TWO_PI;
    let half_pi = &*HALF_PI;
    let neg_half_pi = -half_pi;

    let mut x = x.rem_trunc(two_pi)?;
    if x > *pi {
        x = &x - two_pi;
    }

    let mut cos_negated = false;
    if x > *half_pi {
        x = pi - &x;
        cos_negated = true;
    } else if x < neg_half_pi {
        x = &(-pi) - &x;
        cos_negated = true;
    }

    let x2 = &x * &x;

    let mut sin_sum = x.clone();
    let mut sin_term = x;
    let mut converged = false;
    for k in 1..=u64::from(TRIG_MAX_ITER) {
        let denom = Dec::from_u64((2 * k) * (2 * k + 1));
        sin_term = (&(-&sin_term) * &x2).div(&denom)?;
        sin_sum = &sin_sum + &sin_term;
        if sin_term.abs() < *TRIG_EPS {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(CoreError::TrigNonConvergence {
            func: "sin",
            iterations: TRIG_MAX_ITER,
        });
    }

    let mut cos_sum = Dec::one();
    let mut cos_term = Dec::one();
    converged = false;
    for k in 1..=u64::from(TRIG_MAX_ITER) {
        let denom = Dec::from_u64((2 * k - 1) * (2 * k));
        cos_term = (&(-&cos_term) * &x2).div(&denom)?;
        cos_sum = &cos_sum + &cos_term;
        if cos_term.abs() < *TRIG_EPS {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(CoreError::TrigNonConvergence {
            func: "cos",
            iterations: TRIG_MAX_ITER,
        });
    }

    let cos = if cos_negated { -&cos_sum } else { cos_sum };
    Ok((sin_sum, cos))
}

/// Number of decimal digits in a magnitude (1 for zero).
fn dec_digits(mag: &BigUint) -> u64 {
    if mag.is_zero() {
        1
    } else {
        mag.to_str_radix(10).len() as u64
    }
}

fn pow10(k: u64) -> BigUint {
    BigUint::from(10u32).pow(k as u32)
}

fn pow10_int(k: u64) -> BigInt {
    BigInt::from(pow10(k))
}

/// Round a signed exact result to the working precision, half-even.
fn rounded(mant: BigInt, exp: i64) -> Dec {
    let negative = mant.is_negative();
    let mag = mant.magnitude().clone();
    let d = dec_digits(&mag);
    if d <= PRECISION {
        return Dec::from_parts(mant, exp);
    }
    let (q, exp) = round_mag(mag, exp, d - PRECISION, false);
    rebuild(negative, q, exp)
}

/// Drop `drop` trailing digits of `mag` with half-even rounding.
///
/// `sticky` records whether additional nonzero value exists below the
/// retained digits (from an inexact division or root); it breaks would-be
/// ties upward.
fn round_mag(mag: BigUint, exp: i64, drop: u64, sticky: bool) -> (BigUint, i64) {
    if drop == 0 {
        return (mag, exp);
    }
    let p = pow10(drop);
    let q = &mag / &p;
    let r = &mag % &p;
    let mut q = q;
    if round_up(&q, &r, &p, sticky) {
        q += 1u32;
        if dec_digits(&q) > PRECISION {
            // 999..9 rolled over to 100..0 with one digit too many.
            q /= 10u32;
            return (q, exp + drop as i64 + 1);
        }
    }
    (q, exp + drop as i64)
}

fn round_up(q: &BigUint, r: &BigUint, p: &BigUint, sticky: bool) -> bool {
    let twice = r << 1u32;
    match twice.cmp(p) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => sticky || q.bit(0),
    }
}

fn rebuild(negative: bool, mag: BigUint, exp: i64) -> Dec {
    Dec::from_parts(rebuild_int(negative, mag), exp)
}

fn rebuild_int(negative: bool, mag: BigUint) -> BigInt {
    if negative {
        -BigInt::from(mag)
    } else {
        BigInt::from(mag)
    }
}

/// Floor integer square root (Newton's method).
fn isqrt(n: &BigUint) -> BigUint {
    if n.is_zero() {
        return BigUint::zero();
    }
    let mut x: BigUint = BigUint::one() << ((n.bits() + 1) / 2);
    loop {
        let y = (&x + n / &x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}
