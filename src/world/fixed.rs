//! 16.16 fixed-point helpers.
//!
//! Node partitions are stored at the precision the node builder wrote them,
//! and the legacy angle-slope path reproduces 32-bit fixed-point products
//! including their overflow.

pub type Fixed = i32;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: f64 = (1 << FRACBITS) as f64;

/// Float → 16.16, rounding to nearest (ties to even).
#[inline]
pub fn to_fixed(f: f64) -> Fixed {
    (f * FRACUNIT).round_ties_even() as Fixed
}

#[inline]
pub fn fixed_to_f64(x: Fixed) -> f64 {
    x as f64 / FRACUNIT
}

/// Whole map units → 16.16.
#[inline]
pub fn from_map_units(units: i16) -> Fixed {
    (units as Fixed) << FRACBITS
}

/// `(a*b + c*d) >> 32` evaluated in 64 bits.
#[inline]
pub fn dmul_scale32(a: Fixed, b: Fixed, c: Fixed, d: Fixed) -> i64 {
    (a as i64 * b as i64 + c as i64 * d as i64) >> 32
}
