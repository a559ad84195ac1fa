//! Slopes given as an azimuth / zenith pair.

use glam::DVec3;

use crate::world::fixed::{FRACUNIT, to_fixed};
use crate::world::{Plane, PlaneSide};

/// Plane through `pos` whose normal points along (`xy_angle`, `z_angle`),
/// both in degrees. The zenith is clamped to [1, 179]; ceilings are
/// flipped into the lower hemisphere.
///
/// With `legacy_overflow` the horizontal components are computed as a
/// 32-bit product of 16.16 values, wrapping like the original integer
/// code did.
pub fn angle_plane(
    side: PlaneSide,
    xy_angle: i32,
    z_angle: i32,
    pos: DVec3,
    legacy_overflow: bool,
) -> Plane {
    let mut zang = z_angle.clamp(1, 179) as f64;
    if side == PlaneSide::Ceiling {
        zang += 180.0;
    }
    let (zsin, zcos) = sin_cos_deg(zang);
    let (xysin, xycos) = sin_cos_deg(xy_angle as f64);

    let (nx, ny) = if legacy_overflow {
        (legacy_mul(zcos, xycos), legacy_mul(zcos, xysin))
    } else {
        (zcos * xycos, zcos * xysin)
    };
    let normal = DVec3::new(nx, ny, zsin).normalize();

    Plane::new(normal, -normal.dot(pos))
}

/// Sine and cosine of an angle in degrees, exact at multiples of 90°.
fn sin_cos_deg(deg: f64) -> (f64, f64) {
    if deg % 90.0 != 0.0 {
        return deg.to_radians().sin_cos();
    }
    match (deg / 90.0).rem_euclid(4.0) as i32 {
        0 => (0.0, 1.0),
        1 => (1.0, 0.0),
        2 => (0.0, -1.0),
        _ => (-1.0, 0.0),
    }
}

/// `a * b` through 16.16 fixed point with a wrapping 32-bit product.
#[inline]
pub fn legacy_mul(a: f64, b: f64) -> f64 {
    to_fixed(a).wrapping_mul(to_fixed(b)) as f64 / FRACUNIT / FRACUNIT
}
