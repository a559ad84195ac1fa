//! Plane fitting shared by every slope construction.

use glam::DVec3;
use thiserror::Error;

use crate::world::Plane;

/// Cross products shorter than this, and normals with a vertical
/// component smaller than this, are treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// The spanning vectors do not define a walkable plane.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("spanning vectors are parallel or zero; no plane normal")]
pub struct Degenerate;

/// Plane through `origin` spanned by `v1` and `v2`.
///
/// The normal is flipped so its vertical component points up when
/// `prefer_up` is set (floors) and down otherwise (ceilings).
pub fn fit_plane(
    origin: DVec3,
    v1: DVec3,
    v2: DVec3,
    prefer_up: bool,
) -> Result<Plane, Degenerate> {
    let cross = v1.cross(v2);
    let len = cross.length();
    if !len.is_finite() || len <= DEGENERATE_EPSILON {
        return Err(Degenerate);
    }
    let mut normal = cross / len;
    // vertical planes have no height anywhere
    if normal.z.abs() <= DEGENERATE_EPSILON {
        return Err(Degenerate);
    }

    // Fix backward normals
    if (normal.z < 0.0 && prefer_up) || (normal.z > 0.0 && !prefer_up) {
        normal = -normal;
    }

    Ok(Plane::new(normal, -normal.dot(origin)))
}

/// Plane through three points.
pub fn plane_through(
    a: DVec3,
    b: DVec3,
    c: DVec3,
    prefer_up: bool,
) -> Result<Plane, Degenerate> {
    fit_plane(a, b - a, c - a, prefer_up)
}
