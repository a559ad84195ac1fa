//! Load-time slope derivation.
//!
//! Runs once, after the map arrays, tag tables and BSP exist and before
//! anything reads sector planes. The passes write planes in a fixed order
//! and later passes see what earlier ones wrote:
//!
//! 1. directive things: point-line, angle and Vavoom slopes
//! 2. directive things: copy-plane
//! 3. vertex height overrides on triangular sectors
//! 4. `Plane_Align` line specials
//! 5. `Plane_Copy` line specials
//!
//! Bad geometry never aborts the load: the affected plane keeps its
//! previous value and a warning names the map position.

mod align;
mod angle;
mod copy;
mod directives;
mod solver;
mod vertex_heights;

pub use align::{align_bits, align_plane, align_planes};
pub use angle::{angle_plane, legacy_mul};
pub use copy::{Mirror, copy_slopes};
pub use directives::{
    Directive, copy_plane, extract_directives, slope_line_to_point, spawn_slope_makers,
    vavoom_slope,
};
pub use solver::{DEGENERATE_EPSILON, Degenerate, fit_plane, plane_through};
pub use vertex_heights::{VertexHeights, collect_vertex_heights, set_slopes_from_vertex_heights};

use log::{debug, error};

use crate::defs::CompatFlags;
use crate::world::Level;

/// What the slope phase did to a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlopeReport {
    /// Directive things removed from the thing list.
    pub directives: usize,
    /// Triangle planes fitted from vertex heights.
    pub vertex_planes: usize,
    /// `Plane_Align` lines consumed.
    pub aligned_lines: usize,
    /// `Plane_Copy` lines consumed.
    pub copied_lines: usize,
    /// Sector planes left unusable (should stay 0).
    pub invalid_planes: usize,
}

/// Derive every sloped plane of `level`.
pub fn build_slopes(level: &mut Level, compat: CompatFlags) -> SlopeReport {
    let mut report = SlopeReport::default();

    let directives = extract_directives(&mut level.things);
    report.directives = directives.len();

    let rest = spawn_slope_makers(level, directives, compat);
    let (vertex_planes, rest) = set_slopes_from_vertex_heights(level, rest);
    report.vertex_planes = vertex_planes;
    if !rest.is_empty() {
        debug!("{} directives were not consumed", rest.len());
    }

    report.aligned_lines = align_planes(level);
    report.copied_lines = copy_slopes(level);

    for (sec, side) in level.invalid_planes() {
        error!("sector {sec} has an unusable {side:?} plane");
        report.invalid_planes += 1;
    }

    debug!("slopes for {}: {report:?}", level.name);
    report
}
