//! Slope directive things: extraction from the thing list and the
//! point-line / angle / Vavoom / copy-plane constructions.

use glam::{DVec2, DVec3};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::defs::{CompatFlags, SlopeThing, slope_thing};
use crate::slopes::angle::angle_plane;
use crate::slopes::solver::fit_plane;
use crate::world::{Level, LinedefId, PlaneSide, SectorId, Thing, point_on_line_side_precise};

/// A thing that shapes planes instead of spawning.
#[derive(Clone, Debug, PartialEq)]
pub enum Directive {
    /// Slope the sector facing line(s) `line_id` up to the thing.
    PointLine {
        side: PlaneSide,
        pos: DVec3,
        line_id: i32,
    },
    /// Explicit azimuth (`xy_angle`) and zenith (`z_angle`) in degrees.
    SetAngle {
        side: PlaneSide,
        pos: DVec3,
        xy_angle: i32,
        z_angle: i32,
    },
    /// Plane through the thing and the line whose `args[0]` is `thing_id`.
    Vavoom {
        side: PlaneSide,
        pos: DVec3,
        thing_id: i32,
    },
    /// Copy a plane from the first sector tagged `tag`.
    CopyPlane {
        side: PlaneSide,
        pos: DVec2,
        tag: i32,
    },
    /// Height override for every vertex at `pos.xy`.
    VertexHeight { side: PlaneSide, pos: DVec3 },
}

impl Directive {
    pub fn from_thing(t: &Thing) -> Option<Directive> {
        use PlaneSide::{Ceiling, Floor};

        let side_of = |ceiling: bool| if ceiling { Ceiling } else { Floor };
        let d = match slope_thing(t.ednum)? {
            k @ (SlopeThing::FloorPointLine | SlopeThing::CeilingPointLine) => {
                Directive::PointLine {
                    side: side_of(k == SlopeThing::CeilingPointLine),
                    pos: t.pos,
                    line_id: t.args[0],
                }
            }
            k @ (SlopeThing::SetFloorSlope | SlopeThing::SetCeilingSlope) => Directive::SetAngle {
                side: side_of(k == SlopeThing::SetCeilingSlope),
                pos: t.pos,
                xy_angle: t.angle,
                z_angle: t.args[0],
            },
            k @ (SlopeThing::VavoomFloor | SlopeThing::VavoomCeiling) => Directive::Vavoom {
                side: side_of(k == SlopeThing::VavoomCeiling),
                pos: t.pos,
                thing_id: t.thing_id,
            },
            k @ (SlopeThing::CopyFloorPlane | SlopeThing::CopyCeilingPlane) => {
                Directive::CopyPlane {
                    side: side_of(k == SlopeThing::CopyCeilingPlane),
                    pos: t.pos.truncate(),
                    tag: t.args[0],
                }
            }
            k @ (SlopeThing::VertexFloorZ | SlopeThing::VertexCeilingZ) => {
                Directive::VertexHeight {
                    side: side_of(k == SlopeThing::VertexCeilingZ),
                    pos: t.pos,
                }
            }
        };
        Some(d)
    }

    pub fn side(&self) -> PlaneSide {
        match *self {
            Directive::PointLine { side, .. }
            | Directive::SetAngle { side, .. }
            | Directive::Vavoom { side, .. }
            | Directive::CopyPlane { side, .. }
            | Directive::VertexHeight { side, .. } => side,
        }
    }
}

/// Remove every directive thing from `things`, keeping the others in
/// order. Removed things can no longer reach the spawner.
pub fn extract_directives(things: &mut Vec<Thing>) -> Vec<Directive> {
    let mut directives = Vec::new();
    things.retain(|t| match Directive::from_thing(t) {
        Some(d) => {
            directives.push(d);
            false
        }
        None => true,
    });
    directives
}

/// Apply point-line, angle and Vavoom directives, then copy-plane
/// directives. Returns the directives left for later passes.
pub fn spawn_slope_makers(
    level: &mut Level,
    directives: Vec<Directive>,
    compat: CompatFlags,
) -> Vec<Directive> {
    let legacy = compat.contains(CompatFlags::SET_SLOPE_OVERFLOW);
    let (copies, rest): (Vec<_>, Vec<_>) = directives
        .into_iter()
        .filter_map(|d| apply_slope_directive(level, d, legacy))
        .partition(|d| matches!(d, Directive::CopyPlane { .. }));

    for d in &copies {
        if let Directive::CopyPlane { side, pos, tag } = *d {
            if let Some(dest) = level.locate_sector(pos) {
                copy_plane(level, tag, dest, side);
            }
        }
    }
    debug!(
        "slope makers: {} copy directives, {} left over",
        copies.len(),
        rest.len()
    );
    rest
}

/// Handles one directive; hands back the ones this stage does not own.
fn apply_slope_directive(level: &mut Level, d: Directive, legacy: bool) -> Option<Directive> {
    let (side, pos) = match d {
        Directive::PointLine { side, pos, .. }
        | Directive::SetAngle { side, pos, .. }
        | Directive::Vavoom { side, pos, .. } => (side, pos),
        other => return Some(other),
    };
    let Some(sec) = level.locate_sector(pos.truncate()) else {
        debug!("slope thing at ({:.6},{:.6}) is in no sector", pos.x, pos.y);
        return None;
    };
    // thing z is an offset above the plane of the sector it stands in
    let plane_z = level.sectors[sec as usize].plane(side).z_at(pos.truncate());
    let raised = DVec3::new(pos.x, pos.y, plane_z + pos.z);

    match d {
        Directive::PointLine { line_id, .. } => {
            slope_line_to_point(level, line_id, raised, side);
        }
        Directive::SetAngle {
            xy_angle,
            z_angle,
            ..
        } => {
            *level.sectors[sec as usize].plane_mut(side) =
                angle_plane(side, xy_angle, z_angle, raised, legacy);
        }
        // Vavoom heights are absolute
        Directive::Vavoom { thing_id, .. } => vavoom_slope(level, sec, thing_id, pos, side),
        _ => {}
    }
    None
}

/// Slope the sector on the thing's side of each line with id `line_id`
/// so it rises from the line to `pos`.
pub fn slope_line_to_point(level: &mut Level, line_id: i32, pos: DVec3, side: PlaneSide) {
    let lines: SmallVec<[LinedefId; 4]> = level.tags.lines(line_id).into();
    for li in lines {
        let ld = &level.linedefs[li as usize];
        let (v1, v2) = level.line_points(li);
        let sec = if point_on_line_side_precise(pos.truncate(), v1, v2) == 0 {
            Some(ld.front)
        } else {
            ld.back
        };
        let Some(sec) = sec else {
            continue;
        };

        let plane = level.sectors[sec as usize].plane(side);
        let p = v1.extend(plane.z_at(v1));
        let span = (v2 - v1).extend(plane.z_at(v2) - p.z);
        let to_thing = pos - p;

        match fit_plane(pos, span, to_thing, side.prefers_up()) {
            Ok(fitted) => *level.sectors[sec as usize].plane_mut(side) = fitted,
            Err(_) => {
                warn!(
                    "Slope thing at ({:.6},{:.6}) lies directly on its target line.",
                    pos.x, pos.y
                );
                return;
            }
        }
    }
}

/// Plane through `pos` and both ends of the first bounding line of `sec`
/// whose `args[0]` equals `thing_id`. Heights are absolute.
pub fn vavoom_slope(
    level: &mut Level,
    sec: SectorId,
    thing_id: i32,
    pos: DVec3,
    side: PlaneSide,
) {
    let sector = &level.sectors[sec as usize];
    let Some(li) = sector
        .lines
        .iter()
        .copied()
        .find(|&li| level.linedefs[li as usize].args[0] == thing_id)
    else {
        return;
    };

    let src_height = sector.tex_z(side);
    let (v1, v2) = level.line_points(li);
    let to_v2 = (pos.truncate() - v2).extend(pos.z - src_height);
    let to_v1 = (pos.truncate() - v1).extend(pos.z - src_height);

    match fit_plane(pos, to_v2, to_v1, side.prefers_up()) {
        Ok(fitted) => *level.sectors[sec as usize].plane_mut(side) = fitted,
        Err(_) => warn!(
            "Slope thing at ({:.6},{:.6}) lies directly on its target line.",
            pos.x, pos.y
        ),
    }
}

/// Copy the `side` plane of the first sector tagged `tag` onto `dest`.
/// Unknown tags are ignored.
pub fn copy_plane(level: &mut Level, tag: i32, dest: SectorId, side: PlaneSide) {
    let Some(src) = level.tags.first_sector(tag) else {
        return;
    };
    let plane = *level.sectors[src as usize].plane(side);
    *level.sectors[dest as usize].plane_mut(side) = plane;
}
