//! `Plane_Align`: tilt a sector so it meets the neighbouring sector's
//! height along a two-sided line.

use log::{debug, warn};

use crate::defs::PLANE_ALIGN;
use crate::slopes::solver::{Degenerate, fit_plane};
use crate::world::{Level, LinedefId, Plane, PlaneSide, SectorId};

/// Which sector `bits` selects: 1 = front, 2 = back, anything else none.
fn aligned_sector(level: &Level, li: LinedefId, bits: i32) -> Option<SectorId> {
    let ld = &level.linedefs[li as usize];
    match bits {
        1 => Some(ld.front),
        2 => ld.back,
        _ => None,
    }
}

/// Selector bits for `side`. A zero ceiling argument falls back to bits
/// 2-3 of the floor argument.
pub fn align_bits(args: &[i32; 5], side: PlaneSide) -> i32 {
    match side {
        PlaneSide::Floor => args[0] & 3,
        PlaneSide::Ceiling => match args[1] & 3 {
            0 => (args[0] >> 2) & 3,
            bits => bits,
        },
    }
}

/// Plane for `sec` running from the line (at the other sector's height)
/// to the vertex of `sec` farthest from the line (at its own height).
pub fn align_plane(
    level: &Level,
    sec: SectorId,
    li: LinedefId,
    side: PlaneSide,
) -> Result<Plane, Degenerate> {
    let ld = &level.linedefs[li as usize];
    let Some(back) = ld.back else {
        return Err(Degenerate);
    };
    let sector = &level.sectors[sec as usize];
    let (l1, l2) = level.line_points(li);
    let delta = l2 - l1;

    let Some(&first) = sector.lines.first() else {
        return Err(Degenerate);
    };
    let mut ref_vert = level.vertex(level.linedefs[first as usize].v1);
    let mut best = 0.0;
    for &sl in &sector.lines {
        let (a, b) = level.line_points(sl);
        for v in [a, b] {
            let dist = ((l1.y - v.y) * delta.x - (l1.x - v.x) * delta.y).abs();
            if dist > best {
                best = dist;
                ref_vert = v;
            }
        }
    }

    let ref_sec = if ld.front == sec { back } else { ld.front };
    let src_height = sector.tex_z(side);
    let dest_height = level.sectors[ref_sec as usize].tex_z(side);

    let origin = l1.extend(dest_height);
    let along = delta.extend(0.0);
    let across = (ref_vert - l1).extend(src_height - dest_height);

    fit_plane(origin, along, across, side.prefers_up())
}

/// Run every `Plane_Align` line. Each special is cleared as soon as it is
/// seen. Returns the number of lines consumed.
pub fn align_planes(level: &mut Level) -> usize {
    let mut consumed = 0;
    for li in 0..level.linedefs.len() {
        if level.linedefs[li].special != PLANE_ALIGN {
            continue;
        }
        level.linedefs[li].special = 0;
        consumed += 1;

        let li = li as LinedefId;
        if level.linedefs[li as usize].back.is_none() {
            continue;
        }
        let args = level.linedefs[li as usize].args;
        for side in PlaneSide::BOTH {
            let Some(sec) = aligned_sector(level, li, align_bits(&args, side)) else {
                continue;
            };
            match align_plane(level, sec, li, side) {
                Ok(plane) => *level.sectors[sec as usize].plane_mut(side) = plane,
                Err(_) => {
                    let (l1, _) = level.line_points(li);
                    warn!(
                        "Plane_Align at ({:.6},{:.6}) has no usable reference vertex.",
                        l1.x, l1.y
                    );
                }
            }
        }
    }
    debug!("plane align: {consumed} lines");
    consumed
}
