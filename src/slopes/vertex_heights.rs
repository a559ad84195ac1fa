//! Triangular sectors sloped by per-vertex height overrides.

use glam::DVec3;
use log::debug;
use std::collections::HashMap;

use crate::defs::VertexDataFlags;
use crate::slopes::directives::Directive;
use crate::slopes::solver::fit_plane;
use crate::world::{Level, PlaneSide, VertexId, point_on_line_side_precise};

/// Vertex index → override height, one table per plane side.
#[derive(Debug, Default)]
pub struct VertexHeights {
    floor: HashMap<usize, f64>,
    ceiling: HashMap<usize, f64>,
}

impl VertexHeights {
    pub fn get(&self, side: PlaneSide, vertex: usize) -> Option<f64> {
        self.table(side).get(&vertex).copied()
    }

    pub fn insert(&mut self, side: PlaneSide, vertex: usize, z: f64) {
        match side {
            PlaneSide::Floor => self.floor.insert(vertex, z),
            PlaneSide::Ceiling => self.ceiling.insert(vertex, z),
        };
    }

    pub fn is_empty(&self) -> bool {
        self.floor.is_empty() && self.ceiling.is_empty()
    }

    fn table(&self, side: PlaneSide) -> &HashMap<usize, f64> {
        match side {
            PlaneSide::Floor => &self.floor,
            PlaneSide::Ceiling => &self.ceiling,
        }
    }
}

/// Gather overrides from vertex marker directives (matched by exact
/// position) and from `level.vertex_data`, which is emptied afterwards.
/// Returns the heights and the directives that are not vertex markers.
pub fn collect_vertex_heights(
    level: &mut Level,
    directives: Vec<Directive>,
) -> (VertexHeights, Vec<Directive>) {
    let mut heights = VertexHeights::default();
    let mut rest = Vec::with_capacity(directives.len());

    for d in directives {
        let Directive::VertexHeight { side, pos } = d else {
            rest.push(d);
            continue;
        };
        for (i, v) in level.vertices.iter().enumerate() {
            if v.pos.x == pos.x && v.pos.y == pos.y {
                heights.insert(side, i, pos.z);
            }
        }
    }

    for (i, vd) in level.vertex_data.iter().enumerate() {
        let vi = match &level.old_vertex_table {
            Some(table) => match table.get(i) {
                Some(&v) => v as usize,
                None => continue,
            },
            None => i,
        };
        if vd.flags.contains(VertexDataFlags::Z_CEILING_ENABLED) {
            heights.insert(PlaneSide::Ceiling, vi, vd.z_ceiling);
        }
        if vd.flags.contains(VertexDataFlags::Z_FLOOR_ENABLED) {
            heights.insert(PlaneSide::Floor, vi, vd.z_floor);
        }
    }

    // the table has no other consumer
    level.vertex_data = Vec::new();

    (heights, rest)
}

/// Slope every three-sided sector that has an override on at least one
/// corner. Returns the number of planes written and the directives that
/// were not vertex markers.
pub fn set_slopes_from_vertex_heights(
    level: &mut Level,
    directives: Vec<Directive>,
) -> (usize, Vec<Directive>) {
    let (heights, rest) = collect_vertex_heights(level, directives);
    if heights.is_empty() {
        return (0, rest);
    }

    let mut written = 0;
    for si in 0..level.sectors.len() {
        let sec = &level.sectors[si];
        if sec.lines.len() != 3 {
            continue;
        }

        let l0 = &level.linedefs[sec.lines[0] as usize];
        let l1 = &level.linedefs[sec.lines[1] as usize];
        let (vi1, vi2) = (l0.v1, l0.v2);
        let vi3: VertexId = if l1.v1 == l0.v1 || l1.v1 == l0.v2 {
            l1.v2
        } else {
            l1.v1
        };
        let (p1, p2, p3) = (level.vertex(vi1), level.vertex(vi2), level.vertex(vi3));
        let third_in_front = point_on_line_side_precise(p3, p1, p2) == 0;

        for side in PlaneSide::BOTH {
            let h = [vi1, vi2, vi3].map(|v| heights.get(side, v as usize));
            if h.iter().all(Option::is_none) {
                continue;
            }
            let base = level.sectors[si].tex_z(side);
            let [z1, z2, z3] = h.map(|z| z.unwrap_or(base));
            let (t1, t2, t3) = (p1.extend(z1), p2.extend(z2), p3.extend(z3));

            let (v1, v2) = if third_in_front {
                (t2 - t3, t1 - t3)
            } else {
                (t1 - t3, t2 - t3)
            };

            // all three corners on one line; nothing to fit
            let Ok(plane) = fit_plane(t3, v1, v2, side.prefers_up()) else {
                continue;
            };
            *level.sectors[si].plane_mut(side) = plane;
            written += 1;
        }
    }
    debug!("vertex heights: {written} triangle planes");

    (written, rest)
}
