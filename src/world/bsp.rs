use glam::DVec2;

use crate::world::fixed::{Fixed, dmul_scale32, to_fixed};
use crate::world::geometry::{Level, Node, SectorId, SubsectorId};

pub const CHILD_MASK: u16 = 0x7FFF;

pub const SUBSECTOR_BIT: u16 = 0x8000;

// ──────────────────────────────────────────────────────────────────────────
//                       Level – point location
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Index of the BSP root (`nodes.len()-1` in Doom), if the map has one.
    #[inline(always)]
    pub fn bsp_root(&self) -> Option<u16> {
        self.nodes.len().checked_sub(1).map(|i| i as u16)
    }

    /// Walk the BSP and return the subsector id containing `p`.
    ///
    /// Maps without nodes are a single subsector; `0` is returned.
    pub fn locate_subsector(&self, p: DVec2) -> SubsectorId {
        let Some(mut idx) = self.bsp_root() else {
            return 0;
        };
        let (x, y) = (to_fixed(p.x), to_fixed(p.y));
        loop {
            let node = &self.nodes[idx as usize];
            let child = node.child[node.point_side(x, y) as usize];
            if child & SUBSECTOR_BIT != 0 {
                return child & CHILD_MASK;
            }
            idx = child;
        }
    }

    /// Sector enclosing `p`. Falls back to sector 0 when no subsectors
    /// have been built yet; `None` only when the map has no such sector.
    pub fn locate_sector(&self, p: DVec2) -> Option<SectorId> {
        let sec = self
            .subsectors
            .get(self.locate_subsector(p) as usize)
            .map_or(0, |ss| ss.sector);
        ((sec as usize) < self.sectors.len()).then_some(sec)
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Node geometry helpers
// ──────────────────────────────────────────────────────────────────────────
impl Node {
    /// 0 = *front* of splitter, 1 = *back*. Ties go to the front.
    #[inline(always)]
    pub fn point_side(&self, x: Fixed, y: Fixed) -> i32 {
        (dmul_scale32(
            y.wrapping_sub(self.y),
            self.dx,
            self.x.wrapping_sub(x),
            self.dy,
        ) > 0) as i32
    }
}
