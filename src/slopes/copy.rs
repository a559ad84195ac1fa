//! `Plane_Copy`: copy planes from tagged sectors, then optionally mirror
//! them across the line.
//!
//! | arg | meaning                                  |
//! |-----|------------------------------------------|
//! | 0   | tag to copy the front floor from         |
//! | 1   | tag to copy the front ceiling from       |
//! | 2   | tag to copy the back floor from          |
//! | 3   | tag to copy the back ceiling from        |
//! | 4   | bits 0-1 floor, bits 2-3 ceiling mirror  |
//!
//! Mirror values: 1 = back takes front, 2 = front takes back.

use log::debug;

use crate::defs::PLANE_COPY;
use crate::slopes::directives::copy_plane;
use crate::world::{Level, PlaneSide, SectorId};

/// Direction of a front/back mirror field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mirror {
    BackTakesFront,
    FrontTakesBack,
}

impl Mirror {
    pub fn decode(field: i32) -> Option<Mirror> {
        match field & 3 {
            1 => Some(Mirror::BackTakesFront),
            2 => Some(Mirror::FrontTakesBack),
            _ => None,
        }
    }
}

/// Run every `Plane_Copy` line once. Returns the number of lines consumed.
pub fn copy_slopes(level: &mut Level) -> usize {
    let mut consumed = 0;
    for li in 0..level.linedefs.len() {
        if level.linedefs[li].special != PLANE_COPY {
            continue;
        }
        level.linedefs[li].special = 0;
        consumed += 1;

        let ld = &level.linedefs[li];
        let (front, back, args) = (ld.front, ld.back, ld.args);

        let targets: [(Option<SectorId>, PlaneSide); 4] = [
            (Some(front), PlaneSide::Floor),
            (Some(front), PlaneSide::Ceiling),
            (back, PlaneSide::Floor),
            (back, PlaneSide::Ceiling),
        ];
        for ((dest, side), &tag) in targets.into_iter().zip(&args) {
            if let Some(dest) = dest.filter(|_| tag != 0) {
                copy_plane(level, tag, dest, side);
            }
        }

        let Some(back) = back else {
            continue;
        };
        for (side, field) in [
            (PlaneSide::Floor, args[4]),
            (PlaneSide::Ceiling, args[4] >> 2),
        ] {
            let (from, to) = match Mirror::decode(field) {
                Some(Mirror::BackTakesFront) => (front, back),
                Some(Mirror::FrontTakesBack) => (back, front),
                None => continue,
            };
            let plane = *level.sectors[from as usize].plane(side);
            *level.sectors[to as usize].plane_mut(side) = plane;
        }
    }
    debug!("plane copy: {consumed} lines");
    consumed
}
