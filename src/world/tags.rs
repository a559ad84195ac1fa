//! Tag / line-id lookup tables.
//!
//! Sector tags and line ids are non-unique; each lookup yields indices in
//! ascending order so "first match" means lowest index. Tag 0 is never
//! registered.

use smallvec::SmallVec;
use std::collections::HashMap;

use crate::world::geometry::{Linedef, LinedefId, Sector, SectorId};

type Bucket<T> = SmallVec<[T; 4]>;

#[derive(Debug, Default)]
pub struct TagManager {
    sectors_by_tag: HashMap<i32, Bucket<SectorId>>,
    lines_by_id: HashMap<i32, Bucket<LinedefId>>,
}

impl TagManager {
    pub fn build(sectors: &[Sector], lines: &[Linedef]) -> Self {
        let mut tm = TagManager::default();
        for (i, s) in sectors.iter().enumerate().filter(|(_, s)| s.tag != 0) {
            tm.sectors_by_tag
                .entry(s.tag)
                .or_default()
                .push(i as SectorId);
        }
        for (i, l) in lines.iter().enumerate().filter(|(_, l)| l.id != 0) {
            tm.lines_by_id.entry(l.id).or_default().push(i as LinedefId);
        }
        tm
    }

    pub fn sectors(&self, tag: i32) -> &[SectorId] {
        self.sectors_by_tag.get(&tag).map_or(&[][..], |b| b.as_slice())
    }

    #[inline]
    pub fn first_sector(&self, tag: i32) -> Option<SectorId> {
        self.sectors(tag).first().copied()
    }

    pub fn lines(&self, id: i32) -> &[LinedefId] {
        self.lines_by_id.get(&id).map_or(&[][..], |b| b.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use crate::world::testmap::MapBuilder;

    #[test]
    fn lookups_are_ordered_and_skip_zero() {
        let mut b = MapBuilder::two_rooms(0.0, 0.0);
        b.sectors[0].tag = 5;
        b.sectors[1].tag = 5;
        b.lines[3].id = 7;
        b.lines[6].id = 7;
        let lvl = b.build();

        assert_eq!(lvl.tags.sectors(5), &[0, 1]);
        assert_eq!(lvl.tags.first_sector(5), Some(0));
        assert_eq!(lvl.tags.first_sector(6), None);
        assert_eq!(lvl.tags.lines(7), &[3, 6]);
        assert!(lvl.tags.lines(0).is_empty());
    }
}
