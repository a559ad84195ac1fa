use crate::wad::{Wad, WadError};
use bincode::Decode;
use once_cell::sync::Lazy;
use regex::Regex;

/// Sidedef slot meaning "no side".
pub const NO_SIDE: u16 = 0xFFFF;

/*=======================================================================*/
/*                         On-disk binary structs                        */
/*=======================================================================*/

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct DoomThing {
    pub x: i16,
    pub y: i16,
    pub angle: i16,
    pub type_: u16,
    pub options: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct HexenThing {
    pub tid: i16,
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub angle: i16,
    pub type_: u16,
    pub options: u16,
    pub special: u8,
    pub args: [u8; 5],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct DoomLinedef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    pub special: u16,
    pub tag: i16,
    pub sidenum: [u16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct HexenLinedef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    pub special: u8,
    pub args: [u8; 5],
    pub sidenum: [u16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSidedef {
    pub x_off: i16,
    pub y_off: i16,
    pub top_tex: [u8; 8],
    pub bottom_tex: [u8; 8],
    pub mid_tex: [u8; 8],
    pub sector: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawVertex {
    pub x: i16,
    pub y: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSeg {
    pub v1: u16,
    pub v2: u16,
    pub angle: i16,
    pub linedef: u16,
    pub side: i16,
    pub offset: i16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSubsector {
    pub seg_count: u16,
    pub first_seg: u16,
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawNode {
    pub x: i16,
    pub y: i16,
    pub dx: i16,
    pub dy: i16,
    pub bbox: [[i16; 4]; 2],
    pub child: [u16; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Decode, Debug)]
pub struct RawSector {
    pub floor_h: i16,
    pub ceil_h: i16,
    pub floor_tex: [u8; 8],
    pub ceil_tex: [u8; 8],
    pub light: i16,
    pub special: i16,
    pub tag: i16,
}

/*=======================================================================*/
/*                    Format-neutral thing / line records                */
/*=======================================================================*/

/// Binary map dialect, told apart by a `BEHAVIOR` lump.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapFormat {
    Doom,
    Hexen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawThing {
    pub tid: i32,
    pub x: i16,
    pub y: i16,
    pub z: i16,
    pub angle: i16,
    pub ednum: u16,
    pub options: u16,
    pub args: [i32; 5],
}

impl From<DoomThing> for RawThing {
    fn from(t: DoomThing) -> Self {
        RawThing {
            tid: 0,
            x: t.x,
            y: t.y,
            z: 0,
            angle: t.angle,
            ednum: t.type_,
            options: t.options,
            args: [0; 5],
        }
    }
}

impl From<HexenThing> for RawThing {
    fn from(t: HexenThing) -> Self {
        RawThing {
            tid: t.tid as i32,
            x: t.x,
            y: t.y,
            z: t.z,
            angle: t.angle,
            ednum: t.type_,
            options: t.options,
            args: t.args.map(i32::from),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawLinedef {
    pub v1: u16,
    pub v2: u16,
    pub flags: u16,
    /// Hexen action special; Doom specials are not carried.
    pub special: u16,
    pub args: [i32; 5],
    /// Doom sector tag, 0 in Hexen maps.
    pub tag: i32,
    pub sidenum: [u16; 2],
}

impl From<DoomLinedef> for RawLinedef {
    fn from(l: DoomLinedef) -> Self {
        RawLinedef {
            v1: l.v1,
            v2: l.v2,
            flags: l.flags,
            special: 0,
            args: [0; 5],
            tag: l.tag as i32,
            sidenum: l.sidenum,
        }
    }
}

impl From<HexenLinedef> for RawLinedef {
    fn from(l: HexenLinedef) -> Self {
        RawLinedef {
            v1: l.v1,
            v2: l.v2,
            flags: l.flags,
            special: l.special as u16,
            args: l.args.map(i32::from),
            tag: 0,
            sidenum: l.sidenum,
        }
    }
}

/*=======================================================================*/
/*                     Aggregate returned by `parse_level`               */
/*=======================================================================*/
#[derive(Debug)]
pub struct RawLevel {
    pub name: String,
    pub format: MapFormat,
    pub things: Vec<RawThing>,
    pub linedefs: Vec<RawLinedef>,
    pub sidedefs: Vec<RawSidedef>,
    pub vertices: Vec<RawVertex>,
    pub segs: Vec<RawSeg>,
    pub subsectors: Vec<RawSubsector>,
    pub nodes: Vec<RawNode>,
    pub sectors: Vec<RawSector>,
}

/*=======================================================================*/
/*                                Errors                                 */
/*=======================================================================*/

#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    #[error("marker index {0} out of bounds")]
    MarkerOob(usize),

    #[error("expected lump `{0}` not found after level marker")]
    Missing(&'static str),

    #[error(transparent)]
    Wad(#[from] WadError),
}

/*=======================================================================*/
/*                     Convenience helpers on `Wad`                      */
/*=======================================================================*/
impl Wad {
    /// Return directory indices of every map marker (`E#M#`, `MAP##`).
    pub fn level_indices(&self) -> Vec<usize> {
        static RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(E[1-9]M[1-9]|MAP[0-9][0-9])$").unwrap());

        self.lumps()
            .iter()
            .enumerate()
            .filter(|(_, l)| l.size == 0 && RE.is_match(Self::lump_name_str(&l.name)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Return `idx` if the lump stored there is called `name`.
    fn idx_of(&self, idx: usize, name: &'static str) -> Result<usize, LevelError> {
        match self.name_at(idx) {
            Some(n) if n == name => Ok(idx),
            _ => Err(LevelError::Missing(name)),
        }
    }

    /// Hexen maps carry a `BEHAVIOR` lump right after `BLOCKMAP`.
    pub fn map_format(&self, marker_idx: usize) -> MapFormat {
        match self.name_at(marker_idx + 11) {
            Some("BEHAVIOR") => MapFormat::Hexen,
            _ => MapFormat::Doom,
        }
    }

    /// Decode the eight lumps of a binary map that the loader needs.
    pub fn parse_level(&self, marker_idx: usize) -> Result<RawLevel, LevelError> {
        // --- bounds check on marker index --------------------------------
        if marker_idx >= self.lumps().len() {
            return Err(LevelError::MarkerOob(marker_idx));
        }

        // --- fixed lump order after marker -------------------------------
        let things_idx = self.idx_of(marker_idx + 1, "THINGS")?;
        let linedefs_idx = self.idx_of(marker_idx + 2, "LINEDEFS")?;
        let sidedefs_idx = self.idx_of(marker_idx + 3, "SIDEDEFS")?;
        let vertices_idx = self.idx_of(marker_idx + 4, "VERTEXES")?;
        let segs_idx = self.idx_of(marker_idx + 5, "SEGS")?;
        let ssectors_idx = self.idx_of(marker_idx + 6, "SSECTORS")?;
        let nodes_idx = self.idx_of(marker_idx + 7, "NODES")?;
        let sectors_idx = self.idx_of(marker_idx + 8, "SECTORS")?;

        let format = self.map_format(marker_idx);

        // --- decode each lump -------------------------------------------
        let (things, linedefs) = match format {
            MapFormat::Doom => (
                self.lump_to_vec::<DoomThing>(things_idx)?
                    .into_iter()
                    .map(RawThing::from)
                    .collect(),
                self.lump_to_vec::<DoomLinedef>(linedefs_idx)?
                    .into_iter()
                    .map(RawLinedef::from)
                    .collect(),
            ),
            MapFormat::Hexen => (
                self.lump_to_vec::<HexenThing>(things_idx)?
                    .into_iter()
                    .map(RawThing::from)
                    .collect(),
                self.lump_to_vec::<HexenLinedef>(linedefs_idx)?
                    .into_iter()
                    .map(RawLinedef::from)
                    .collect(),
            ),
        };
        let sidedefs = self.lump_to_vec::<RawSidedef>(sidedefs_idx)?;
        let vertices = self.lump_to_vec::<RawVertex>(vertices_idx)?;
        let segs = self.lump_to_vec::<RawSeg>(segs_idx)?;
        let subsectors = self.lump_to_vec::<RawSubsector>(ssectors_idx)?;
        let nodes = self.lump_to_vec::<RawNode>(nodes_idx)?;
        let sectors = self.lump_to_vec::<RawSector>(sectors_idx)?;

        Ok(RawLevel {
            name: Self::lump_name_str(&self.lumps()[marker_idx].name).into(),
            format,
            things,
            linedefs,
            sidedefs,
            vertices,
            segs,
            subsectors,
            nodes,
            sectors,
        })
    }
}

/*=======================================================================*/
/*                                Tests                                  */
/*=======================================================================*/
#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::wad::raw::tests::build_wad;
    use byteorder::{LittleEndian as LE, WriteBytesExt};

    fn name8(s: &str) -> [u8; 8] {
        let mut n = [0u8; 8];
        n[..s.len()].copy_from_slice(s.as_bytes());
        n
    }

    /// Lumps of the two-room test map: room A (x 0..128, floor 0) and
    /// room B (x 128..256, floor 64), split by one BSP node at x = 128.
    /// The shared line 2 carries `Plane_Align` in the Hexen version.
    pub(crate) fn two_room_lumps(format: MapFormat) -> Vec<(&'static str, Vec<u8>)> {
        let hexen = format == MapFormat::Hexen;

        let mut things = Vec::new();
        let mut thing = |tid: i16, x: i16, y: i16, z: i16, ednum: u16, args: [u8; 5]| {
            if hexen {
                for v in [tid, x, y, z, 0] {
                    things.write_i16::<LE>(v).unwrap();
                }
                things.write_u16::<LE>(ednum).unwrap();
                things.write_u16::<LE>(7).unwrap();
                things.push(0);
                things.extend_from_slice(&args);
            } else {
                for v in [x, y, 0] {
                    things.write_i16::<LE>(v).unwrap();
                }
                things.write_u16::<LE>(ednum).unwrap();
                things.write_u16::<LE>(7).unwrap();
            }
        };
        thing(0, 64, 64, 0, 1, [0; 5]);
        thing(0, 200, 64, 0, 9503, [90, 0, 0, 0, 0]);

        // (v1, v2, front side, back side, special, args)
        let lines: [(u16, u16, u16, u16, u8, [u8; 5]); 7] = [
            (0, 1, 0, NO_SIDE, 0, [0; 5]),
            (1, 2, 1, NO_SIDE, 0, [0; 5]),
            (2, 3, 2, 3, 181, [1, 0, 0, 0, 0]),
            (3, 0, 4, NO_SIDE, 0, [0; 5]),
            (2, 4, 5, NO_SIDE, 121, [2, 0, 0, 0, 1]),
            (4, 5, 6, NO_SIDE, 0, [0; 5]),
            (5, 3, 7, NO_SIDE, 0, [0; 5]),
        ];
        let mut linedefs = Vec::new();
        for (v1, v2, s0, s1, special, args) in lines {
            linedefs.write_u16::<LE>(v1).unwrap();
            linedefs.write_u16::<LE>(v2).unwrap();
            linedefs.write_u16::<LE>(if s1 == NO_SIDE { 1 } else { 4 }).unwrap();
            if hexen {
                linedefs.push(special);
                linedefs.extend_from_slice(&args);
            } else {
                linedefs.write_u16::<LE>(0).unwrap();
                linedefs.write_i16::<LE>(args[0] as i16).unwrap();
            }
            linedefs.write_u16::<LE>(s0).unwrap();
            linedefs.write_u16::<LE>(s1).unwrap();
        }

        let mut sidedefs = Vec::new();
        for sector in [0u16, 0, 0, 1, 0, 1, 1, 1] {
            sidedefs.write_i16::<LE>(0).unwrap();
            sidedefs.write_i16::<LE>(0).unwrap();
            for tex in ["-", "-", "STARTAN3"] {
                sidedefs.extend_from_slice(&name8(tex));
            }
            sidedefs.write_u16::<LE>(sector).unwrap();
        }

        let mut vertexes = Vec::new();
        for (x, y) in [(0, 0), (0, 128), (128, 128), (128, 0), (256, 128), (256, 0)] {
            vertexes.write_i16::<LE>(x).unwrap();
            vertexes.write_i16::<LE>(y).unwrap();
        }

        // (v1, v2, linedef, side)
        let seg_list = [
            (0, 1, 0, 0),
            (1, 2, 1, 0),
            (2, 3, 2, 0),
            (3, 0, 3, 0),
            (3, 2, 2, 1),
            (2, 4, 4, 0),
            (4, 5, 5, 0),
            (5, 3, 6, 0),
        ];
        let mut segs = Vec::new();
        for (v1, v2, line, side) in seg_list {
            segs.write_u16::<LE>(v1).unwrap();
            segs.write_u16::<LE>(v2).unwrap();
            segs.write_i16::<LE>(0).unwrap();
            segs.write_u16::<LE>(line).unwrap();
            segs.write_i16::<LE>(side).unwrap();
            segs.write_i16::<LE>(0).unwrap();
        }

        let mut ssectors = Vec::new();
        for (count, first) in [(4u16, 0u16), (4, 4)] {
            ssectors.write_u16::<LE>(count).unwrap();
            ssectors.write_u16::<LE>(first).unwrap();
        }

        let mut nodes = Vec::new();
        for v in [128i16, 0, 0, 128] {
            nodes.write_i16::<LE>(v).unwrap();
        }
        for bbox in [[128i16, 0, 128, 256], [128, 0, 0, 128]] {
            for v in bbox {
                nodes.write_i16::<LE>(v).unwrap();
            }
        }
        nodes.write_u16::<LE>(0x8001).unwrap();
        nodes.write_u16::<LE>(0x8000).unwrap();

        let mut sectors = Vec::new();
        for (floor, tag) in [(0i16, 0i16), (64, 0)] {
            sectors.write_i16::<LE>(floor).unwrap();
            sectors.write_i16::<LE>(128).unwrap();
            sectors.extend_from_slice(&name8("FLOOR4_8"));
            sectors.extend_from_slice(&name8("CEIL3_5"));
            sectors.write_i16::<LE>(160).unwrap();
            sectors.write_i16::<LE>(0).unwrap();
            sectors.write_i16::<LE>(tag).unwrap();
        }

        let mut lumps = vec![
            ("MAP01", vec![]),
            ("THINGS", things),
            ("LINEDEFS", linedefs),
            ("SIDEDEFS", sidedefs),
            ("VERTEXES", vertexes),
            ("SEGS", segs),
            ("SSECTORS", ssectors),
            ("NODES", nodes),
            ("SECTORS", sectors),
            ("REJECT", vec![]),
            ("BLOCKMAP", vec![]),
        ];
        if hexen {
            lumps.push(("BEHAVIOR", vec![0; 16]));
        }
        lumps
    }

    pub(crate) fn two_room_wad(format: MapFormat) -> Wad {
        Wad::from_bytes(build_wad(&two_room_lumps(format))).unwrap()
    }

    #[test]
    fn hexen_map_parses() {
        let wad = two_room_wad(MapFormat::Hexen);
        assert_eq!(wad.level_indices(), vec![0]);
        assert_eq!(wad.map_format(0), MapFormat::Hexen);

        let lvl = wad.parse_level(0).expect("level decode");
        assert_eq!(lvl.name, "MAP01");
        assert_eq!(lvl.format, MapFormat::Hexen);
        assert_eq!(lvl.things.len(), 2);
        assert_eq!(lvl.things[1].ednum, 9503);
        assert_eq!(lvl.things[1].args, [90, 0, 0, 0, 0]);
        assert_eq!(lvl.linedefs.len(), 7);
        assert_eq!(lvl.linedefs[2].special, 181);
        assert_eq!(lvl.linedefs[2].sidenum, [2, 3]);
        assert_eq!(lvl.linedefs[0].sidenum[1], NO_SIDE);
        assert_eq!(lvl.sidedefs.len(), 8);
        assert_eq!(lvl.vertices.len(), 6);
        assert_eq!(lvl.segs.len(), 8);
        assert_eq!(lvl.subsectors.len(), 2);
        assert_eq!(lvl.nodes.len(), 1);
        assert_eq!(lvl.nodes[0].child, [0x8001, 0x8000]);
        assert_eq!(lvl.sectors[1].floor_h, 64);
    }

    #[test]
    fn doom_map_parses() {
        let wad = two_room_wad(MapFormat::Doom);
        assert_eq!(wad.map_format(0), MapFormat::Doom);

        let lvl = wad.parse_level(0).unwrap();
        assert_eq!(lvl.format, MapFormat::Doom);
        assert_eq!(lvl.things[1].ednum, 9503);
        assert_eq!(lvl.things[1].args, [0; 5]);
        assert_eq!(lvl.linedefs[2].special, 0);
        // the first arg byte was written as the Doom tag
        assert_eq!(lvl.linedefs[2].tag, 1);
        assert_eq!(lvl.linedefs[4].tag, 2);
    }

    #[test]
    fn empty_node_lump_decodes() {
        let mut lumps = two_room_lumps(MapFormat::Doom);
        lumps[7].1.clear();
        let wad = Wad::from_bytes(build_wad(&lumps)).unwrap();
        assert!(wad.parse_level(0).unwrap().nodes.is_empty());
    }

    #[test]
    fn bad_marker_oob() {
        let wad = two_room_wad(MapFormat::Doom);
        let err = wad.parse_level(wad.lumps().len() + 10).unwrap_err();
        assert!(matches!(err, LevelError::MarkerOob(_)));
    }

    #[test]
    fn missing_things_guard() {
        let wad = two_room_wad(MapFormat::Doom);
        // starting from LINEDEFS, parse_level should complain that THINGS
        // is missing
        let err = wad.parse_level(1).unwrap_err();
        assert!(matches!(err, LevelError::Missing("THINGS")));
    }
}
