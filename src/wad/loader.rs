// ──────────────────────────────────────────────────────────────────────────
// wad/loader.rs
//
//  *   RawLevel   (wad::level)   ──►   world::Level
//                                        + sector line lists
//                                        + tag tables
// ──────────────────────────────────────────────────────────────────────────

use crate::{
    defs::{LINE_SET_IDENTIFICATION, PLANE_ALIGN},
    wad::level::{self as raw_level, MapFormat, NO_SIDE},
    wad::raw::{Wad, WadError},
    world::{self as geo, SectorId, fixed::from_map_units},
};
use glam::{DVec2, DVec3};
use log::info;
use thiserror::Error;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error(transparent)]
    Level(#[from] raw_level::LevelError),

    #[error("linedef {0} has no front side")]
    NoFrontSide(usize),

    #[error("linedef {line} references missing {what} {index}")]
    BadLineRef {
        line: usize,
        what: &'static str,
        index: usize,
    },

    #[error("sidedef {side} references missing sector {sector}")]
    BadSidedefSector { side: usize, sector: usize },

    #[error("subsector {0} has no usable first seg")]
    BadSubsector(usize),

    #[error("node {node} child {child:#06x} is not an earlier node or a subsector")]
    BadNodeChild { node: usize, child: u16 },
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Load the map at `marker` into a `world::Level` ready for the slope
/// passes.
pub fn load_level(wad: &Wad, marker: usize) -> Result<geo::Level, LoadError> {
    /*----- 1. Raw lumps --------------------------------------------------*/
    let raw = wad.parse_level(marker)?;

    /*----- 2. Sidedef → sector ------------------------------------------*/
    let side_sector = |side: u16| -> Option<SectorId> {
        raw.sidedefs.get(side as usize).map(|s| s.sector)
    };
    for (i, s) in raw.sidedefs.iter().enumerate() {
        if s.sector as usize >= raw.sectors.len() {
            return Err(LoadError::BadSidedefSector {
                side: i,
                sector: s.sector as usize,
            });
        }
    }

    /*----- 3. Convert raw → geo lists ------------------------------------*/
    use geo::*;

    let things: Vec<Thing> = raw.things.iter().map(raw_to_geo::thing_from).collect();

    let vertices: Vec<Vertex> = raw.vertices.iter().map(raw_to_geo::vertex_from).collect();

    let linedefs: Vec<Linedef> = raw
        .linedefs
        .iter()
        .enumerate()
        .map(|(i, r)| {
            for v in [r.v1, r.v2] {
                if v as usize >= vertices.len() {
                    return Err(LoadError::BadLineRef {
                        line: i,
                        what: "vertex",
                        index: v as usize,
                    });
                }
            }
            let side = |n: u16| match n {
                NO_SIDE => Ok(None),
                n => side_sector(n).map(Some).ok_or(LoadError::BadLineRef {
                    line: i,
                    what: "sidedef",
                    index: n as usize,
                }),
            };
            let front = side(r.sidenum[0])?.ok_or(LoadError::NoFrontSide(i))?;
            let back = side(r.sidenum[1])?;
            Ok(raw_to_geo::linedef_from(r, raw.format, front, back))
        })
        .collect::<Result<_, LoadError>>()?;

    let subsectors: Vec<Subsector> = raw
        .subsectors
        .iter()
        .enumerate()
        .map(|(i, ss)| {
            raw.segs
                .get(ss.first_seg as usize)
                .filter(|_| ss.seg_count > 0)
                .and_then(|seg| {
                    let ld = raw.linedefs.get(seg.linedef as usize)?;
                    side_sector(ld.sidenum[(seg.side != 0) as usize])
                })
                .map(|sector| Subsector { sector })
                .ok_or(LoadError::BadSubsector(i))
        })
        .collect::<Result<_, LoadError>>()?;

    let nodes: Vec<Node> = raw.nodes.iter().map(raw_to_geo::node_from).collect();
    // node builders store children ahead of their parent, so the walk from
    // the root always terminates
    for (i, n) in nodes.iter().enumerate() {
        for &child in &n.child {
            let in_range = match child & bsp::SUBSECTOR_BIT {
                0 => (child as usize) < i,
                _ => ((child & bsp::CHILD_MASK) as usize) < subsectors.len(),
            };
            if !in_range {
                return Err(LoadError::BadNodeChild { node: i, child });
            }
        }
    }

    let sectors: Vec<Sector> = raw
        .sectors
        .iter()
        .map(|s| Sector::new(s.floor_h as f64, s.ceil_h as f64, s.tag as i32))
        .collect();

    info!(
        "loaded {} ({:?}): {} sectors, {} lines, {} things, {} nodes",
        raw.name,
        raw.format,
        sectors.len(),
        linedefs.len(),
        things.len(),
        nodes.len()
    );

    /*----- 4. Assemble world::Level -------------------------------------*/
    Ok(Level::new(
        raw.name.clone(),
        things,
        linedefs,
        vertices,
        subsectors,
        nodes,
        sectors,
    ))
}

/*====================================================================*/
/*                  Raw → Geo helpers (local)                         */
/*====================================================================*/
mod raw_to_geo {
    use super::*;

    pub fn thing_from(r: &raw_level::RawThing) -> geo::Thing {
        geo::Thing {
            thing_id: r.tid,
            pos: DVec3::new(r.x as f64, r.y as f64, r.z as f64),
            angle: r.angle as i32,
            ednum: r.ednum,
            flags: r.options,
            args: r.args,
        }
    }

    /// Line ids come from `Line_SetIdentification` (consumed here) and
    /// `Plane_Align` in Hexen maps, and from the sector tag in Doom maps.
    pub fn linedef_from(
        r: &raw_level::RawLinedef,
        format: MapFormat,
        front: SectorId,
        back: Option<SectorId>,
    ) -> geo::Linedef {
        let (special, id) = match (format, r.special) {
            (MapFormat::Doom, _) => (0, r.tag),
            (MapFormat::Hexen, LINE_SET_IDENTIFICATION) => (0, r.args[0] + 256 * r.args[4]),
            (MapFormat::Hexen, PLANE_ALIGN) => (PLANE_ALIGN, r.args[2]),
            (MapFormat::Hexen, special) => (special, 0),
        };
        geo::Linedef {
            v1: r.v1,
            v2: r.v2,
            flags: geo::LinedefFlags::from_bits_truncate(r.flags),
            special,
            args: r.args,
            id,
            front,
            back,
        }
    }

    pub fn vertex_from(r: &raw_level::RawVertex) -> geo::Vertex {
        geo::Vertex {
            pos: DVec2::new(r.x as f64, r.y as f64),
        }
    }

    pub fn node_from(r: &raw_level::RawNode) -> geo::Node {
        geo::Node {
            x: from_map_units(r.x),
            y: from_map_units(r.y),
            dx: from_map_units(r.dx),
            dy: from_map_units(r.dy),
            child: r.child,
        }
    }
}

/*====================================================================*/
/*                               Tests                                */
/*====================================================================*/
