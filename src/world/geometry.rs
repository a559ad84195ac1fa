use bitflags::bitflags;
use glam::{DVec2, DVec3};
use smallvec::SmallVec;

use crate::defs::VertexDataFlags;
use crate::world::fixed::Fixed;
use crate::world::plane::{Plane, PlaneSide};
use crate::world::tags::TagManager;

pub type SubsectorId = u16;
pub type LinedefId = u16;
pub type VertexId = u16;
pub type SectorId = u16;

/// Tolerance of the precise side test (one fixed-point fraction).
pub const EQUAL_EPSILON: f64 = 1.0 / 65536.0;

/// Map snapshot owned by the loader. Every cross reference is an index
/// into one of the arenas below.
#[derive(Debug)]
pub struct Level {
    pub name: String,
    pub things: Vec<Thing>,
    pub linedefs: Vec<Linedef>,
    pub vertices: Vec<Vertex>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub sectors: Vec<Sector>,
    /// Persisted per-vertex height overrides, consumed by the slope phase.
    pub vertex_data: Vec<VertexData>,
    /// Maps `vertex_data` slots to vertex indices for older node formats.
    pub old_vertex_table: Option<Vec<u32>>,
    pub tags: TagManager,
}

/*------------------------- game objects -----------------------------*/

#[derive(Clone, Debug)]
pub struct Thing {
    pub thing_id: i32,
    /// `z` is the height field as stored in the map.
    pub pos: DVec3,
    pub angle: i32, // degrees
    pub ednum: u16,
    pub flags: u16,
    pub args: [i32; 5],
}

/*--------------------------- linedefs -------------------------------*/

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct LinedefFlags: u16 {
        const IMPASSABLE      = 0x0001;
        const BLOCK_MONSTERS  = 0x0002;
        const TWO_SIDED       = 0x0004;
        const UPPER_UNPEGGED  = 0x0008;
        const LOWER_UNPEGGED  = 0x0010;
        const SECRET          = 0x0020;
        const BLOCK_SOUND     = 0x0040;
        const NOT_ON_MAP      = 0x0080;
        const ALREADY_ON_MAP  = 0x0100;
    }
}

#[derive(Clone, Debug)]
pub struct Linedef {
    pub v1: VertexId,
    pub v2: VertexId,
    pub flags: LinedefFlags,
    /// Zeroed once a slope pass has consumed it.
    pub special: u16,
    pub args: [i32; 5],
    /// Line id for tag lookups, 0 = none.
    pub id: i32,
    pub front: SectorId,
    pub back: Option<SectorId>,
}

/*----------------------- simple primitives --------------------------*/

#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub pos: DVec2,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VertexData {
    pub flags: VertexDataFlags,
    pub z_floor: f64,
    pub z_ceiling: f64,
}

#[derive(Clone, Debug)]
pub struct Subsector {
    pub sector: SectorId,
}

/// BSP partition in 16.16 fixed point. Children with
/// [`SUBSECTOR_BIT`](crate::world::bsp::SUBSECTOR_BIT) set are leaves.
#[derive(Clone, Debug)]
pub struct Node {
    pub x: Fixed,
    pub y: Fixed,
    pub dx: Fixed,
    pub dy: Fixed,
    pub child: [u16; 2],
}

#[derive(Clone, Debug)]
pub struct Sector {
    pub floor: Plane,
    pub ceiling: Plane,
    /// Authoring heights of the two surfaces; not re-derived from the planes.
    pub floor_tex_z: f64,
    pub ceil_tex_z: f64,
    pub tag: i32,
    /// Bounding lines in map order, filled by `Level::new`.
    pub lines: SmallVec<[LinedefId; 4]>,
}

impl Sector {
    pub fn new(floor_h: f64, ceil_h: f64, tag: i32) -> Self {
        Sector {
            floor: Plane::flat_floor(floor_h),
            ceiling: Plane::flat_ceiling(ceil_h),
            floor_tex_z: floor_h,
            ceil_tex_z: ceil_h,
            tag,
            lines: SmallVec::new(),
        }
    }

    #[inline]
    pub fn plane(&self, side: PlaneSide) -> &Plane {
        match side {
            PlaneSide::Floor => &self.floor,
            PlaneSide::Ceiling => &self.ceiling,
        }
    }

    #[inline]
    pub fn plane_mut(&mut self, side: PlaneSide) -> &mut Plane {
        match side {
            PlaneSide::Floor => &mut self.floor,
            PlaneSide::Ceiling => &mut self.ceiling,
        }
    }

    #[inline]
    pub fn tex_z(&self, side: PlaneSide) -> f64 {
        match side {
            PlaneSide::Floor => self.floor_tex_z,
            PlaneSide::Ceiling => self.ceil_tex_z,
        }
    }
}

// ──────────────────────────────────────────────────────────────────────────
//                       Level – construction & queries
// ──────────────────────────────────────────────────────────────────────────
impl Level {
    /// Assemble a level and derive the per-sector line lists and tag tables.
    pub fn new(
        name: impl Into<String>,
        things: Vec<Thing>,
        linedefs: Vec<Linedef>,
        vertices: Vec<Vertex>,
        subsectors: Vec<Subsector>,
        nodes: Vec<Node>,
        mut sectors: Vec<Sector>,
    ) -> Self {
        for (i, ld) in linedefs.iter().enumerate() {
            sectors[ld.front as usize].lines.push(i as LinedefId);
            if let Some(back) = ld.back.filter(|&b| b != ld.front) {
                sectors[back as usize].lines.push(i as LinedefId);
            }
        }
        let tags = TagManager::build(&sectors, &linedefs);

        Level {
            name: name.into(),
            things,
            linedefs,
            vertices,
            subsectors,
            nodes,
            sectors,
            vertex_data: Vec::new(),
            old_vertex_table: None,
            tags,
        }
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> DVec2 {
        self.vertices[id as usize].pos
    }

    /// Both endpoints of line `id`.
    #[inline]
    pub fn line_points(&self, id: LinedefId) -> (DVec2, DVec2) {
        let ld = &self.linedefs[id as usize];
        (self.vertex(ld.v1), self.vertex(ld.v2))
    }

    /// Sectors whose planes are not usable by the renderer.
    pub fn invalid_planes(&self) -> impl Iterator<Item = (SectorId, PlaneSide)> + '_ {
        self.sectors.iter().enumerate().flat_map(|(i, s)| {
            PlaneSide::BOTH
                .into_iter()
                .filter(move |&side| !s.plane(side).is_valid())
                .map(move |side| (i as SectorId, side))
        })
    }
}

/// 0 = front (right-hand side), 1 = back. Points within
/// [`EQUAL_EPSILON`] of the line count as front.
#[inline]
pub fn point_on_line_side_precise(p: DVec2, v1: DVec2, v2: DVec2) -> i32 {
    let delta = v2 - v1;
    ((p.y - v1.y) * delta.x + (v1.x - p.x) * delta.y > EQUAL_EPSILON) as i32
}
