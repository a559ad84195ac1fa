//! Hand-built maps for unit tests.

use glam::{DVec2, DVec3};

use crate::world::bsp::SUBSECTOR_BIT;
use crate::world::fixed::from_map_units;
use crate::world::geometry::{
    Level, Linedef, LinedefFlags, Node, Sector, SectorId, Subsector, Thing, Vertex, VertexData,
};

pub const CEILING: f64 = 128.0;

#[derive(Default)]
pub struct MapBuilder {
    pub vertices: Vec<Vertex>,
    pub lines: Vec<Linedef>,
    pub sectors: Vec<Sector>,
    pub things: Vec<Thing>,
    pub subsectors: Vec<Subsector>,
    pub nodes: Vec<Node>,
    pub vertex_data: Vec<VertexData>,
    pub old_vertex_table: Option<Vec<u32>>,
}

pub fn line(v1: u16, v2: u16, front: SectorId, back: Option<SectorId>) -> Linedef {
    Linedef {
        v1,
        v2,
        flags: if back.is_some() {
            LinedefFlags::TWO_SIDED
        } else {
            LinedefFlags::IMPASSABLE
        },
        special: 0,
        args: [0; 5],
        id: 0,
        front,
        back,
    }
}

pub fn thing(ednum: u16, x: f64, y: f64, z: f64) -> Thing {
    Thing {
        thing_id: 0,
        pos: DVec3::new(x, y, z),
        angle: 0,
        ednum,
        flags: 0,
        args: [0; 5],
    }
}

impl MapBuilder {
    /// Two 128×128 rooms side by side: A = x∈[0,128] (sector 0),
    /// B = x∈[128,256] (sector 1). Line 2 runs (128,128)→(128,0) with A
    /// in front and B behind.
    pub fn two_rooms(floor_a: f64, floor_b: f64) -> Self {
        let pts = [
            (0.0, 0.0),
            (0.0, 128.0),
            (128.0, 128.0),
            (128.0, 0.0),
            (256.0, 128.0),
            (256.0, 0.0),
        ];
        MapBuilder {
            vertices: pts
                .iter()
                .map(|&(x, y)| Vertex {
                    pos: DVec2::new(x, y),
                })
                .collect(),
            lines: vec![
                line(0, 1, 0, None),
                line(1, 2, 0, None),
                line(2, 3, 0, Some(1)),
                line(3, 0, 0, None),
                line(2, 4, 1, None),
                line(4, 5, 1, None),
                line(5, 3, 1, None),
            ],
            sectors: vec![
                Sector::new(floor_a, CEILING, 0),
                Sector::new(floor_b, CEILING, 0),
            ],
            subsectors: vec![Subsector { sector: 0 }, Subsector { sector: 1 }],
            ..Default::default()
        }
    }

    /// Right triangle (0,0) (0,128) (128,0) as sector 0.
    pub fn triangle(floor: f64) -> Self {
        MapBuilder {
            vertices: [(0.0, 0.0), (0.0, 128.0), (128.0, 0.0)]
                .iter()
                .map(|&(x, y)| Vertex {
                    pos: DVec2::new(x, y),
                })
                .collect(),
            lines: vec![line(0, 1, 0, None), line(1, 2, 0, None), line(2, 0, 0, None)],
            sectors: vec![Sector::new(floor, CEILING, 0)],
            subsectors: vec![Subsector { sector: 0 }],
            ..Default::default()
        }
    }

    /// Splitter along x = 128 separating the two rooms.
    pub fn with_split(mut self) -> Self {
        self.nodes.push(Node {
            x: from_map_units(128),
            y: 0,
            dx: 0,
            dy: from_map_units(128),
            child: [SUBSECTOR_BIT | 1, SUBSECTOR_BIT],
        });
        self
    }

    pub fn with_thing(mut self, t: Thing) -> Self {
        self.things.push(t);
        self
    }

    pub fn build(self) -> Level {
        let mut lvl = Level::new(
            "TEST",
            self.things,
            self.lines,
            self.vertices,
            self.subsectors,
            self.nodes,
            self.sectors,
        );
        lvl.vertex_data = self.vertex_data;
        lvl.old_vertex_table = self.old_vertex_table;
        lvl
    }
}
