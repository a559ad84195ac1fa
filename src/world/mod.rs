pub mod bsp;
pub mod fixed;
mod geometry;
mod plane;
mod tags;

#[cfg(test)]
pub(crate) mod testmap;

pub use geometry::{
    EQUAL_EPSILON, Level, Linedef, LinedefFlags, LinedefId, Node, Sector, SectorId, Subsector,
    SubsectorId, Thing, Vertex, VertexData, VertexId, point_on_line_side_precise,
};
pub use plane::{Plane, PlaneSide};
pub use tags::TagManager;
