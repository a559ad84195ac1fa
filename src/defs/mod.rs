pub mod flags;

pub use self::flags::{CompatFlags, VertexDataFlags};

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Line special: align a plane across a two-sided line.
pub const PLANE_ALIGN: u16 = 181;
/// Line special: copy planes from tagged sectors.
pub const PLANE_COPY: u16 = 118;
/// Line special (Hexen format): assigns the line id.
pub const LINE_SET_IDENTIFICATION: u16 = 121;

/// Placeholder things that shape sector planes instead of spawning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlopeThing {
    FloorPointLine,
    CeilingPointLine,
    SetFloorSlope,
    SetCeilingSlope,
    CopyFloorPlane,
    CopyCeilingPlane,
    VavoomFloor,
    VavoomCeiling,
    VertexFloorZ,
    VertexCeilingZ,
}

pub struct SlopeThingInfo {
    pub ednum: u16,
    pub kind: SlopeThing,
}

pub const SLOPE_THINGS: &[SlopeThingInfo] = &[
    SlopeThingInfo {
        ednum: 9500,
        kind: SlopeThing::FloorPointLine,
    },
    SlopeThingInfo {
        ednum: 9501,
        kind: SlopeThing::CeilingPointLine,
    },
    SlopeThingInfo {
        ednum: 9502,
        kind: SlopeThing::SetFloorSlope,
    },
    SlopeThingInfo {
        ednum: 9503,
        kind: SlopeThing::SetCeilingSlope,
    },
    SlopeThingInfo {
        ednum: 9510,
        kind: SlopeThing::CopyFloorPlane,
    },
    SlopeThingInfo {
        ednum: 9511,
        kind: SlopeThing::CopyCeilingPlane,
    },
    SlopeThingInfo {
        ednum: 1500,
        kind: SlopeThing::VavoomFloor,
    },
    SlopeThingInfo {
        ednum: 1501,
        kind: SlopeThing::VavoomCeiling,
    },
    SlopeThingInfo {
        ednum: 1504,
        kind: SlopeThing::VertexFloorZ,
    },
    SlopeThingInfo {
        ednum: 1505,
        kind: SlopeThing::VertexCeilingZ,
    },
];

static BY_EDNUM: Lazy<HashMap<u16, SlopeThing>> =
    Lazy::new(|| SLOPE_THINGS.iter().map(|i| (i.ednum, i.kind)).collect());

pub fn slope_thing(ednum: u16) -> Option<SlopeThing> {
    BY_EDNUM.get(&ednum).copied()
}

pub fn ednum_of(kind: SlopeThing) -> u16 {
    SLOPE_THINGS
        .iter()
        .find(|i| i.kind == kind)
        .map_or(0, |i| i.ednum)
}
