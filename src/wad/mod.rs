mod level;
mod loader;
mod raw;

pub use level::{
    LevelError, MapFormat, NO_SIDE, RawLevel, RawLinedef, RawNode, RawSector, RawSeg,
    RawSidedef, RawSubsector, RawThing, RawVertex,
};
pub use loader::{LoadError, load_level};
pub use raw::{LumpInfo, Wad, WadError};
