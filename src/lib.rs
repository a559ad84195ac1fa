pub mod defs;
pub mod slopes;
pub mod wad;
pub mod world;
