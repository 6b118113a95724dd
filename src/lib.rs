//! Terrain core: per-chunk pipeline state machines and the world registry
//! that drives them once per tick.
#![forbid(unsafe_code)]

pub mod chunk;
pub mod worldstate;

pub use chunk::{Chunk, ChunkState};
pub use worldstate::{StateCounts, WorldState};
