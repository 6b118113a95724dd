//! Deterministic terrain sampling and chunk volume generation.
#![forbid(unsafe_code)]

mod generate;
mod terrain;
pub mod worldgen;

pub use generate::{GenerateResult, generate_volume};
pub use terrain::{CHUNK_STRIDE, GenCtx, World, WorldGenMode};
pub use worldgen::{Height, Mode, WorldGenConfig};
