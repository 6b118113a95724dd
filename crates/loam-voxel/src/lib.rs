//! Voxel value type and two-level sparse voxel storage.
#![forbid(unsafe_code)]

pub mod brick;
pub mod error;
pub mod volume;
pub mod voxel;

pub use brick::{BRICK_EDGE, BRICK_VOLUME, Brick};
pub use error::VolumeError;
pub use volume::{Cell, SparseVolume, VOLUME_CELLS, VOXEL_MAX, VOXEL_MIN};
pub use voxel::Voxel;
