use loam_geom::Position;
use thiserror::Error;

/// Coordinate violations raised by brick and volume accessors.
///
/// These are checked in every build profile; callers that computed the
/// coordinate themselves may treat one as a logic bug and propagate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VolumeError {
    #[error("local coordinate {pos:?} outside brick bounds [0, {edge})")]
    LocalOutOfRange { pos: Position, edge: i32 },

    #[error("voxel coordinate {pos:?} outside volume bounds [{min}, {max}]")]
    VoxelOutOfRange { pos: Position, min: i32, max: i32 },
}
