use loam_geom::Position;
use loam_voxel::{SparseVolume, VOXEL_MAX, VOXEL_MIN, Voxel, VolumeError};

use crate::terrain::{CHUNK_STRIDE, GenCtx, World};

/// Output of one chunk generation sweep.
pub struct GenerateResult {
    pub volume: SparseVolume,
    /// Surface voxels written; the mesh of this volume emits exactly one
    /// cube per entry.
    pub surface_voxels: u32,
}

/// Samples the height field over the chunk's 512x512 footprint and writes
/// one opaque surface voxel per column into a fresh volume.
///
/// The volume is local: columns span `[-256, 255]` around the chunk's own
/// origin, which sits at `chunk_pos * CHUNK_STRIDE` in world space.
pub fn generate_volume(
    world: &World,
    ctx: &GenCtx,
    chunk_pos: Position,
) -> Result<GenerateResult, VolumeError> {
    let origin = chunk_pos * CHUNK_STRIDE;
    let mut volume = SparseVolume::new();
    let mut surface_voxels = 0u32;
    for x in VOXEL_MIN..=VOXEL_MAX {
        for z in VOXEL_MIN..=VOXEL_MAX {
            let y = world.height_at(ctx, origin.x + x, origin.z + z);
            *volume.voxel_mut(Position::new(x, y, z))? = surface_color(x, z);
            surface_voxels += 1;
        }
    }
    Ok(GenerateResult {
        volume,
        surface_voxels,
    })
}

// Color ramp over the normalized footprint position, fully opaque.
fn surface_color(x: i32, z: i32) -> Voxel {
    let fx = (x - VOXEL_MIN) as f32 / (CHUNK_STRIDE - 1) as f32;
    let fz = (z - VOXEL_MIN) as f32 / (CHUNK_STRIDE - 1) as f32;
    Voxel::from_linear(fx, 1.0 - 0.5 * (fx + fz), fz)
}
