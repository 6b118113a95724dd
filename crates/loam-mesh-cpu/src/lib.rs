//! CPU meshing for bricks and sparse volumes, plus the renderer upload seam.
//!
//! The emitters are deliberately naive: one cube per drawable voxel, no face
//! culling between adjacent solids, no deduplication.
#![forbid(unsafe_code)]

mod chunk;
mod mesh_build;
mod upload;

pub use chunk::ChunkMeshCpu;
pub use mesh_build::{CUBE_IDX, CUBE_VERTS, MeshBuild};
pub use upload::{DrawableHandle, DrawableUploader, UploadError};

use loam_geom::{Aabb, Position, Vec3};
use loam_voxel::{BRICK_EDGE, Brick, Cell, SparseVolume, VOXEL_MAX, VOXEL_MIN};

#[inline]
fn linear_rgba(voxel: loam_voxel::Voxel) -> [u8; 4] {
    // White base vertices scaled by the voxel's linear-space color.
    let [r, g, b] = voxel.to_linear();
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
        voxel.a,
    ]
}

/// Emits every drawable voxel of `brick` as a unit cube translated to
/// `origin + local`. Locals are visited x outermost, z innermost.
pub fn build_brick_mesh(brick: &Brick, origin: Vec3, out: &mut MeshBuild) {
    for (local, voxel) in brick.voxels() {
        if !voxel.should_draw() {
            continue;
        }
        out.add_cube(origin + Vec3::from(local), linear_rgba(voxel));
    }
}

/// Meshes a whole volume positioned at `origin` (the world-space location of
/// the volume's center voxel (0,0,0)).
///
/// Dense cells delegate to [`build_brick_mesh`] at the cell's world offset.
/// Uniform cells emit nothing; generation only writes drawable voxels
/// through the promoting accessor, so a drawable uniform cell indicates a
/// storage bug and is reported once per volume.
pub fn build_volume_mesh(volume: &SparseVolume, coord: Position, origin: Vec3) -> ChunkMeshCpu {
    let mut build = MeshBuild::default();
    // Height-field content has one surface voxel per column of a promoted
    // brick; this is a reserve hint, not a cap.
    build.reserve_cubes(volume.dense_cells() * BRICK_EDGE * BRICK_EDGE);

    let mut warned = false;
    for (cell, state) in volume.cells() {
        match state {
            Cell::Dense(brick) => {
                let base = SparseVolume::recompose(cell, Position::ZERO);
                build_brick_mesh(brick, origin + Vec3::from(base), &mut build);
            }
            Cell::Uniform(v) => {
                if v.should_draw() && !warned {
                    log::warn!(
                        "volume {:?}: drawable uniform cell at {:?} emits no geometry",
                        coord,
                        cell
                    );
                    warned = true;
                }
            }
        }
    }

    let lo = VOXEL_MIN as f32;
    let hi = (VOXEL_MAX + 1) as f32;
    let bbox = Aabb::new(
        origin + Vec3::new(lo, lo, lo),
        origin + Vec3::new(hi, hi, hi),
    );
    ChunkMeshCpu { coord, bbox, build }
}
