use loam_geom::{Aabb, Position};

use crate::mesh_build::MeshBuild;

/// CPU-side mesh for one chunk, ready for upload.
pub struct ChunkMeshCpu {
    pub coord: Position,
    pub bbox: Aabb,
    pub build: MeshBuild,
}
