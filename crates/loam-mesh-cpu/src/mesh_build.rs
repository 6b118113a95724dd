use loam_geom::Vec3;

// Unit cube corners; index order is shared with CUBE_INDICES below.
const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

// 12 triangles, counter-clockwise when seen from outside the cube.
const CUBE_INDICES: [u32; 36] = [
    0, 2, 1, 0, 3, 2, // -z
    4, 5, 6, 4, 6, 7, // +z
    0, 7, 3, 0, 4, 7, // -x
    1, 2, 6, 1, 6, 5, // +x
    2, 3, 7, 2, 7, 6, // +y
    0, 1, 5, 0, 5, 4, // -y
];

/// Vertices a single emitted cube contributes.
pub const CUBE_VERTS: usize = CUBE_CORNERS.len();
/// Indices a single emitted cube contributes.
pub const CUBE_IDX: usize = CUBE_INDICES.len();

/// Growable CPU-side mesh buffers: interleaved-by-array positions, vertex
/// colors, and u32 triangle indices.
#[derive(Default, Clone)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub col: Vec<u8>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.col.clear();
        self.idx.clear();
    }

    /// Pre-reserve capacity for approximately `n_cubes` cubes worth of data.
    #[inline]
    pub fn reserve_cubes(&mut self, n_cubes: usize) {
        self.pos.reserve(n_cubes * CUBE_VERTS * 3);
        self.col.reserve(n_cubes * CUBE_VERTS * 4);
        self.idx.reserve(n_cubes * CUBE_IDX);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.idx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }

    /// Appends one unit cube at `origin`: 8 shared vertices and 36 indices
    /// from the static template, every vertex carrying `rgba`.
    pub fn add_cube(&mut self, origin: Vec3, rgba: [u8; 4]) {
        let base = self.vertex_count() as u32;
        for corner in CUBE_CORNERS {
            self.pos.push(origin.x + corner[0]);
            self.pos.push(origin.y + corner[1]);
            self.pos.push(origin.z + corner[2]);
            self.col.extend_from_slice(&rgba);
        }
        self.idx.extend(CUBE_INDICES.iter().map(|i| base + i));
    }
}
