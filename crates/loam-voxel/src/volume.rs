use loam_geom::Position;

use crate::brick::{BRICK_EDGE, Brick};
use crate::error::VolumeError;
use crate::voxel::Voxel;

/// Cells per volume axis.
pub const VOLUME_CELLS: usize = 64;
/// Smallest valid absolute voxel coordinate per axis.
pub const VOXEL_MIN: i32 = -((VOLUME_CELLS * BRICK_EDGE) as i32) / 2;
/// Largest valid absolute voxel coordinate per axis.
pub const VOXEL_MAX: i32 = ((VOLUME_CELLS * BRICK_EDGE) as i32) / 2 - 1;

// Recenters the signed cell coordinate range onto the unsigned grid.
const CELL_OFFSET: i32 = (VOLUME_CELLS as i32) / 2;

/// One cell of a sparse volume: a uniform color until the first write
/// promotes it to an owned dense brick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Uniform(Voxel),
    Dense(Box<Brick>),
}

/// A 64x64x64 grid of cells addressed by absolute voxel coordinates in
/// `[-256, 255]` per axis.
///
/// Promotion is one-directional: once a cell owns a brick it never
/// collapses back to uniform, even if every voxel in it ends up equal.
#[derive(Clone, Debug)]
pub struct SparseVolume {
    cells: Vec<Cell>,
}

impl Default for SparseVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseVolume {
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::Uniform(Voxel::default()); VOLUME_CELLS * VOLUME_CELLS * VOLUME_CELLS],
        }
    }

    /// Splits an absolute voxel position into `(cell, local)` grid
    /// coordinates. The flooring division and cyclic remainder keep locals
    /// in `[0, 7]` for negative positions too.
    #[inline]
    pub fn decompose(pos: Position) -> Result<(Position, Position), VolumeError> {
        if pos.x < VOXEL_MIN
            || pos.x > VOXEL_MAX
            || pos.y < VOXEL_MIN
            || pos.y > VOXEL_MAX
            || pos.z < VOXEL_MIN
            || pos.z > VOXEL_MAX
        {
            return Err(VolumeError::VoxelOutOfRange {
                pos,
                min: VOXEL_MIN,
                max: VOXEL_MAX,
            });
        }
        let cell = pos.div_euclid(BRICK_EDGE as i32) + Position::splat(CELL_OFFSET);
        let local = pos.rem_euclid(BRICK_EDGE as i32);
        Ok((cell, local))
    }

    /// Inverse of [`SparseVolume::decompose`].
    #[inline]
    pub fn recompose(cell: Position, local: Position) -> Position {
        (cell - Position::splat(CELL_OFFSET)) * BRICK_EDGE as i32 + local
    }

    #[inline]
    fn cell_index(cell: Position) -> usize {
        (cell.x as usize * VOLUME_CELLS + cell.y as usize) * VOLUME_CELLS + cell.z as usize
    }

    /// The cell at grid coordinates in `[0, 63]` per axis.
    pub fn cell(&self, cell: Position) -> Option<&Cell> {
        let edge = VOLUME_CELLS as i32;
        if cell.x < 0 || cell.x >= edge || cell.y < 0 || cell.y >= edge || cell.z < 0 || cell.z >= edge
        {
            return None;
        }
        Some(&self.cells[Self::cell_index(cell)])
    }

    /// Read access; never promotes.
    pub fn voxel(&self, pos: Position) -> Result<Voxel, VolumeError> {
        let (cell, local) = Self::decompose(pos)?;
        match &self.cells[Self::cell_index(cell)] {
            Cell::Uniform(v) => Ok(*v),
            Cell::Dense(brick) => brick.get(local),
        }
    }

    /// Write access. A uniform cell is first promoted to a dense brick
    /// pre-filled with the uniform color, then the addressed voxel is
    /// returned from the new brick.
    pub fn voxel_mut(&mut self, pos: Position) -> Result<&mut Voxel, VolumeError> {
        let (cell, local) = Self::decompose(pos)?;
        let slot = &mut self.cells[Self::cell_index(cell)];
        if let Cell::Uniform(fill) = *slot {
            *slot = Cell::Dense(Box::new(Brick::filled(fill)));
        }
        match slot {
            Cell::Dense(brick) => brick.get_mut(local),
            Cell::Uniform(_) => unreachable!("cell was promoted above"),
        }
    }

    /// All cells with their grid coordinates, x outermost and z innermost.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        (0..VOLUME_CELLS).flat_map(move |x| {
            (0..VOLUME_CELLS).flat_map(move |y| {
                (0..VOLUME_CELLS).map(move |z| {
                    let cell = Position::new(x as i32, y as i32, z as i32);
                    (cell, &self.cells[Self::cell_index(cell)])
                })
            })
        })
    }

    /// Number of cells that have been promoted to dense bricks.
    pub fn dense_cells(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Dense(_)))
            .count()
    }

    /// Whether any voxel in the volume would draw.
    pub fn has_drawable(&self) -> bool {
        self.cells.iter().any(|c| match c {
            Cell::Uniform(v) => v.should_draw(),
            Cell::Dense(brick) => brick.iter().any(|v| v.should_draw()),
        })
    }
}
