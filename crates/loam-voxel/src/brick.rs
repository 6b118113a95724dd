use loam_geom::Position;

use crate::error::VolumeError;
use crate::voxel::Voxel;

/// Voxels per brick axis.
pub const BRICK_EDGE: usize = 8;
/// Voxels per brick.
pub const BRICK_VOLUME: usize = BRICK_EDGE * BRICK_EDGE * BRICK_EDGE;

/// A fully materialized 8x8x8 block of voxels in contiguous storage.
///
/// Local coordinates are bounds-checked to `[0, 7]` per axis in every
/// build profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Brick {
    voxels: [Voxel; BRICK_VOLUME],
}

impl Default for Brick {
    fn default() -> Self {
        Self::filled(Voxel::default())
    }
}

impl Brick {
    /// Brick with every voxel set to `fill`. Promotion of a uniform cell
    /// uses this so untouched voxels keep the cell's prior color.
    pub fn filled(fill: Voxel) -> Self {
        Self {
            voxels: [fill; BRICK_VOLUME],
        }
    }

    #[inline]
    fn index_of(local: Position) -> Result<usize, VolumeError> {
        let edge = BRICK_EDGE as i32;
        if local.x < 0
            || local.x >= edge
            || local.y < 0
            || local.y >= edge
            || local.z < 0
            || local.z >= edge
        {
            return Err(VolumeError::LocalOutOfRange { pos: local, edge });
        }
        Ok((local.x as usize * BRICK_EDGE + local.y as usize) * BRICK_EDGE + local.z as usize)
    }

    #[inline]
    pub fn get(&self, local: Position) -> Result<Voxel, VolumeError> {
        Ok(self.voxels[Self::index_of(local)?])
    }

    #[inline]
    pub fn get_mut(&mut self, local: Position) -> Result<&mut Voxel, VolumeError> {
        let idx = Self::index_of(local)?;
        Ok(&mut self.voxels[idx])
    }

    /// All voxels with their local positions, x outermost and z innermost.
    pub fn voxels(&self) -> impl Iterator<Item = (Position, Voxel)> + '_ {
        (0..BRICK_EDGE).flat_map(move |x| {
            (0..BRICK_EDGE).flat_map(move |y| {
                (0..BRICK_EDGE).map(move |z| {
                    let local = Position::new(x as i32, y as i32, z as i32);
                    let idx = (x * BRICK_EDGE + y) * BRICK_EDGE + z;
                    (local, self.voxels[idx])
                })
            })
        })
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = Voxel> + '_ {
        self.voxels.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_sets_all_voxels() {
        let fill = Voxel::rgb(1, 2, 3);
        let brick = Brick::filled(fill);
        assert!(brick.iter().all(|v| v == fill));
    }

    #[test]
    fn out_of_range_locals_are_rejected() {
        let mut brick = Brick::default();
        for bad in [
            Position::new(-1, 0, 0),
            Position::new(0, 8, 0),
            Position::new(0, 0, 100),
        ] {
            assert!(matches!(
                brick.get(bad),
                Err(VolumeError::LocalOutOfRange { .. })
            ));
            assert!(brick.get_mut(bad).is_err());
        }
    }

    #[test]
    fn voxels_yields_every_local_once() {
        let mut brick = Brick::default();
        *brick.get_mut(Position::new(7, 0, 3)).unwrap() = Voxel::rgb(9, 9, 9);
        let mut seen = 0usize;
        let mut hit = false;
        for (local, v) in brick.voxels() {
            seen += 1;
            assert_eq!(v, brick.get(local).unwrap());
            hit |= local == Position::new(7, 0, 3);
        }
        assert_eq!(seen, BRICK_VOLUME);
        assert!(hit);
    }
}
