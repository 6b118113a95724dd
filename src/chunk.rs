use std::sync::Arc;

use loam_geom::Position;
use loam_mesh_cpu::DrawableHandle;
use loam_voxel::SparseVolume;

/// Lifecycle of one chunk's two-phase background pipeline.
///
/// `Invalid` only comes from default construction and marks a value that
/// must never be polled or drawn. The other states advance one way:
/// `Generating` → `Meshing` → `Ready`, with `Failed` as the terminal state
/// for a chunk whose generation or upload went wrong.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Invalid,
    Generating,
    Meshing,
    Ready,
    Failed,
}

/// One unit of terrain: a chunk-space location, the generated volume once
/// phase one finishes, and the renderer's drawable handle once phase two
/// finishes.
pub struct Chunk {
    pub location: Position,
    /// Detail level from the chunk's distance to the origin; tracked but not
    /// yet consulted by generation or meshing.
    #[allow(dead_code)]
    pub lod: u8,
    state: ChunkState,
    volume: Option<Arc<SparseVolume>>,
    drawable: Option<DrawableHandle>,
    failure: Option<String>,
}

impl Default for Chunk {
    /// Sentinel value; polling it is a logic error upstream.
    fn default() -> Self {
        Self {
            location: Position::ZERO,
            lod: 0,
            state: ChunkState::Invalid,
            volume: None,
            drawable: None,
            failure: None,
        }
    }
}

impl Chunk {
    /// A chunk whose generation job is about to be submitted.
    pub fn new(location: Position) -> Self {
        Self {
            location,
            lod: lod_for(location),
            state: ChunkState::Generating,
            volume: None,
            drawable: None,
            failure: None,
        }
    }

    #[inline]
    pub fn state(&self) -> ChunkState {
        self.state
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        matches!(self.state, ChunkState::Ready | ChunkState::Failed)
    }

    #[inline]
    pub fn volume(&self) -> Option<&Arc<SparseVolume>> {
        self.volume.as_ref()
    }

    #[inline]
    pub fn drawable(&self) -> Option<DrawableHandle> {
        self.drawable
    }

    #[inline]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Stores the generated volume and moves to `Meshing`. Returns the
    /// volume to hand to the mesh job, or `None` if the chunk is not waiting
    /// on generation (stale result; caller drops it).
    pub fn complete_generation(&mut self, volume: SparseVolume) -> Option<Arc<SparseVolume>> {
        if self.state != ChunkState::Generating {
            log::warn!(
                "chunk {:?}: generation result arrived in state {:?}; dropped",
                self.location,
                self.state
            );
            return None;
        }
        let volume = Arc::new(volume);
        self.volume = Some(volume.clone());
        self.state = ChunkState::Meshing;
        Some(volume)
    }

    /// Stores the drawable handle and moves to `Ready`. A result for a chunk
    /// that is not waiting on meshing is dropped.
    pub fn complete_mesh(&mut self, drawable: DrawableHandle) {
        if self.state != ChunkState::Meshing {
            log::warn!(
                "chunk {:?}: mesh result arrived in state {:?}; dropped",
                self.location,
                self.state
            );
            return;
        }
        self.drawable = Some(drawable);
        self.state = ChunkState::Ready;
    }

    /// Parks the chunk in the terminal `Failed` state. Settled chunks are
    /// left as they are.
    pub fn fail(&mut self, reason: String) {
        if self.is_settled() {
            log::warn!(
                "chunk {:?}: failure ({reason}) arrived in state {:?}; dropped",
                self.location,
                self.state
            );
            return;
        }
        log::error!("chunk {:?} failed: {reason}", self.location);
        self.failure = Some(reason);
        self.state = ChunkState::Failed;
    }
}

fn lod_for(location: Position) -> u8 {
    location.chebyshev(Position::ZERO).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chunk_is_the_invalid_sentinel() {
        let chunk = Chunk::default();
        assert_eq!(chunk.state(), ChunkState::Invalid);
        assert!(chunk.drawable().is_none());
        assert!(chunk.volume().is_none());
    }

    #[test]
    fn lifecycle_advances_one_way() {
        let mut chunk = Chunk::new(Position::new(2, 0, -1));
        assert_eq!(chunk.state(), ChunkState::Generating);
        assert_eq!(chunk.lod, 2);

        let vol = chunk.complete_generation(SparseVolume::new());
        assert!(vol.is_some());
        assert_eq!(chunk.state(), ChunkState::Meshing);

        // A duplicate generation result is discarded, not re-applied.
        assert!(chunk.complete_generation(SparseVolume::new()).is_none());
        assert_eq!(chunk.state(), ChunkState::Meshing);

        chunk.complete_mesh(DrawableHandle(7));
        assert_eq!(chunk.state(), ChunkState::Ready);
        assert_eq!(chunk.drawable(), Some(DrawableHandle(7)));

        // Stale results never regress a ready chunk.
        chunk.complete_mesh(DrawableHandle(8));
        assert_eq!(chunk.drawable(), Some(DrawableHandle(7)));
        chunk.fail("late".into());
        assert_eq!(chunk.state(), ChunkState::Ready);
    }

    #[test]
    fn failure_is_terminal() {
        let mut chunk = Chunk::new(Position::ZERO);
        chunk.fail("generator blew up".into());
        assert_eq!(chunk.state(), ChunkState::Failed);
        assert_eq!(chunk.failure(), Some("generator blew up"));

        chunk.complete_generation(SparseVolume::new());
        assert_eq!(chunk.state(), ChunkState::Failed);
        chunk.complete_mesh(DrawableHandle(1));
        assert!(chunk.drawable().is_none());
    }
}
