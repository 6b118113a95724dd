use std::collections::HashMap;
use std::sync::Arc;

use loam_geom::Position;
use loam_mesh_cpu::{DrawableHandle, DrawableUploader};
use loam_runtime::{GenJob, MeshJob, Runtime};
use loam_voxel::SparseVolume;
use loam_world::World;

use crate::chunk::{Chunk, ChunkState};

/// Per-state chunk tally for logging and driver exit decisions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub generating: usize,
    pub meshing: usize,
    pub ready: usize,
    pub failed: usize,
}

/// The chunk registry and per-tick pipeline driver.
///
/// Chunks live in an explicit position-keyed map and are created once, at
/// construction, as a `(2r+1)²` grid in the y = 0 chunk layer. Footprints
/// tile the voxel lattice exactly: the chunk at chunk-space `c` owns world
/// columns `c * 512 + [-256, 255]`, so no boundary column is generated
/// twice.
pub struct WorldState {
    pub tick: u64,
    pub world: Arc<World>,
    runtime: Runtime,
    chunks: HashMap<Position, Chunk>,
    next_job_id: u64,
}

impl WorldState {
    pub fn new(world: Arc<World>, uploader: Arc<dyn DrawableUploader>, radius: i32) -> Self {
        let runtime = Runtime::new(world.clone(), uploader);
        log::info!(
            "runtime lanes: {} generation workers, {} mesh workers",
            runtime.w_gen,
            runtime.w_mesh
        );
        let mut state = Self {
            tick: 0,
            world,
            runtime,
            chunks: HashMap::new(),
            next_job_id: 1,
        };
        let radius = radius.max(0);
        for cz in -radius..=radius {
            for cx in -radius..=radius {
                state.insert_chunk(Position::new(cx, 0, cz));
            }
        }
        state
    }

    fn insert_chunk(&mut self, pos: Position) {
        let prev = self.chunks.insert(pos, Chunk::new(pos));
        assert!(prev.is_none(), "duplicate chunk at {pos:?}");
        let job_id = self.alloc_job_id();
        self.runtime.submit_generate(GenJob { pos, job_id });
    }

    fn alloc_job_id(&mut self) -> u64 {
        let id = self.next_job_id;
        self.next_job_id += 1;
        id
    }

    /// Advances every chunk's state machine. Called once per simulation
    /// tick, never concurrently with itself, and never blocking: it only
    /// drains results the workers already finished.
    pub fn update_chunk_state(&mut self) {
        let mut mesh_jobs: Vec<(Position, Arc<SparseVolume>)> = Vec::new();

        for out in self.runtime.drain_generate_results() {
            let Some(chunk) = self.chunks.get_mut(&out.pos) else {
                log::warn!("generation result for unknown chunk {:?}; dropped", out.pos);
                continue;
            };
            match out.result {
                Ok(generated) => {
                    log::debug!(
                        "chunk {:?}: volume generated in {} ms ({} surface voxels)",
                        out.pos,
                        out.t_gen_ms,
                        generated.surface_voxels
                    );
                    if let Some(volume) = chunk.complete_generation(generated.volume) {
                        mesh_jobs.push((out.pos, volume));
                    }
                }
                Err(e) => chunk.fail(e.to_string()),
            }
        }

        // Mesh jobs are only submitted after the generation result was
        // observed here, so per chunk the phases stay strictly ordered.
        for (pos, volume) in mesh_jobs {
            let job_id = self.alloc_job_id();
            self.runtime.submit_mesh(MeshJob {
                pos,
                volume,
                job_id,
            });
        }

        for out in self.runtime.drain_mesh_results() {
            let Some(chunk) = self.chunks.get_mut(&out.pos) else {
                log::warn!("mesh result for unknown chunk {:?}; dropped", out.pos);
                continue;
            };
            match out.result {
                Ok(ready) => {
                    log::debug!(
                        "chunk {:?}: {} vertices / {} indices uploaded as {:?} (mesh {} ms, upload {} ms)",
                        out.pos,
                        ready.vertices,
                        ready.indices,
                        ready.handle,
                        out.t_mesh_ms,
                        out.t_upload_ms
                    );
                    chunk.complete_mesh(ready.handle);
                }
                Err(e) => chunk.fail(e.to_string()),
            }
        }

        for chunk in self.chunks.values() {
            match chunk.state() {
                ChunkState::Invalid => {
                    panic!("chunk {:?} polled in Invalid state", chunk.location)
                }
                ChunkState::Ready if chunk.drawable().is_none() => {
                    log::warn!("ready chunk {:?} has no drawable", chunk.location);
                }
                _ => {}
            }
        }

        self.tick += 1;
    }

    pub fn chunk(&self, pos: Position) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drawables of every ready chunk, for the renderer's draw set.
    pub fn drawables(&self) -> impl Iterator<Item = (Position, DrawableHandle)> + '_ {
        self.chunks
            .values()
            .filter_map(|c| c.drawable().map(|d| (c.location, d)))
    }

    pub fn all_settled(&self) -> bool {
        self.chunks.values().all(Chunk::is_settled)
    }

    /// (queued gen, in-flight gen, queued mesh, in-flight mesh)
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        self.runtime.queue_debug_counts()
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for chunk in self.chunks.values() {
            match chunk.state() {
                ChunkState::Generating => counts.generating += 1,
                ChunkState::Meshing => counts.meshing += 1,
                ChunkState::Ready => counts.ready += 1,
                ChunkState::Failed => counts.failed += 1,
                ChunkState::Invalid => {
                    panic!("chunk {:?} registered in Invalid state", chunk.location)
                }
            }
        }
        counts
    }
}
