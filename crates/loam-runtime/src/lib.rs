//! Bounded worker lanes for chunk generation and mesh/upload jobs.
//!
//! Work arrives over channels and runs on two fixed rayon pools: one lane
//! generates volumes, the other meshes them and uploads through the
//! renderer seam. The tick thread only ever submits jobs and drains
//! finished results; it never blocks here.
#![forbid(unsafe_code)]

mod gen_ctx_pool;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use loam_geom::{Position, Vec3};
use loam_mesh_cpu::{DrawableHandle, DrawableUploader, UploadError, build_volume_mesh};
use loam_voxel::{SparseVolume, VolumeError};
use loam_world::{CHUNK_STRIDE, GenerateResult, World, generate_volume};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::gen_ctx_pool::GenCtxPool;

#[derive(Clone, Copy, Debug)]
pub struct GenJob {
    pub pos: Position,
    pub job_id: u64,
}

pub struct GenOut {
    pub pos: Position,
    pub job_id: u64,
    pub result: Result<GenerateResult, VolumeError>,
    pub t_gen_ms: u32,
}

#[derive(Clone)]
pub struct MeshJob {
    pub pos: Position,
    pub volume: Arc<SparseVolume>,
    pub job_id: u64,
}

/// Successful mesh/upload outcome: the renderer's handle plus the uploaded
/// buffer sizes.
#[derive(Clone, Copy, Debug)]
pub struct MeshReady {
    pub handle: DrawableHandle,
    pub vertices: usize,
    pub indices: usize,
}

pub struct MeshOut {
    pub pos: Position,
    pub job_id: u64,
    pub result: Result<MeshReady, UploadError>,
    pub t_mesh_ms: u32,
    pub t_upload_ms: u32,
}

#[inline]
fn ms_since(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_gen_job(job: GenJob, world: &World, ctx_pool: &GenCtxPool, tx: &Sender<GenOut>) {
    let t0 = Instant::now();
    let ctx = ctx_pool.acquire(world);
    let result = generate_volume(world, &ctx, job.pos);
    let _ = tx.send(GenOut {
        pos: job.pos,
        job_id: job.job_id,
        result,
        t_gen_ms: ms_since(t0),
    });
}

fn process_mesh_job(job: MeshJob, uploader: &dyn DrawableUploader, tx: &Sender<MeshOut>) {
    let t0 = Instant::now();
    let origin = Vec3::from(job.pos * CHUNK_STRIDE);
    let mesh = build_volume_mesh(&job.volume, job.pos, origin);
    let t_mesh_ms = ms_since(t0);

    let t1 = Instant::now();
    let vertices = mesh.build.vertex_count();
    let indices = mesh.build.index_count();
    let result = uploader.create_drawable(&mesh).map(|handle| MeshReady {
        handle,
        vertices,
        indices,
    });
    let _ = tx.send(MeshOut {
        pos: job.pos,
        job_id: job.job_id,
        result,
        t_mesh_ms,
        t_upload_ms: ms_since(t1),
    });
}

pub struct Runtime {
    gen_tx: Sender<GenJob>,
    mesh_tx: Sender<MeshJob>,
    gen_res_rx: Receiver<GenOut>,
    mesh_res_rx: Receiver<MeshOut>,
    _gen_pool: Arc<ThreadPool>,
    _mesh_pool: Arc<ThreadPool>,
    q_gen: Arc<AtomicUsize>,
    q_mesh: Arc<AtomicUsize>,
    inflight_gen: Arc<AtomicUsize>,
    inflight_mesh: Arc<AtomicUsize>,
    pub w_gen: usize,
    pub w_mesh: usize,
    _ctx_pool: Arc<GenCtxPool>,
}

impl Runtime {
    pub fn new(world: Arc<World>, uploader: Arc<dyn DrawableUploader>) -> Self {
        let (gen_tx, gen_rx) = unbounded::<GenJob>();
        let (mesh_tx, mesh_rx) = unbounded::<MeshJob>();
        let (gen_res_tx, gen_res_rx) = unbounded::<GenOut>();
        let (mesh_res_tx, mesh_res_rx) = unbounded::<MeshOut>();

        let worker_count: usize = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8);
        let w_gen = (worker_count / 2).max(1);
        let w_mesh = worker_count.saturating_sub(w_gen).max(1);
        let ctx_pool = GenCtxPool::with_capacity_from_workers(w_gen);

        let q_gen_ctr = Arc::new(AtomicUsize::new(0));
        let q_mesh_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_gen_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_mesh_ctr = Arc::new(AtomicUsize::new(0));

        let gen_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_gen)
                .thread_name(|i| format!("loam-gen-{i}"))
                .build()
                .expect("gen pool"),
        );
        for _ in 0..w_gen {
            let rx = gen_rx.clone();
            let tx = gen_res_tx.clone();
            let world = world.clone();
            let q_gen = q_gen_ctr.clone();
            let inflight_gen = inflight_gen_ctr.clone();
            let ctx_pool = ctx_pool.clone();
            gen_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q_gen.fetch_sub(1, Ordering::Relaxed);
                    inflight_gen.fetch_add(1, Ordering::Relaxed);
                    process_gen_job(job, world.as_ref(), ctx_pool.as_ref(), &tx);
                    inflight_gen.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        let mesh_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(w_mesh)
                .thread_name(|i| format!("loam-mesh-{i}"))
                .build()
                .expect("mesh pool"),
        );
        for _ in 0..w_mesh {
            let rx = mesh_rx.clone();
            let tx = mesh_res_tx.clone();
            let uploader = uploader.clone();
            let q_mesh = q_mesh_ctr.clone();
            let inflight_mesh = inflight_mesh_ctr.clone();
            mesh_pool.spawn(move || {
                while let Ok(job) = rx.recv() {
                    q_mesh.fetch_sub(1, Ordering::Relaxed);
                    inflight_mesh.fetch_add(1, Ordering::Relaxed);
                    process_mesh_job(job, uploader.as_ref(), &tx);
                    inflight_mesh.fetch_sub(1, Ordering::Relaxed);
                }
            });
        }

        Self {
            gen_tx,
            mesh_tx,
            gen_res_rx,
            mesh_res_rx,
            _gen_pool: gen_pool,
            _mesh_pool: mesh_pool,
            q_gen: q_gen_ctr,
            q_mesh: q_mesh_ctr,
            inflight_gen: inflight_gen_ctr,
            inflight_mesh: inflight_mesh_ctr,
            w_gen,
            w_mesh,
            _ctx_pool: ctx_pool,
        }
    }

    pub fn submit_generate(&self, job: GenJob) {
        self.q_gen.fetch_add(1, Ordering::Relaxed);
        if self.gen_tx.send(job).is_err() {
            self.q_gen.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub fn submit_mesh(&self, job: MeshJob) {
        self.q_mesh.fetch_add(1, Ordering::Relaxed);
        if self.mesh_tx.send(job).is_err() {
            self.q_mesh.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Finished generation results; never blocks.
    pub fn drain_generate_results(&self) -> Vec<GenOut> {
        self.gen_res_rx.try_iter().collect()
    }

    /// Finished mesh/upload results; never blocks.
    pub fn drain_mesh_results(&self) -> Vec<MeshOut> {
        self.mesh_res_rx.try_iter().collect()
    }

    /// (queued gen, in-flight gen, queued mesh, in-flight mesh)
    pub fn queue_debug_counts(&self) -> (usize, usize, usize, usize) {
        (
            self.q_gen.load(Ordering::Relaxed),
            self.inflight_gen.load(Ordering::Relaxed),
            self.q_mesh.load(Ordering::Relaxed),
            self.inflight_mesh.load(Ordering::Relaxed),
        )
    }
}
