use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use clap::Parser;

use loam::WorldState;
use loam_mesh_cpu::{ChunkMeshCpu, DrawableHandle, DrawableUploader, UploadError};
use loam_world::{World, WorldGenConfig, WorldGenMode};

/// Headless driver: builds a chunk grid, ticks the pipeline until every
/// chunk settles, and reports what would have been handed to the renderer.
#[derive(Parser, Debug)]
#[command(name = "loam")]
struct Args {
    #[arg(long, default_value_t = 1337)]
    seed: i32,

    /// Chunk grid radius; radius 1 builds a 3x3 grid.
    #[arg(long, default_value_t = 1)]
    radius: i32,

    /// Constant-height world at the given y instead of noise terrain.
    #[arg(long)]
    flat: Option<i32>,

    /// TOML worldgen parameter file.
    #[arg(long)]
    worldgen: Option<PathBuf>,

    #[arg(long, default_value_t = 600)]
    max_ticks: u64,

    /// Simulation tick interval in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
}

/// Stand-in for the renderer collaborator: hands out handles and tallies
/// uploaded buffer sizes.
#[derive(Default)]
struct HeadlessRenderer {
    next_handle: AtomicU64,
    vertices: AtomicU64,
    indices: AtomicU64,
}

impl DrawableUploader for HeadlessRenderer {
    fn create_drawable(&self, mesh: &ChunkMeshCpu) -> Result<DrawableHandle, UploadError> {
        let id = 1 + self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.vertices
            .fetch_add(mesh.build.vertex_count() as u64, Ordering::Relaxed);
        self.indices
            .fetch_add(mesh.build.index_count() as u64, Ordering::Relaxed);
        Ok(DrawableHandle(id))
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.worldgen {
        Some(path) => match WorldGenConfig::from_path(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                log::error!("failed to load worldgen config {path:?}: {e}");
                std::process::exit(2);
            }
        },
        None => WorldGenConfig::default(),
    };

    let world = match args.flat {
        Some(height) => World::new(
            args.seed,
            WorldGenMode::Flat { height },
            config.height.clone(),
        ),
        None => World::from_config(args.seed, &config),
    };

    let renderer = Arc::new(HeadlessRenderer::default());
    let mut state = WorldState::new(Arc::new(world), renderer.clone(), args.radius);
    log::info!(
        "seed {} radius {} -> {} chunks queued",
        args.seed,
        args.radius,
        state.chunk_count()
    );

    let tick = Duration::from_millis(args.tick_ms);
    while state.tick < args.max_ticks {
        state.update_chunk_state();
        if state.all_settled() {
            break;
        }
        if state.tick % 60 == 0 {
            let (qg, ig, qm, im) = state.queue_debug_counts();
            log::debug!(
                "tick {}: gen {qg} queued / {ig} running, mesh {qm} queued / {im} running",
                state.tick
            );
        }
        std::thread::sleep(tick);
    }

    let counts = state.state_counts();
    log::info!(
        "tick {}: {} ready, {} failed, {} generating, {} meshing",
        state.tick,
        counts.ready,
        counts.failed,
        counts.generating,
        counts.meshing
    );
    log::info!(
        "{} drawables; {} vertices / {} indices uploaded",
        state.drawables().count(),
        renderer.vertices.load(Ordering::Relaxed),
        renderer.indices.load(Ordering::Relaxed)
    );

    if counts.failed > 0 || !state.all_settled() {
        std::process::exit(1);
    }
}
