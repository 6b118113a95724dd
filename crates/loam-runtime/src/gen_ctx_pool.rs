use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_channel::{Receiver, Sender, bounded};
use loam_world::{GenCtx, World};

/// Lock-free pool of `GenCtx` instances. Building a context seeds a full
/// set of noise generators, so workers recycle them across jobs instead of
/// rebuilding per chunk.
pub struct GenCtxPool {
    free_tx: Sender<GenCtx>,
    free_rx: Receiver<GenCtx>,
    allocated: AtomicUsize,
    capacity: usize,
}

impl GenCtxPool {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let (free_tx, free_rx) = bounded(capacity);
        Self {
            free_tx,
            free_rx,
            allocated: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Two contexts per worker: one in use, one in flight back to the pool.
    pub fn with_capacity_from_workers(worker_count: usize) -> Arc<Self> {
        Arc::new(Self::new(worker_count.max(1) * 2))
    }

    /// Takes a free context, builds a fresh one while under capacity, and
    /// otherwise waits for a release.
    pub fn acquire<'pool>(&'pool self, world: &World) -> PooledGenCtx<'pool> {
        let ctx = self.free_rx.try_recv().ok().or_else(|| self.grow(world));
        let ctx = match ctx {
            Some(ctx) => ctx,
            // At capacity with nothing free: a sibling worker holds every
            // context, so block until one is returned.
            None => self
                .free_rx
                .recv()
                .unwrap_or_else(|_| world.make_gen_ctx()),
        };
        PooledGenCtx {
            ctx: Some(ctx),
            pool: self,
        }
    }

    fn grow(&self, world: &World) -> Option<GenCtx> {
        loop {
            let current = self.allocated.load(Ordering::Acquire);
            if current >= self.capacity {
                return None;
            }
            if self
                .allocated
                .compare_exchange(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(world.make_gen_ctx());
            }
        }
    }

    fn release(&self, ctx: GenCtx) {
        let _ = self.free_tx.send(ctx);
    }
}

/// Guard that hands its context back to the pool on drop.
pub struct PooledGenCtx<'pool> {
    ctx: Option<GenCtx>,
    pool: &'pool GenCtxPool,
}

impl<'pool> Deref for PooledGenCtx<'pool> {
    type Target = GenCtx;

    fn deref(&self) -> &Self::Target {
        self.ctx.as_ref().expect("context taken before drop")
    }
}

impl<'pool> DerefMut for PooledGenCtx<'pool> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.ctx.as_mut().expect("context taken before drop")
    }
}

impl<'pool> Drop for PooledGenCtx<'pool> {
    fn drop(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            self.pool.release(ctx);
        }
    }
}
