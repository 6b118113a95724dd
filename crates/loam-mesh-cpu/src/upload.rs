use thiserror::Error;

use crate::chunk::ChunkMeshCpu;

/// Opaque reference issued by the renderer once geometry is uploaded.
/// Registering the drawable for the frame's draw set is the renderer's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u64);

#[derive(Debug, Clone, Error)]
pub enum UploadError {
    /// The renderer could not allocate buffer or descriptor resources.
    #[error("renderer resources exhausted: {0}")]
    Exhausted(String),
    #[error("upload rejected: {0}")]
    Rejected(String),
}

/// The one capability the terrain core consumes from the renderer. Must be
/// callable from worker threads.
pub trait DrawableUploader: Send + Sync {
    fn create_drawable(&self, mesh: &ChunkMeshCpu) -> Result<DrawableHandle, UploadError>;
}
