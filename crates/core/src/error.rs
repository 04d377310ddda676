use thiserror::Error;

/// Errors surfaced to callers of the voxen core.
///
/// `OutOfBounds` and `UnpopulatedRead` from the design spec are deliberately
/// *not* variants here: both have a specified silent, non-fatal behavior
/// (return AIR / not-solid) and are handled in place rather than surfaced.
#[derive(Debug, Error)]
pub enum VoxenError {
    /// Config values are internally inconsistent (e.g. terrain base + amplitude
    /// exceeds chunk height). Detected at startup; the process must not start.
    #[error("invalid world config: {0}")]
    ConfigInvalid(String),

    /// The renderer collaborator failed to upload a chunk's mesh to the GPU.
    /// The chunk remains dirty and is retried on a later tick.
    #[error("mesh upload failed for chunk ({0}, {1})")]
    MeshUploadFailure(i32, i32),
}
