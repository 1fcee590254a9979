//! Errors raised while combining meshes or preparing a bake

/// Error type for the combine pass and bake timing.
///
/// Every variant is fatal to a single bake: nothing is produced and the
/// caller decides how to report it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshBakeError {
    #[error("No usable source meshes (no sources, or every source has zero vertices)")]
    EmptyInput,

    #[error("Malformed triangle list in source {source_index} ('{source_name}') submesh {submesh}: {reason}")]
    MalformedTriangleList {
        source_index: usize,
        source_name: String,
        submesh: usize,
        reason: String,
    },

    #[error("Source {source_index} ('{source_name}') produced non-finite positions in the target frame")]
    NonFiniteGeometry {
        source_index: usize,
        source_name: String,
    },

    #[error("Combined vertex count {0} exceeds the u32 index range")]
    TooManyVertices(usize),

    #[error("Frame rate must be greater than zero (got {0})")]
    InvalidFrameRate(f32),
}
