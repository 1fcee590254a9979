//! Error types for the bake pipeline

use std::path::PathBuf;

use bake_common::MeshBakeError;
use bake_common::formats::FormatError;

/// Failure reported by a pose driver or mesh sampler
#[derive(Debug, thiserror::Error)]
pub enum SampleError {
    #[error("Failed to load scene {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("Renderer '{0}' not found")]
    RendererNotFound(String),

    #[error("Scene has no renderers")]
    NoRenderers,

    #[error("Renderer '{renderer}' is missing positions")]
    MissingPositions { renderer: String },

    #[error("Renderer '{renderer}' index {index} is out of range for a primitive with {count} vertices")]
    IndexOutOfRange {
        renderer: String,
        index: u32,
        count: usize,
    },

    #[error("Renderer '{renderer}' has more vertices than a u32 index can address")]
    TooManyVertices { renderer: String },

    #[error("Pose evaluation failed: {0}")]
    Pose(String),
}

/// Failure writing a baked asset
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode asset: {0}")]
    Encode(#[from] FormatError),

    #[error("No free asset path for '{0}'")]
    NoUniquePath(String),
}

/// Error type for a single bake
///
/// Every variant aborts the bake before anything is persisted.
#[derive(Debug, thiserror::Error)]
pub enum BakeError {
    #[error(transparent)]
    Mesh(#[from] MeshBakeError),

    #[error(transparent)]
    Sample(#[from] SampleError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Animation clip '{0}' not found on the clip player")]
    ClipNotFound(String),

    #[error("Target node '{0}' not found")]
    TargetNotFound(String),

    #[error("Target '{0}' has a transform that cannot be inverted (zero scale?)")]
    SingularTarget(String),

    #[error("Invalid asset name '{0}' (must be non-empty and contain no path separators)")]
    InvalidAssetName(String),
}
