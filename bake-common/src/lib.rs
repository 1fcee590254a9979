//! Shared types and utilities for mesh baking
//!
//! This crate provides the engine-independent half of the baking pipeline,
//! shared between:
//! - `mesh-baker` (CLI and bake pipeline)
//! - downstream loaders of `.bakedmesh` assets
//!
//! # Modules
//!
//! - [`types`] - Source/combined mesh data model and bounds
//! - [`combine`] - Merging posed snapshots into one mesh in a target frame
//! - [`normals`] - Normal matrix and area-weighted normal recalculation
//! - [`timing`] - Frame number to sample time conversion
//! - [`formats`] - `.bakedmesh` binary asset format

pub mod combine;
pub mod error;
pub mod formats;
pub mod normals;
pub mod timing;
pub mod types;

pub use combine::combine;
pub use error::MeshBakeError;
pub use normals::{normal_matrix, recalculate_normals};
pub use timing::FrameTime;
pub use types::{Bounds, CombinedMesh, SourceMesh, TargetFrame};

// Re-export commonly used format items
pub use formats::{
    BAKED_MESH_EXT, BakedMeshHeader, DecodedBakedMesh, FLAG_NORMALS_RECALCULATED,
    FormatError, decode_baked_mesh, encode_baked_mesh,
};
