//! mesh-baker library
//!
//! Bakes posed renderers into a single static mesh asset. The combine pass
//! lives in `bake-common`; this crate owns the collaborators around it:
//! pose drivers, mesh samplers, asset persisters and the bake pipeline that
//! wires them together.

pub mod bake;
pub mod error;
pub mod manifest;
pub mod obj;
pub mod persist;
pub mod sampler;
pub mod scene;

// Re-export the core data model from bake-common
pub use bake_common::{
    Bounds, CombinedMesh, FrameTime, MeshBakeError, SourceMesh, TargetFrame, combine,
};

pub use bake::{BakeReport, BakeRequest, TargetSelection, bake, default_asset_name};
pub use error::{BakeError, PersistError, SampleError};
pub use persist::{AssetFormat, AssetPersister, FileAssetPersister};
pub use sampler::{AnimatorDriver, ClipPlayer, MeshSampler, PoseStrategy};
pub use scene::GltfScene;
