//! Bake pipeline: time -> pose -> sample -> combine -> persist

use std::path::PathBuf;

use bake_common::{Bounds, FrameTime, SourceMesh, TargetFrame, combine};

use crate::error::BakeError;
use crate::persist::AssetPersister;
use crate::sampler::{MeshSampler, PoseStrategy};

/// Which coordinate frame the baked mesh is expressed in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetSelection {
    /// World space
    World,
    /// Local space of the first renderer with geometry
    #[default]
    FirstRenderer,
    /// Local space of a named node
    Node(String),
}

/// Everything a single bake needs from the user
#[derive(Debug, Clone, PartialEq)]
pub struct BakeRequest {
    /// Asset name (file stem of the persisted asset)
    pub asset_name: String,
    pub frame: u32,
    pub frames_per_second: f32,
    pub target: TargetSelection,
}

impl BakeRequest {
    pub fn new(asset_name: impl Into<String>, frame: u32, frames_per_second: f32) -> Self {
        Self {
            asset_name: asset_name.into(),
            frame,
            frames_per_second,
            target: TargetSelection::default(),
        }
    }

    pub fn with_target(mut self, target: TargetSelection) -> Self {
        self.target = target;
        self
    }
}

/// Outcome of a successful bake
#[derive(Debug, Clone, PartialEq)]
pub struct BakeReport {
    pub path: PathBuf,
    pub frame: u32,
    pub seconds: f32,
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub normals_recalculated: bool,
    pub bounds: Bounds,
}

/// Default asset name for a renderer baked at `frame`
pub fn default_asset_name(renderer: &str, frame: u32) -> String {
    format!("{}_Baked_F{}", renderer, frame)
}

/// Run one bake
///
/// The request is validated and the frame rate checked before any
/// collaborator is touched. The persister is only called once the combine
/// pass has succeeded, so a failed bake never writes an asset.
pub fn bake(
    request: &BakeRequest,
    pose: &mut PoseStrategy<'_>,
    sampler: &dyn MeshSampler,
    persister: &dyn AssetPersister,
) -> Result<BakeReport, BakeError> {
    validate_asset_name(&request.asset_name)?;
    let time = FrameTime::new(request.frame, request.frames_per_second)?;

    tracing::debug!(
        "Baking '{}' at frame {} ({:.4}s) using {}",
        request.asset_name,
        time.frame(),
        time.seconds(),
        pose.describe()
    );

    pose.apply(time.seconds())?;
    let sources = sampler.sample()?;
    let target = resolve_target(&request.target, &sources, sampler)?;

    let mesh = combine(&sources, &target)?;
    // Sampled snapshots are not needed past this point
    drop(sources);

    let path = persister.persist(&request.asset_name, &mesh)?;

    tracing::info!(
        "Baked frame {} (time {:.4}s) saved to {:?}: {} vertices, {} triangles{}",
        time.frame(),
        time.seconds(),
        path,
        mesh.vertex_count(),
        mesh.triangle_count(),
        if mesh.normals_recalculated {
            ", normals recalculated"
        } else {
            ""
        }
    );

    Ok(BakeReport {
        path,
        frame: time.frame(),
        seconds: time.seconds(),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        normals_recalculated: mesh.normals_recalculated,
        bounds: mesh.bounds,
    })
}

/// Asset names are file stems: non-empty, no path separators
pub fn validate_asset_name(name: &str) -> Result<(), BakeError> {
    let invalid = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == "..";
    if invalid {
        return Err(BakeError::InvalidAssetName(name.to_string()));
    }
    Ok(())
}

fn resolve_target(
    selection: &TargetSelection,
    sources: &[SourceMesh],
    sampler: &dyn MeshSampler,
) -> Result<TargetFrame, BakeError> {
    match selection {
        TargetSelection::World => Ok(TargetFrame::world()),
        TargetSelection::FirstRenderer => {
            let Some(first) = sources.iter().find(|s| !s.vertices.is_empty()) else {
                // Nothing to bake; combine reports the empty input
                return Ok(TargetFrame::world());
            };
            TargetFrame::from_local_to_world(first.local_to_world)
                .ok_or_else(|| BakeError::SingularTarget(first.name.clone()))
        }
        TargetSelection::Node(name) => {
            let transform = sampler
                .node_transform(name)
                .ok_or_else(|| BakeError::TargetNotFound(name.clone()))?;
            TargetFrame::from_local_to_world(transform)
                .ok_or_else(|| BakeError::SingularTarget(name.clone()))
        }
    }
}
