//! bake.toml manifest parsing and batch baking

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use bake_common::timing::DEFAULT_FRAME_RATE;

use crate::bake::{
    BakeReport, BakeRequest, TargetSelection, bake, default_asset_name, validate_asset_name,
};
use crate::persist::{AssetFormat, FileAssetPersister};
use crate::sampler::PoseStrategy;
use crate::scene::GltfScene;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "bake.toml";

/// bake.toml manifest structure
#[derive(Debug, Deserialize)]
pub struct BakeManifest {
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub bake: Vec<BakeJob>,
}

/// Where and how baked assets are written
#[derive(Debug, Deserialize)]
pub struct OutputSection {
    /// Save directory, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// "bakedmesh" or "obj"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> String {
    "baked".to_string()
}

fn default_format() -> String {
    "bakedmesh".to_string()
}

fn default_fps() -> f32 {
    DEFAULT_FRAME_RATE
}

/// A single bake
#[derive(Debug, Clone, Deserialize)]
pub struct BakeJob {
    /// glTF/GLB scene, relative to the manifest
    pub scene: String,

    /// Asset name. Default: "{first renderer}_Baked_F{frame}"
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub frame: u32,

    #[serde(default = "default_fps")]
    pub fps: f32,

    /// Node whose local space the mesh is baked into.
    /// Default: the first renderer
    #[serde(default)]
    pub target: Option<String>,

    /// Bake in world space
    #[serde(default)]
    pub world: bool,

    /// Renderers to include. Default: all of them
    #[serde(default)]
    pub renderers: Vec<String>,
}

impl BakeJob {
    /// Job for `scene` with every other field at its default
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
            name: None,
            frame: 0,
            fps: DEFAULT_FRAME_RATE,
            target: None,
            world: false,
            renderers: Vec::new(),
        }
    }

    pub fn target_selection(&self) -> TargetSelection {
        match (&self.target, self.world) {
            (Some(node), _) => TargetSelection::Node(node.clone()),
            (None, true) => TargetSelection::World,
            (None, false) => TargetSelection::FirstRenderer,
        }
    }

    /// Check the job without touching the scene file
    pub fn validate(&self) -> Result<()> {
        if self.scene.trim().is_empty() {
            anyhow::bail!("Bake job has an empty scene path");
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            anyhow::bail!("Bake job '{}': fps must be positive, got {}", self.scene, self.fps);
        }
        if self.world && self.target.is_some() {
            anyhow::bail!(
                "Bake job '{}': 'world' and 'target' are mutually exclusive",
                self.scene
            );
        }
        if let Some(name) = &self.name {
            validate_asset_name(name).with_context(|| format!("Bake job '{}'", self.scene))?;
        }
        if let Some(target) = &self.target
            && target.trim().is_empty()
        {
            anyhow::bail!("Bake job '{}': target must not be empty", self.scene);
        }
        Ok(())
    }
}

/// Load and parse manifest
pub fn load_manifest(path: &Path) -> Result<BakeManifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;
    parse_manifest(&content).with_context(|| format!("Failed to parse manifest: {:?}", path))
}

pub fn parse_manifest(content: &str) -> Result<BakeManifest> {
    Ok(toml::from_str(content)?)
}

/// Validate manifest without baking
pub fn validate(manifest: &BakeManifest) -> Result<()> {
    output_format(&manifest.output)?;

    if manifest.bake.is_empty() {
        anyhow::bail!("Manifest declares no [[bake]] jobs");
    }

    for job in &manifest.bake {
        job.validate()?;
    }

    tracing::info!("{} bake jobs", manifest.bake.len());
    Ok(())
}

fn output_format(output: &OutputSection) -> Result<AssetFormat> {
    AssetFormat::parse(&output.format).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown output format '{}' (use bakedmesh or obj)",
            output.format
        )
    })
}

/// Run every job in the manifest
///
/// Scene paths and the output directory are resolved against `base_dir`
/// (normally the manifest's directory). `output_override` replaces the
/// manifest's output directory as given.
pub fn build_all(
    manifest: &BakeManifest,
    base_dir: &Path,
    output_override: Option<&Path>,
) -> Result<Vec<BakeReport>> {
    validate(manifest)?;

    let format = output_format(&manifest.output)?;
    let output_dir: PathBuf = output_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join(&manifest.output.dir));
    let persister = FileAssetPersister::new(output_dir, format);

    let mut reports = Vec::with_capacity(manifest.bake.len());
    for job in &manifest.bake {
        let report = run_job(job, base_dir, &persister)?;
        reports.push(report);
    }

    Ok(reports)
}

/// Load a job's scene and bake it in its current pose
pub fn run_job(job: &BakeJob, base_dir: &Path, persister: &FileAssetPersister) -> Result<BakeReport> {
    job.validate()?;

    let scene_path = base_dir.join(&job.scene);
    tracing::info!("Baking {:?} -> {:?}", scene_path, persister.dir());

    let scene = GltfScene::load(&scene_path)?
        .with_renderers(&job.renderers)
        .with_context(|| format!("Failed to select renderers in {:?}", scene_path))?;

    let name = match &job.name {
        Some(name) => name.clone(),
        None => {
            let first = scene
                .renderer_names()
                .first()
                .map(|n| n.to_string())
                .or_else(|| {
                    scene_path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                })
                .unwrap_or_else(|| "Mesh".to_string());
            default_asset_name(&first, job.frame)
        }
    };

    let request = BakeRequest::new(name, job.frame, job.fps).with_target(job.target_selection());

    // A static scene file carries no pose driver
    let report = bake(&request, &mut PoseStrategy::CurrentPose, &scene, persister)
        .with_context(|| format!("Failed to bake {:?}", scene_path))?;

    Ok(report)
}
