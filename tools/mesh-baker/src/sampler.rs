//! Collaborator traits for posing renderers and sampling their meshes
//!
//! The deformation evaluator and animation playback belong to the host. A
//! bake only needs two capabilities from it: put the rig into the pose it has
//! at a given time, then hand back one local-space snapshot per renderer.

use glam::Mat4;

use crate::error::{BakeError, SampleError};
use bake_common::SourceMesh;

/// State-machine style animator (drives the current state by normalized time)
pub trait AnimatorDriver {
    /// Length of the current state in seconds (`<= 0` when unknown)
    fn current_state_length(&self) -> f32;

    /// Play the current state at `normalized_time` and evaluate the pose immediately
    fn play_normalized(&mut self, normalized_time: f32) -> Result<(), SampleError>;
}

/// Clip-based player that can evaluate a named clip at an absolute time
pub trait ClipPlayer {
    fn has_clip(&self, clip: &str) -> bool;

    /// Evaluate `clip` at `time` seconds and apply the pose
    fn sample_clip(&mut self, clip: &str, time: f32) -> Result<(), SampleError>;
}

/// Produces posed, local-space snapshots of every renderer in a bake
pub trait MeshSampler {
    /// One snapshot per renderer, in renderer order
    fn sample(&self) -> Result<Vec<SourceMesh>, SampleError>;

    /// Local-to-world transform of a named node, for target frame selection
    fn node_transform(&self, name: &str) -> Option<Mat4>;
}

/// How the rig is posed before sampling
///
/// Selected explicitly by the caller; there is no fallback between variants.
pub enum PoseStrategy<'a> {
    /// Drive an animator's current state to the sample time
    Animator(&'a mut dyn AnimatorDriver),
    /// Evaluate a named clip at the sample time
    Clip {
        player: &'a mut dyn ClipPlayer,
        clip: String,
    },
    /// Bake whatever pose the renderers are in now
    CurrentPose,
}

impl PoseStrategy<'_> {
    pub fn describe(&self) -> String {
        match self {
            PoseStrategy::Animator(_) => "animator".to_string(),
            PoseStrategy::Clip { clip, .. } => format!("clip '{}'", clip),
            PoseStrategy::CurrentPose => "current pose".to_string(),
        }
    }

    /// Pose the rig at `time` seconds
    pub fn apply(&mut self, time: f32) -> Result<(), BakeError> {
        match self {
            PoseStrategy::Animator(animator) => {
                let length = animator.current_state_length();
                let length = if length > 0.0 { length } else { 1.0 };
                let normalized = time / length;
                tracing::debug!(
                    "Animator: time {:.4}s / state length {:.4}s -> normalized {:.4}",
                    time,
                    length,
                    normalized
                );
                animator.play_normalized(normalized)?;
            }
            PoseStrategy::Clip { player, clip } => {
                if !player.has_clip(clip) {
                    return Err(BakeError::ClipNotFound(clip.clone()));
                }
                tracing::debug!("Sampling clip '{}' at {:.4}s", clip, time);
                player.sample_clip(clip, time)?;
            }
            PoseStrategy::CurrentPose => {
                tracing::info!("No pose driver selected, baking current pose");
            }
        }
        Ok(())
    }
}
