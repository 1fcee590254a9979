//! Frame-based sample time

use crate::MeshBakeError;

/// Default sample rate for frame input (frames per second)
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// A frame number paired with the frame rate it is measured in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    frame: u32,
    frames_per_second: f32,
}

impl FrameTime {
    /// Fails with [`MeshBakeError::InvalidFrameRate`] unless the rate is a
    /// finite value above zero.
    pub fn new(frame: u32, frames_per_second: f32) -> Result<Self, MeshBakeError> {
        if !frames_per_second.is_finite() || frames_per_second <= 0.0 {
            return Err(MeshBakeError::InvalidFrameRate(frames_per_second));
        }
        Ok(Self {
            frame,
            frames_per_second,
        })
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn frames_per_second(&self) -> f32 {
        self.frames_per_second
    }

    /// Sample time in seconds (`frame / fps`)
    pub fn seconds(&self) -> f32 {
        self.frame as f32 / self.frames_per_second
    }
}
