// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-viewer camera animation state.

use crate::keyframe::CameraKeyframe;
use crate::rig::{CameraPose, ZoomTarget};
use crate::settings::TimelineSettings;
use crate::store::KeyframeStore;

/// Keyframes, shared zoom state and settings of one viewer
#[derive(Debug, Default)]
pub struct CameraAnimationSession {
    /// Recorded keyframes and the current selection
    pub keyframes: KeyframeStore,
    /// Zoom distance shared with the smooth-zoom easing
    pub zoom: ZoomTarget,
    /// Configuration
    pub settings: TimelineSettings,
}

impl CameraAnimationSession {
    /// Create an empty session
    pub fn new(settings: TimelineSettings) -> Self {
        Self {
            keyframes: KeyframeStore::new(),
            zoom: ZoomTarget::default(),
            settings,
        }
    }

    /// Build a keyframe from the live pose with the configured default duration
    pub fn capture(&self, pose: &CameraPose, model_anim_time: f32) -> CameraKeyframe {
        CameraKeyframe::capture(pose, model_anim_time, self.settings.default_duration_ms)
    }
}
