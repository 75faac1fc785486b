// SPDX-License-Identifier: MIT OR Apache-2.0
//! Binding between the timeline and the host's live camera.
//!
//! The host owns a perspective camera plus orbit controls. The timeline only
//! needs to read the current pose and write a new one; everything else
//! (projection matrices, control damping) stays on the host side.

use crate::interpolation::{length, sub};
use crate::keyframe::{Quat, Vec3, QUAT_IDENTITY};

/// Live state of camera and orbit controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera world position
    pub position: Vec3,
    /// Orbit controls target
    pub target: Vec3,
    /// Camera rotation
    pub orientation: Quat,
    /// Vertical field of view (degrees)
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraPose {
    /// Distance from the camera to the orbit target
    pub fn zoom(&self) -> f32 {
        length(sub(self.position, self.target))
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            orientation: QUAT_IDENTITY,
            fov: 75.0,
            near: 0.01,
            far: 20000.0,
        }
    }
}

/// Host camera + orbit controls, as seen by the timeline
pub trait CameraRig {
    /// Read the live pose
    fn pose(&self) -> CameraPose;

    /// Write a pose.
    ///
    /// Implementations must recompute the projection and run the orbit
    /// controls' update after the write.
    fn apply_pose(&mut self, pose: &CameraPose);
}

/// Camera rig without a renderer, for tools and tests
#[derive(Debug, Clone, Default)]
pub struct HeadlessRig {
    pose: CameraPose,
    /// Number of `apply_pose` calls
    pub writes: u64,
}

impl HeadlessRig {
    /// Create a rig at the given pose
    pub fn new(pose: CameraPose) -> Self {
        Self {
            pose,
            writes: 0,
        }
    }
}

impl CameraRig for HeadlessRig {
    fn pose(&self) -> CameraPose {
        self.pose
    }

    fn apply_pose(&mut self, pose: &CameraPose) {
        self.pose = *pose;
        self.writes += 1;
    }
}

/// Snap threshold for the smooth zoom easing
const ZOOM_SNAP_EPSILON: f32 = 0.0001;

/// Shared zoom state consumed by the host's smooth-zoom easing.
///
/// The timeline writes both values while it drives the camera so the easing
/// does not pull the camera back toward a stale distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ZoomTarget {
    /// Distance the easing converges to
    pub target: f32,
    /// Distance currently applied
    pub current: f32,
}

impl ZoomTarget {
    /// Start both values at `distance`
    pub fn new(distance: f32) -> Self {
        Self {
            target: distance,
            current: distance,
        }
    }

    /// Force both values to `distance`
    pub fn sync(&mut self, distance: f32) {
        self.target = distance;
        self.current = distance;
    }

    /// Move the target by `delta`, clamped to the orbit distance limits
    pub fn nudge(&mut self, delta: f32, min: f32, max: f32) {
        self.target = (self.target + delta).clamp(min, max);
    }

    /// Ease `current` toward `target`; returns the new current distance
    pub fn step(&mut self, smoothing: f32) -> f32 {
        self.current += (self.target - self.current) * smoothing;
        if (self.current - self.target).abs() < ZOOM_SNAP_EPSILON {
            self.current = self.target;
        }
        self.current
    }

    /// Whether the easing has converged
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }
}
