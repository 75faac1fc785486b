// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera keyframe definitions.

use crate::rig::CameraPose;
use uuid::Uuid;

/// Default transition duration into a keyframe, in milliseconds
pub const DEFAULT_ANIMATION_SPEED_MS: u32 = 1200;

/// 3D point or direction (x, y, z)
pub type Vec3 = [f32; 3];

/// Rotation quaternion (x, y, z, w)
pub type Quat = [f32; 4];

/// Identity rotation
pub const QUAT_IDENTITY: Quat = [0.0, 0.0, 0.0, 1.0];

/// Unique identifier for a keyframe row.
///
/// Only used to keep UI rows stable while the list is reordered. Keyframes
/// are addressed by their position in the store, never by this ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyframeId(pub Uuid);

impl KeyframeId {
    /// Create a new random keyframe ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for KeyframeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One recorded camera pose
#[derive(Debug, Clone)]
pub struct CameraKeyframe {
    /// Row identity
    pub id: KeyframeId,
    /// Camera world position at capture time
    pub position: Vec3,
    /// Orbit pivot at capture time
    pub target: Vec3,
    /// Camera-to-target distance at capture time
    pub zoom: f32,
    /// Camera rotation at capture time
    pub orientation: Quat,
    /// Vertical field of view (degrees)
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Duration of the segment ending at this keyframe (ignored for the first one)
    duration_ms: u32,
    /// Model animation clock when the keyframe was captured (seconds)
    pub model_anim_time: f32,
}

impl CameraKeyframe {
    /// Snapshot a live camera pose
    pub fn capture(pose: &CameraPose, model_anim_time: f32, duration_ms: u32) -> Self {
        Self {
            id: KeyframeId::new(),
            position: pose.position,
            target: pose.target,
            zoom: pose.zoom(),
            orientation: pose.orientation,
            fov: pose.fov,
            near: pose.near,
            far: pose.far,
            duration_ms: duration_ms.max(1),
            model_anim_time: model_anim_time.max(0.0),
        }
    }

    /// Create a keyframe looking at `target` from `position`, with default projection
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self::capture(
            &CameraPose {
                position,
                target,
                ..CameraPose::default()
            },
            0.0,
            DEFAULT_ANIMATION_SPEED_MS,
        )
    }

    /// Set the incoming transition duration
    pub fn with_duration_ms(mut self, duration_ms: u32) -> Self {
        self.set_duration_ms(duration_ms);
        self
    }

    /// Set projection parameters
    pub fn with_projection(mut self, fov: f32, near: f32, far: f32) -> Self {
        self.fov = fov;
        self.near = near;
        self.far = far;
        self
    }

    /// Set the paired model animation time
    pub fn with_model_anim_time(mut self, time: f32) -> Self {
        self.model_anim_time = time.max(0.0);
        self
    }

    /// Incoming transition duration in milliseconds (always > 0)
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Set the incoming transition duration; zero is raised to one millisecond
    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms.max(1);
    }

    /// The pose this keyframe restores when jumped to directly
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
            orientation: self.orientation,
            fov: self.fov,
            near: self.near,
            far: self.far,
        }
    }

    /// Compare every recorded field within `epsilon`, ignoring the row ID
    pub fn approx_eq(&self, other: &CameraKeyframe, epsilon: f32) -> bool {
        let close = |a: f32, b: f32| (a - b).abs() <= epsilon;
        self.position.iter().zip(other.position.iter()).all(|(a, b)| close(*a, *b))
            && self.target.iter().zip(other.target.iter()).all(|(a, b)| close(*a, *b))
            && self.orientation.iter().zip(other.orientation.iter()).all(|(a, b)| close(*a, *b))
            && close(self.zoom, other.zoom)
            && close(self.fov, other.fov)
            && close(self.near, other.near)
            && close(self.far, other.far)
            && close(self.model_anim_time, other.model_anim_time)
            && self.duration_ms == other.duration_ms
    }
}
