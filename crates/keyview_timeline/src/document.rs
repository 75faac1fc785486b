// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera animation export/import format.
//!
//! ```json
//! {
//!   "camera": { "fov": 75, "near": 0.01, "far": 20000,
//!               "position": {"x":0,"y":0,"z":5}, "target": {"x":0,"y":0,"z":0},
//!               "quaternion": {"x":0,"y":0,"z":0,"w":1} },
//!   "keyframes": [ { "index": 1, "position": {..}, "target": {..}, "zoom": 5.0,
//!                    "fov": 75, "near": 0.01, "far": 20000, "quaternion": {..},
//!                    "duration": 1200, "modelAnimTime": 0.0 } ]
//! }
//! ```
//!
//! `index` is informational; array order is authoritative. `duration` and
//! `modelAnimTime` may be absent in older exports.

use crate::keyframe::{CameraKeyframe, KeyframeId, Quat, Vec3, DEFAULT_ANIMATION_SPEED_MS};
use crate::rig::CameraPose;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use thiserror::Error;

/// Document errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Not valid JSON, or a field has the wrong shape
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required top-level section is absent
    #[error("Invalid camera animation JSON: missing `{0}`")]
    MissingField(&'static str),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Point as `{x, y, z}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
}

impl From<Vec3> for PointRecord {
    fn from(v: Vec3) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }
}

impl From<PointRecord> for Vec3 {
    fn from(p: PointRecord) -> Self {
        [p.x, p.y, p.z]
    }
}

/// Quaternion as `{x, y, z, w}`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuaternionRecord {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Z
    pub z: f32,
    /// W
    pub w: f32,
}

impl From<Quat> for QuaternionRecord {
    fn from(q: Quat) -> Self {
        Self { x: q[0], y: q[1], z: q[2], w: q[3] }
    }
}

impl From<QuaternionRecord> for Quat {
    fn from(q: QuaternionRecord) -> Self {
        [q.x, q.y, q.z, q.w]
    }
}

/// Live camera section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRecord {
    /// Field of view
    pub fov: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
    /// Camera position
    pub position: PointRecord,
    /// Orbit target
    pub target: PointRecord,
    /// Camera rotation
    pub quaternion: QuaternionRecord,
}

impl From<&CameraPose> for CameraRecord {
    fn from(pose: &CameraPose) -> Self {
        Self {
            fov: pose.fov,
            near: pose.near,
            far: pose.far,
            position: pose.position.into(),
            target: pose.target.into(),
            quaternion: pose.orientation.into(),
        }
    }
}

impl From<&CameraRecord> for CameraPose {
    fn from(record: &CameraRecord) -> Self {
        Self {
            position: record.position.into(),
            target: record.target.into(),
            orientation: record.quaternion.into(),
            fov: record.fov,
            near: record.near,
            far: record.far,
        }
    }
}

fn default_duration() -> u32 {
    DEFAULT_ANIMATION_SPEED_MS
}

/// Accept integral or fractional millisecond counts
fn deserialize_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let ms = f64::deserialize(deserializer)?;
    if !ms.is_finite() {
        return Ok(DEFAULT_ANIMATION_SPEED_MS);
    }
    Ok(ms.round().clamp(1.0, f64::from(u32::MAX)) as u32)
}

/// One keyframe entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeRecord {
    /// 1-based position at export time (ignored on import)
    #[serde(default)]
    pub index: usize,
    /// Camera position
    pub position: PointRecord,
    /// Orbit target
    pub target: PointRecord,
    /// Orbit distance
    pub zoom: f32,
    /// Field of view
    pub fov: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
    /// Camera rotation
    pub quaternion: QuaternionRecord,
    /// Incoming transition duration (ms)
    #[serde(default = "default_duration", deserialize_with = "deserialize_duration")]
    pub duration: u32,
    /// Paired model animation time (s)
    #[serde(default)]
    pub model_anim_time: f32,
}

impl KeyframeRecord {
    /// Build a record for the keyframe at `position` (0-based)
    pub fn from_keyframe(position: usize, keyframe: &CameraKeyframe) -> Self {
        Self {
            index: position + 1,
            position: keyframe.position.into(),
            target: keyframe.target.into(),
            zoom: keyframe.zoom,
            fov: keyframe.fov,
            near: keyframe.near,
            far: keyframe.far,
            quaternion: keyframe.orientation.into(),
            duration: keyframe.duration_ms(),
            model_anim_time: keyframe.model_anim_time,
        }
    }

    /// Rebuild the keyframe
    pub fn to_keyframe(&self) -> CameraKeyframe {
        let mut keyframe = CameraKeyframe::capture(
            &CameraPose {
                position: self.position.into(),
                target: self.target.into(),
                orientation: self.quaternion.into(),
                fov: self.fov,
                near: self.near,
                far: self.far,
            },
            self.model_anim_time,
            self.duration,
        );
        // Stored zoom wins over the measured distance; it is a radius, never negative
        keyframe.zoom = if self.zoom.is_finite() { self.zoom.max(0.0) } else { 0.0 };
        keyframe.id = KeyframeId::new();
        keyframe
    }
}

/// Shape used to detect missing sections before typed conversion
#[derive(Deserialize)]
struct RawDocument {
    camera: Option<CameraRecord>,
    keyframes: Option<Vec<KeyframeRecord>>,
}

/// Exported camera + keyframe sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraAnimationDocument {
    /// Live camera at export time
    pub camera: CameraRecord,
    /// Keyframes in playback order
    pub keyframes: Vec<KeyframeRecord>,
}

impl CameraAnimationDocument {
    /// Snapshot the live camera and the keyframe list
    pub fn capture(pose: &CameraPose, keyframes: &[CameraKeyframe]) -> Self {
        Self {
            camera: CameraRecord::from(pose),
            keyframes: keyframes
                .iter()
                .enumerate()
                .map(|(i, k)| KeyframeRecord::from_keyframe(i, k))
                .collect(),
        }
    }

    /// Parse a document; both `camera` and `keyframes` are required
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        let camera = raw.camera.ok_or(DocumentError::MissingField("camera"))?;
        let keyframes = raw.keyframes.ok_or(DocumentError::MissingField("keyframes"))?;
        Ok(Self { camera, keyframes })
    }

    /// Serialize as pretty JSON
    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read and parse a document file
    pub fn read_from_path(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Write the document as pretty JSON
    pub fn write_to_path(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Camera pose stored in the document
    pub fn camera_pose(&self) -> CameraPose {
        CameraPose::from(&self.camera)
    }

    /// Keyframes in array order
    pub fn to_keyframes(&self) -> Vec<CameraKeyframe> {
        self.keyframes.iter().map(KeyframeRecord::to_keyframe).collect()
    }
}
