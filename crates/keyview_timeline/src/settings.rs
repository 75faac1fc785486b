// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline settings.
//!
//! Stored as RON. Every field has a default, so partial files and files
//! written by older versions load without errors.

use crate::keyframe::DEFAULT_ANIMATION_SPEED_MS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "keyview.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Malformed RON
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failure
    #[error("Failed to write settings: {0}")]
    Serialize(#[from] ron::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Timeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Transition duration given to newly added keyframes (ms)
    pub default_duration_ms: u32,
    /// Lower bound of the duration slider (ms)
    pub min_duration_ms: u32,
    /// Upper bound of the duration slider (ms)
    pub max_duration_ms: u32,
    /// Smooth zoom easing factor per frame
    pub zoom_smoothing: f32,
    /// Slowest per-clip playback speed
    pub min_clip_speed: f32,
    /// Fastest per-clip playback speed
    pub max_clip_speed: f32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_ANIMATION_SPEED_MS,
            min_duration_ms: 100,
            max_duration_ms: 10_000,
            zoom_smoothing: 0.1,
            min_clip_speed: 0.1,
            max_clip_speed: 3.0,
        }
    }
}

impl TimelineSettings {
    /// Parse settings from RON text
    pub fn from_ron(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = ron::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Serialize settings as pretty RON
    pub fn to_ron(&self) -> Result<String, SettingsError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load settings; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&text)?;
        tracing::info!(path = %path.display(), "Loaded timeline settings");
        Ok(settings)
    }

    /// Fix inverted or zero ranges and non-finite values
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.min_duration_ms = self.min_duration_ms.max(1);
        if self.max_duration_ms < self.min_duration_ms {
            std::mem::swap(&mut self.min_duration_ms, &mut self.max_duration_ms);
        }
        self.default_duration_ms = self.default_duration_ms.max(1);

        self.zoom_smoothing = if self.zoom_smoothing.is_finite() {
            self.zoom_smoothing.clamp(0.0, 1.0)
        } else {
            defaults.zoom_smoothing
        };

        if !self.min_clip_speed.is_finite() || self.min_clip_speed <= 0.0 {
            self.min_clip_speed = defaults.min_clip_speed;
        }
        if !self.max_clip_speed.is_finite() || self.max_clip_speed <= 0.0 {
            self.max_clip_speed = defaults.max_clip_speed;
        }
        if self.max_clip_speed < self.min_clip_speed {
            std::mem::swap(&mut self.min_clip_speed, &mut self.max_clip_speed);
        }
        self
    }

    /// Duration slider range
    pub fn duration_range(&self) -> std::ops::RangeInclusive<u32> {
        self.min_duration_ms..=self.max_duration_ms
    }

    /// Clip speed range
    pub fn clip_speed_range(&self) -> std::ops::RangeInclusive<f32> {
        self.min_clip_speed..=self.max_clip_speed
    }
}
