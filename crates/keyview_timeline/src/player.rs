// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera timeline playback.
//!
//! Walks the keyframe list one segment at a time. Each frame tick evaluates
//! the current segment and writes the pose into the camera rig; when the
//! segment's `t` reaches 1 the next one starts at that same tick time.
//! There is no pause or resume, only play-from-start and hard stop.

use crate::clock::FrameTick;
use crate::interpolation::Interpolation;
use crate::keyframe::CameraKeyframe;
use crate::rig::{CameraRig, ZoomTarget};
use std::time::Duration;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Not driving the camera
    #[default]
    Idle,
    /// Animating through the segments
    Playing,
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Player is idle; nothing was written
    Idle,
    /// Pose written for `segment` at progress `t`
    Animating {
        /// Segment index (ends at keyframe `segment + 1`)
        segment: usize,
        /// Normalized progress within the segment
        t: f32,
    },
    /// Previous segment completed and `segment` starts next tick
    Advanced {
        /// Index of the segment that starts next
        segment: usize,
    },
    /// Last segment completed; player is idle again
    Finished,
}

/// Camera timeline player
#[derive(Debug, Clone, Default)]
pub struct CameraTimelinePlayer {
    state: PlaybackState,
    segment_index: usize,
    /// Start time of the current segment, latched on its first tick
    segment_start: Option<Duration>,
    progress: f32,
}

impl CameraTimelinePlayer {
    /// Create an idle player
    pub fn new() -> Self {
        Self::default()
    }

    /// Start playing from the first segment.
    ///
    /// Returns false without side effects when already playing or when
    /// there are fewer than two keyframes.
    pub fn play(&mut self, keyframes: &[CameraKeyframe]) -> bool {
        if self.state == PlaybackState::Playing || keyframes.len() < 2 {
            return false;
        }

        self.state = PlaybackState::Playing;
        self.segment_index = 0;
        self.segment_start = None;
        self.progress = 0.0;
        tracing::info!(keyframes = keyframes.len(), "Camera timeline started");
        true
    }

    /// Cancel playback, leaving the camera wherever it is
    pub fn stop(&mut self) {
        if self.state == PlaybackState::Playing {
            tracing::info!(segment = self.segment_index, "Camera timeline stopped");
        }
        self.state = PlaybackState::Idle;
        self.segment_start = None;
    }

    /// Advance by one frame
    pub fn tick<R: CameraRig + ?Sized>(
        &mut self,
        tick: &FrameTick,
        keyframes: &[CameraKeyframe],
        rig: &mut R,
        zoom: &mut ZoomTarget,
    ) -> TickOutcome {
        if self.state != PlaybackState::Playing {
            return TickOutcome::Idle;
        }

        let segment = self.segment_index;
        let (Some(start), Some(end)) = (keyframes.get(segment), keyframes.get(segment + 1)) else {
            // The list shrank underneath us
            self.finish();
            return TickOutcome::Finished;
        };

        let started_at = *self.segment_start.get_or_insert(tick.now);
        let elapsed_ms = tick.now.saturating_sub(started_at).as_secs_f64() * 1000.0;
        let t = (elapsed_ms / f64::from(end.duration_ms())).min(1.0) as f32;
        self.progress = t;

        let frame = Interpolation::interpolate_pose(start, end, t);
        rig.apply_pose(&frame.pose);
        zoom.sync(frame.zoom);

        if t < 1.0 {
            return TickOutcome::Animating { segment, t };
        }

        self.segment_index += 1;
        self.segment_start = Some(tick.now);
        if self.segment_index + 1 >= keyframes.len() {
            self.finish();
            return TickOutcome::Finished;
        }

        tracing::debug!(segment = self.segment_index, "Camera timeline advanced");
        TickOutcome::Advanced {
            segment: self.segment_index,
        }
    }

    fn finish(&mut self) {
        self.state = PlaybackState::Idle;
        self.segment_start = None;
        tracing::info!("Camera timeline finished");
    }

    /// Current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether a timeline is running
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Index of the segment being animated (or last animated)
    pub fn segment_index(&self) -> usize {
        self.segment_index
    }

    /// Last computed progress within the current segment
    pub fn segment_progress(&self) -> f32 {
        self.progress
    }
}
