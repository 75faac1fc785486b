// SPDX-License-Identifier: MIT OR Apache-2.0
//! Uniform control over the loaded model's animation clips.
//!
//! Every operation is a no-op when no model (or no clip) is loaded.

use crate::clock::FrameTick;
use crate::mixer::{AnimationMixer, ClipInfo, LoopMode};
use crate::settings::TimelineSettings;
use std::ops::RangeInclusive;

/// Model animation timeline adapter
#[derive(Debug, Clone)]
pub struct ModelTimeline<M: AnimationMixer> {
    mixer: Option<M>,
    speed_range: RangeInclusive<f32>,
}

impl<M: AnimationMixer> Default for ModelTimeline<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: AnimationMixer> ModelTimeline<M> {
    /// Create an adapter with no model loaded
    pub fn new() -> Self {
        Self {
            mixer: None,
            speed_range: TimelineSettings::default().clip_speed_range(),
        }
    }

    /// Restrict per-clip speed changes to `range`.
    ///
    /// Non-finite or non-positive bounds fall back to the defaults and an
    /// inverted range is swapped.
    pub fn with_speed_range(mut self, range: RangeInclusive<f32>) -> Self {
        let (min_clip_speed, max_clip_speed) = range.into_inner();
        let settings = TimelineSettings {
            min_clip_speed,
            max_clip_speed,
            ..TimelineSettings::default()
        }
        .sanitized();
        self.speed_range = settings.clip_speed_range();
        self
    }

    /// Attach a newly loaded model's mixer, stopping the previous one
    pub fn load(&mut self, mixer: M) {
        self.unload();
        let clips = mixer.clips().len();
        self.mixer = Some(mixer);
        tracing::info!(clips, "Model animations loaded");
    }

    /// Detach the current mixer, stopping all of its clips
    pub fn unload(&mut self) -> Option<M> {
        self.stop_all();
        self.mixer.take()
    }

    /// Whether a model is attached
    pub fn is_loaded(&self) -> bool {
        self.mixer.is_some()
    }

    /// Borrow the mixer
    pub fn mixer(&self) -> Option<&M> {
        self.mixer.as_ref()
    }

    /// Clips on the loaded model
    pub fn clips(&self) -> Vec<ClipInfo> {
        self.mixer.as_ref().map(AnimationMixer::clips).unwrap_or_default()
    }

    /// Clip names in mixer order
    pub fn clip_names(&self) -> Vec<String> {
        self.clips().into_iter().map(|clip| clip.name).collect()
    }

    /// Nodes animated by one clip; empty for an unknown clip
    pub fn clip_nodes(&self, clip: usize) -> Vec<String> {
        self.clips().into_iter().nth(clip).map(|c| c.nodes).unwrap_or_default()
    }

    /// Number of clips on the loaded model
    pub fn clip_count(&self) -> usize {
        self.clips().len()
    }

    /// Longest clip duration, or 0
    pub fn max_duration(&self) -> f32 {
        self.clips().iter().map(|c| c.duration).fold(0.0, f32::max)
    }

    /// Start every clip from its current time
    pub fn play_all(&mut self) {
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        for clip in 0..mixer.clips().len() {
            mixer.set_paused(clip, false);
            mixer.play(clip);
        }
        tracing::debug!("Model clips playing");
    }

    /// Pause every clip in place
    pub fn pause_all(&mut self) {
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        for clip in 0..mixer.clips().len() {
            mixer.set_paused(clip, true);
        }
    }

    /// Stop and rewind every clip
    pub fn stop_all(&mut self) {
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        for clip in 0..mixer.clips().len() {
            mixer.stop(clip);
        }
    }

    /// Scrub every clip to `time` (clamped per clip) and apply it immediately
    pub fn seek_all(&mut self, time: f32) {
        let Some(mixer) = self.mixer.as_mut() else {
            return;
        };
        let clips = mixer.clips();
        if clips.is_empty() {
            return;
        }
        for (index, clip) in clips.iter().enumerate() {
            scrub(mixer, index, clamp_to_clip(time, clip.duration));
        }
        mixer.update(0.0);
    }

    /// Playback head of the first active clip, or 0
    pub fn current_time(&self) -> f32 {
        let Some(mixer) = self.mixer.as_ref() else {
            return 0.0;
        };
        (0..mixer.clips().len())
            .find(|&clip| mixer.is_active(clip))
            .map_or(0.0, |clip| mixer.time(clip))
    }

    /// Whether any clip is advancing
    pub fn is_playing(&self) -> bool {
        self.mixer
            .as_ref()
            .is_some_and(|m| (0..m.clips().len()).any(|clip| m.is_running(clip)))
    }

    /// Start one clip
    pub fn play_clip(&mut self, clip: usize) {
        if let Some(mixer) = self.clip_mixer(clip) {
            mixer.set_paused(clip, false);
            mixer.play(clip);
        }
    }

    /// Toggle the paused flag of one clip
    pub fn toggle_pause_clip(&mut self, clip: usize) {
        if let Some(mixer) = self.clip_mixer(clip) {
            let paused = mixer.is_paused(clip);
            mixer.set_paused(clip, !paused);
        }
    }

    /// Stop and rewind one clip
    pub fn stop_clip(&mut self, clip: usize) {
        if let Some(mixer) = self.clip_mixer(clip) {
            mixer.stop(clip);
        }
    }

    /// Loop one clip forever, or play it once
    pub fn set_clip_loop(&mut self, clip: usize, looping: bool) {
        if let Some(mixer) = self.clip_mixer(clip) {
            mixer.set_loop(clip, if looping { LoopMode::Repeat } else { LoopMode::Once });
        }
    }

    /// Set one clip's speed multiplier, clamped to the allowed range
    pub fn set_clip_speed(&mut self, clip: usize, speed: f32) {
        if !speed.is_finite() {
            return;
        }
        let speed = speed.max(*self.speed_range.start()).min(*self.speed_range.end());
        if let Some(mixer) = self.clip_mixer(clip) {
            mixer.set_time_scale(clip, speed);
        }
    }

    /// Scrub one clip
    pub fn seek_clip(&mut self, clip: usize, time: f32) {
        let Some(duration) = self.clips().get(clip).map(|c| c.duration) else {
            return;
        };
        if let Some(mixer) = self.mixer.as_mut() {
            scrub(mixer, clip, clamp_to_clip(time, duration));
            mixer.update(0.0);
        }
    }

    /// Advance the mixer by the frame delta
    pub fn tick(&mut self, tick: &FrameTick) {
        if let Some(mixer) = self.mixer.as_mut() {
            mixer.update(tick.delta_seconds());
        }
    }

    fn clip_mixer(&mut self, clip: usize) -> Option<&mut M> {
        self.mixer
            .as_mut()
            .filter(|mixer| clip < mixer.clips().len())
    }
}

/// Clamp a seek target into `[0, duration]`; bad host durations count as 0
fn clamp_to_clip(time: f32, duration: f32) -> f32 {
    let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    if time.is_finite() {
        time.max(0.0).min(duration)
    } else {
        0.0
    }
}

/// Hold a clip paused at `time` so the pose shows without advancing
fn scrub<M: AnimationMixer + ?Sized>(mixer: &mut M, clip: usize, time: f32) {
    if !mixer.is_running(clip) {
        mixer.play(clip);
    }
    mixer.set_paused(clip, true);
    mixer.set_time(clip, time);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FrameClock;
    use crate::mixer::ClipMixer;
    use std::time::Duration;

    fn loaded() -> ModelTimeline<ClipMixer> {
        let mut timeline = ModelTimeline::new();
        timeline.load(ClipMixer::new([
            ClipInfo::new("walk", 2.0),
            ClipInfo::new("wave", 0.5),
        ]));
        timeline
    }

    #[test]
    fn test_empty_is_noop() {
        let mut timeline: ModelTimeline<ClipMixer> = ModelTimeline::new();
        timeline.play_all();
        timeline.pause_all();
        timeline.seek_all(1.0);
        timeline.stop_all();
        timeline.play_clip(0);
        timeline.set_clip_speed(0, 2.0);
        assert_eq!(timeline.max_duration(), 0.0);
        assert_eq!(timeline.current_time(), 0.0);
        assert!(!timeline.is_playing());

        let mut no_clips = ModelTimeline::new();
        no_clips.load(ClipMixer::default());
        no_clips.seek_all(1.0);
        assert_eq!(no_clips.current_time(), 0.0);
    }

    #[test]
    fn test_max_duration() {
        assert_eq!(loaded().max_duration(), 2.0);
        assert_eq!(loaded().clip_names(), vec!["walk".to_string(), "wave".to_string()]);
    }

    #[test]
    fn test_clip_nodes() {
        let mut timeline = ModelTimeline::new();
        timeline.load(ClipMixer::new([ClipInfo::new("wave", 1.0).with_nodes(["arm_r", "hand_r"])]));
        assert_eq!(timeline.clip_nodes(0), vec!["arm_r", "hand_r"]);
        assert!(timeline.clip_nodes(3).is_empty());
    }

    #[test]
    fn test_seek_clamps_per_clip() {
        let mut timeline = loaded();
        timeline.seek_all(1.2);
        let mixer = timeline.mixer().cloned().unwrap_or_default();
        assert!((mixer.time(0) - 1.2).abs() < 1e-6);
        assert_eq!(mixer.time(1), 0.5);
        assert!(mixer.is_paused(0));
        assert!((timeline.current_time() - 1.2).abs() < 1e-6);

        timeline.seek_all(-3.0);
        assert_eq!(timeline.current_time(), 0.0);
    }

    #[test]
    fn test_play_advances_with_ticks() {
        let mut timeline = loaded();
        let mut clock = FrameClock::new();
        timeline.play_all();
        timeline.tick(&clock.tick(Duration::from_millis(0)));
        timeline.tick(&clock.tick(Duration::from_millis(250)));
        assert!((timeline.current_time() - 0.25).abs() < 1e-5);
        assert!(timeline.is_playing());

        timeline.pause_all();
        timeline.tick(&clock.tick(Duration::from_millis(500)));
        assert!((timeline.current_time() - 0.25).abs() < 1e-5);

        timeline.stop_all();
        assert_eq!(timeline.current_time(), 0.0);
        assert!(!timeline.is_playing());
    }

    #[test]
    fn test_seek_after_play_keeps_scrub_paused() {
        let mut timeline = loaded();
        timeline.play_all();
        timeline.seek_all(1.0);
        assert!(!timeline.is_playing());
        timeline.play_all();
        assert!(timeline.is_playing());
    }

    #[test]
    fn test_per_clip_controls() {
        let mut timeline = loaded();
        timeline.play_clip(1);
        timeline.toggle_pause_clip(1);
        assert!(!timeline.is_playing());
        timeline.toggle_pause_clip(1);
        assert!(timeline.is_playing());

        timeline.set_clip_speed(1, 10.0);
        timeline.set_clip_loop(1, false);
        let mut clock = FrameClock::new();
        timeline.tick(&clock.tick(Duration::ZERO));
        timeline.tick(&clock.tick(Duration::from_millis(100)));
        // 3x speed for 0.1s
        assert!((timeline.current_time() - 0.3).abs() < 1e-5);

        timeline.seek_clip(1, 9.0);
        assert_eq!(timeline.current_time(), 0.5);
        timeline.stop_clip(1);
        assert_eq!(timeline.current_time(), 0.0);

        // Unknown clip index
        timeline.play_clip(7);
        timeline.seek_clip(7, 1.0);
        assert!(!timeline.is_playing());
    }

    #[test]
    fn test_reload_stops_previous_model() {
        let mut timeline = loaded();
        timeline.play_all();
        timeline.load(ClipMixer::new([ClipInfo::new("idle", 4.0)]));
        assert_eq!(timeline.clip_count(), 1);
        assert!(!timeline.is_playing());
        let previous = timeline.unload();
        assert!(previous.is_some());
        assert!(!timeline.is_loaded());
    }

    #[test]
    fn test_bad_speed_ranges_do_not_panic() {
        let mut mixer = ClipMixer::new([ClipInfo::new("walk", 2.0)]);
        mixer.play(0);

        let mut nan = ModelTimeline::new().with_speed_range(f32::NAN..=3.0);
        nan.load(mixer.clone());
        nan.set_clip_speed(0, 1.0);
        nan.set_clip_speed(0, f32::NAN);
        nan.set_clip_speed(0, 0.0);

        let mut inverted = ModelTimeline::new().with_speed_range(3.0..=0.5);
        inverted.load(mixer);
        inverted.set_clip_speed(0, 10.0);
        let mut clock = FrameClock::new();
        inverted.play_all();
        inverted.tick(&clock.tick(Duration::ZERO));
        inverted.tick(&clock.tick(Duration::from_millis(100)));
        // Swapped range tops out at 3x
        assert!((inverted.current_time() - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_seek_clamp_handles_bad_durations() {
        assert_eq!(clamp_to_clip(1.0, f32::NAN), 0.0);
        assert_eq!(clamp_to_clip(1.0, -2.0), 0.0);
        assert_eq!(clamp_to_clip(f32::NAN, 2.0), 0.0);
        assert_eq!(clamp_to_clip(5.0, 2.0), 2.0);
        assert_eq!(clamp_to_clip(0.5, 2.0), 0.5);
    }
}
