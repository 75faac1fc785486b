// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera and model playback coordination.
//!
//! "Synchronized" playback means the camera timeline and the model clips are
//! started by the same action. After that each runs on its own clock: the
//! camera measures elapsed time from the segment start, the mixer
//! accumulates frame deltas. Nothing corrects drift between them.

use crate::clock::{FrameClock, FrameTick};
use crate::document::{CameraAnimationDocument, DocumentError};
use crate::interpolation::{add, length, sub};
use crate::mixer::AnimationMixer;
use crate::model_timeline::ModelTimeline;
use crate::panel::{PanelAction, PanelStatus};
use crate::player::{CameraTimelinePlayer, TickOutcome};
use crate::rig::CameraRig;
use crate::session::CameraAnimationSession;
use crate::settings::TimelineSettings;
use std::time::Duration;

/// Result of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Tick that was dispatched
    pub tick: FrameTick,
    /// What the camera player did
    pub camera: TickOutcome,
    /// Model playback head after the tick
    pub model_time: f32,
}

/// Owns the session, the host camera and the model timeline
pub struct PlaybackCoordinator<R: CameraRig, M: AnimationMixer> {
    session: CameraAnimationSession,
    player: CameraTimelinePlayer,
    rig: R,
    model: ModelTimeline<M>,
    clock: FrameClock,
}

impl<R: CameraRig, M: AnimationMixer> PlaybackCoordinator<R, M> {
    /// Create a coordinator around a host camera
    pub fn new(rig: R, settings: TimelineSettings) -> Self {
        let mut session = CameraAnimationSession::new(settings.sanitized());
        session.zoom.sync(rig.pose().zoom());
        let model = ModelTimeline::new().with_speed_range(session.settings.clip_speed_range());
        Self {
            session,
            player: CameraTimelinePlayer::new(),
            rig,
            model,
            clock: FrameClock::new(),
        }
    }

    /// Session state
    pub fn session(&self) -> &CameraAnimationSession {
        &self.session
    }

    /// Mutable session state
    pub fn session_mut(&mut self) -> &mut CameraAnimationSession {
        &mut self.session
    }

    /// Host camera
    pub fn rig(&self) -> &R {
        &self.rig
    }

    /// Mutable host camera (direct user manipulation)
    pub fn rig_mut(&mut self) -> &mut R {
        &mut self.rig
    }

    /// Model timeline
    pub fn model(&self) -> &ModelTimeline<M> {
        &self.model
    }

    /// Mutable model timeline (per-clip controls)
    pub fn model_mut(&mut self) -> &mut ModelTimeline<M> {
        &mut self.model
    }

    /// Camera player
    pub fn player(&self) -> &CameraTimelinePlayer {
        &self.player
    }

    /// Attach a loaded model's mixer
    pub fn load_model(&mut self, mixer: M) {
        self.model.load(mixer);
    }

    /// Snapshot the live camera and model time as a new keyframe
    pub fn add_keyframe(&mut self) -> usize {
        let keyframe = self
            .session
            .capture(&self.rig.pose(), self.model.current_time());
        self.session.keyframes.append(keyframe)
    }

    /// Play the camera timeline alone
    pub fn play_camera_only(&mut self) -> bool {
        self.player.play(self.session.keyframes.keyframes())
    }

    /// Start the camera timeline and every model clip together
    pub fn play_camera_and_model(&mut self) -> bool {
        if !self.player.play(self.session.keyframes.keyframes()) {
            return false;
        }
        self.model.play_all();
        true
    }

    /// Stop the camera timeline and all model clips
    pub fn stop_all(&mut self) {
        self.player.stop();
        self.model.stop_all();
    }

    /// Restore a keyframe's pose and model time without interpolation
    pub fn jump_to_keyframe(&mut self, index: usize) -> bool {
        let Some(keyframe) = self.session.keyframes.get(index) else {
            return false;
        };
        let pose = keyframe.pose();
        let zoom = keyframe.zoom;
        let model_time = keyframe.model_anim_time;

        self.player.stop();
        self.rig.apply_pose(&pose);
        self.session.zoom.sync(zoom);
        self.session.keyframes.select(index);
        self.model.seek_all(model_time);
        tracing::debug!(index, model_time, "Jumped to keyframe");
        true
    }

    /// Dispatch one host frame to the camera player and the model clips
    pub fn on_frame(&mut self, now: Duration) -> FrameReport {
        let tick = self.clock.tick(now);
        let camera = self.player.tick(
            &tick,
            self.session.keyframes.keyframes(),
            &mut self.rig,
            &mut self.session.zoom,
        );
        if camera == TickOutcome::Idle {
            self.ease_zoom();
        }
        self.model.tick(&tick);
        FrameReport {
            tick,
            camera,
            model_time: self.model.current_time(),
        }
    }

    /// Move the smooth-zoom target by `delta`, clamped to `[min, max]`.
    ///
    /// The camera follows over the next idle frames.
    pub fn nudge_zoom(&mut self, delta: f32, min: f32, max: f32) {
        if !delta.is_finite() || min.is_nan() || max.is_nan() || min > max {
            return;
        }
        self.session.zoom.nudge(delta, min, max);
    }

    /// One smooth-zoom step: move the camera along its view line toward
    /// the eased distance
    fn ease_zoom(&mut self) {
        if self.session.zoom.is_settled() {
            return;
        }
        let distance = self.session.zoom.step(self.session.settings.zoom_smoothing);
        let mut pose = self.rig.pose();
        let offset = sub(pose.position, pose.target);
        let current = length(offset);
        if current <= f32::EPSILON {
            return;
        }
        let scale = distance / current;
        pose.position = add(pose.target, [offset[0] * scale, offset[1] * scale, offset[2] * scale]);
        self.rig.apply_pose(&pose);
    }

    /// Export the live camera and the keyframes
    pub fn export_document(&self) -> CameraAnimationDocument {
        CameraAnimationDocument::capture(&self.rig.pose(), self.session.keyframes.keyframes())
    }

    /// Parse and apply an exported document.
    ///
    /// On error nothing changes. On success the camera timeline stops, the
    /// camera pose is restored and the keyframe list is replaced.
    pub fn import_json(&mut self, text: &str) -> Result<(), DocumentError> {
        match CameraAnimationDocument::from_json(text) {
            Ok(document) => {
                self.import_document(&document);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected camera animation import: {e}");
                Err(e)
            }
        }
    }

    /// Apply an already parsed document
    pub fn import_document(&mut self, document: &CameraAnimationDocument) {
        self.player.stop();
        let pose = document.camera_pose();
        self.rig.apply_pose(&pose);
        self.session.zoom.sync(pose.zoom());
        self.session.keyframes.replace_all(document.to_keyframes());
        tracing::info!(keyframes = document.keyframes.len(), "Imported camera animation");
    }

    /// State shown by the keyframe panel
    pub fn panel_status(&self) -> PanelStatus {
        PanelStatus {
            playing: self.player.is_playing(),
            model_loaded: self.model.is_loaded(),
            model_time: self.model.current_time(),
            model_duration: self.model.max_duration(),
            duration_range: self.session.settings.duration_range(),
        }
    }

    /// Apply an action emitted by the keyframe panel
    pub fn apply_panel_action(&mut self, action: PanelAction) -> bool {
        match action {
            PanelAction::AddKeyframe => {
                self.add_keyframe();
                true
            }
            PanelAction::Clear => {
                self.session.keyframes.clear();
                true
            }
            PanelAction::Play => self.play_camera_only(),
            PanelAction::PlayWithModel => self.play_camera_and_model(),
            PanelAction::Stop => {
                self.stop_all();
                true
            }
            PanelAction::Jump(index) => self.jump_to_keyframe(index),
            PanelAction::MoveUp(index) => self.session.keyframes.move_up(index),
            PanelAction::MoveDown(index) => self.session.keyframes.move_down(index),
            PanelAction::Delete(index) => self.session.keyframes.remove_at(index).is_some(),
            PanelAction::SetDuration(index, ms) => self.session.keyframes.set_duration_ms(index, ms),
            PanelAction::SelectNext => match self.session.keyframes.select_next() {
                Some(index) => self.jump_to_keyframe(index),
                None => false,
            },
            PanelAction::SelectPrevious => match self.session.keyframes.select_previous() {
                Some(index) => self.jump_to_keyframe(index),
                None => false,
            },
            PanelAction::SeekModel(time) => {
                self.model.seek_all(time);
                self.model.is_loaded()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::{ClipInfo, ClipMixer};
    use crate::rig::{CameraPose, HeadlessRig};

    type TestCoordinator = PlaybackCoordinator<HeadlessRig, ClipMixer>;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn coordinator() -> TestCoordinator {
        let mut c = PlaybackCoordinator::new(HeadlessRig::default(), TimelineSettings::default());
        c.load_model(ClipMixer::new([ClipInfo::new("spin", 4.0)]));
        c
    }

    fn move_camera(c: &mut TestCoordinator, position: [f32; 3], fov: f32) {
        let pose = CameraPose {
            position,
            fov,
            ..CameraPose::default()
        };
        c.rig_mut().apply_pose(&pose);
    }

    #[test]
    fn test_add_keyframe_captures_model_time() {
        let mut c = coordinator();
        c.model_mut().seek_all(1.5);
        move_camera(&mut c, [0.0, 0.0, 8.0], 60.0);
        assert_eq!(c.add_keyframe(), 0);

        let kf = c.session().keyframes.get(0).cloned().unwrap();
        assert!((kf.zoom - 8.0).abs() < 1e-5);
        assert_eq!(kf.fov, 60.0);
        assert!((kf.model_anim_time - 1.5).abs() < 1e-6);
        assert_eq!(kf.duration_ms(), 1200);
    }

    #[test]
    fn test_camera_and_model_start_together() {
        let mut c = coordinator();
        move_camera(&mut c, [0.0, 0.0, 5.0], 75.0);
        c.add_keyframe();
        move_camera(&mut c, [0.0, 0.0, 10.0], 50.0);
        c.add_keyframe();
        c.session_mut().keyframes.set_duration_ms(1, 1000);

        assert!(c.play_camera_and_model());
        assert!(c.model().is_playing());
        c.on_frame(ms(0));
        let report = c.on_frame(ms(500));

        assert_eq!(report.camera, TickOutcome::Animating { segment: 0, t: 0.5 });
        assert!((report.model_time - 0.5).abs() < 1e-5);
        assert!((c.rig().pose().fov - 62.5).abs() < 1e-4);
        assert!((c.session().zoom.target - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_model_not_started_when_camera_cannot_play() {
        let mut c = coordinator();
        c.add_keyframe();
        assert!(!c.play_camera_and_model());
        assert!(!c.model().is_playing());
        assert!(!c.play_camera_only());
    }

    #[test]
    fn test_stop_all_always_succeeds() {
        let mut c = coordinator();
        c.stop_all();
        assert!(!c.player().is_playing());

        c.add_keyframe();
        c.add_keyframe();
        c.play_camera_and_model();
        c.stop_all();
        assert!(!c.player().is_playing());
        assert!(!c.model().is_playing());
        assert_eq!(c.model().current_time(), 0.0);
    }

    #[test]
    fn test_jump_restores_pose_and_model_time() {
        let mut c = coordinator();
        c.model_mut().seek_all(2.5);
        move_camera(&mut c, [1.0, 2.0, 3.0], 40.0);
        c.add_keyframe();
        c.model_mut().seek_all(0.0);
        move_camera(&mut c, [0.0, 0.0, 9.0], 80.0);
        c.add_keyframe();

        assert!(c.jump_to_keyframe(0));
        let pose = c.rig().pose();
        assert_eq!(pose.position, [1.0, 2.0, 3.0]);
        assert_eq!(pose.fov, 40.0);
        assert!((c.model().current_time() - 2.5).abs() < 1e-6);
        assert_eq!(c.session().keyframes.selected(), Some(0));
        assert!((c.session().zoom.current - pose.zoom()).abs() < 1e-5);

        assert!(!c.jump_to_keyframe(5));
        assert_eq!(c.session().keyframes.selected(), Some(0));
    }

    #[test]
    fn test_jump_cancels_running_timeline() {
        let mut c = coordinator();
        c.add_keyframe();
        c.add_keyframe();
        c.play_camera_only();
        c.jump_to_keyframe(1);
        assert!(!c.player().is_playing());
    }

    #[test]
    fn test_failed_import_keeps_state() {
        let mut c = coordinator();
        move_camera(&mut c, [0.0, 1.0, 4.0], 70.0);
        c.add_keyframe();
        let before = c.rig().pose();

        assert!(c.import_json(r#"{"camera": null, "keyframes": []}"#).is_err());
        assert!(c.import_json("{").is_err());
        assert_eq!(c.session().keyframes.len(), 1);
        assert_eq!(c.rig().pose(), before);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut source = coordinator();
        move_camera(&mut source, [0.0, 0.0, 5.0], 75.0);
        source.add_keyframe();
        move_camera(&mut source, [4.0, 1.0, 0.0], 45.0);
        source.add_keyframe();
        source.session_mut().keyframes.set_duration_ms(1, 333);
        let json = source.export_document().to_json_pretty().unwrap();

        let mut target = coordinator();
        target.import_json(&json).unwrap();
        assert_eq!(target.rig().pose(), source.rig().pose());
        let a = source.session().keyframes.keyframes();
        let b = target.session().keyframes.keyframes();
        assert_eq!(a.len(), b.len());
        assert!(a.iter().zip(b.iter()).all(|(x, y)| x.approx_eq(y, 1e-5)));
    }

    #[test]
    fn test_panel_actions() {
        let mut c = coordinator();
        assert!(c.apply_panel_action(PanelAction::AddKeyframe));
        move_camera(&mut c, [0.0, 0.0, 7.0], 75.0);
        assert!(c.apply_panel_action(PanelAction::AddKeyframe));
        assert!(c.apply_panel_action(PanelAction::SetDuration(1, 400)));
        assert!(!c.apply_panel_action(PanelAction::MoveUp(0)));
        assert!(c.apply_panel_action(PanelAction::MoveDown(0)));
        assert!(c.apply_panel_action(PanelAction::SelectNext));
        assert_eq!(c.session().keyframes.selected(), Some(0));
        assert!((c.rig().pose().zoom() - 7.0).abs() < 1e-5);

        assert!(c.apply_panel_action(PanelAction::Play));
        assert!(!c.apply_panel_action(PanelAction::Play));
        assert!(c.apply_panel_action(PanelAction::Stop));
        assert!(c.apply_panel_action(PanelAction::SeekModel(1.0)));
        assert!(c.apply_panel_action(PanelAction::Delete(0)));
        assert!(!c.apply_panel_action(PanelAction::Delete(3)));
        assert!(c.apply_panel_action(PanelAction::Clear));
        assert!(c.session().keyframes.is_empty());
        assert!(!c.apply_panel_action(PanelAction::SelectPrevious));
    }

    #[test]
    fn test_idle_frames_ease_zoom() {
        let mut c = coordinator();
        c.nudge_zoom(5.0, 1.0, 8.0);
        assert_eq!(c.session().zoom.target, 8.0);

        c.on_frame(ms(0));
        // 5 + (8 - 5) * 0.1
        assert!((c.rig().pose().zoom() - 5.3).abs() < 1e-4);
        for frame in 1..200 {
            c.on_frame(ms(frame * 16));
        }
        assert!(c.session().zoom.is_settled());
        assert!((c.rig().pose().zoom() - 8.0).abs() < 1e-4);
        assert_eq!(c.rig().pose().target, [0.0; 3]);
    }

    #[test]
    fn test_zoom_smoothing_comes_from_settings() {
        let settings = TimelineSettings {
            zoom_smoothing: 0.5,
            ..TimelineSettings::default()
        };
        let mut c: TestCoordinator = PlaybackCoordinator::new(HeadlessRig::default(), settings);
        c.nudge_zoom(-2.0, 1.0, 8.0);
        c.on_frame(ms(0));
        assert!((c.rig().pose().zoom() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_settled_zoom_leaves_camera_alone() {
        let mut c = coordinator();
        move_camera(&mut c, [0.0, 0.0, 12.0], 75.0);
        let writes = c.rig().writes;
        c.on_frame(ms(0));
        c.on_frame(ms(16));
        assert_eq!(c.rig().writes, writes);
        assert!((c.rig().pose().zoom() - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_bad_clip_speed_settings_are_sanitized() {
        let settings = TimelineSettings::from_ron("(min_clip_speed: NaN)").unwrap();
        let mut c: TestCoordinator = PlaybackCoordinator::new(HeadlessRig::default(), settings);
        c.load_model(ClipMixer::new([ClipInfo::new("spin", 4.0)]));
        c.model_mut().set_clip_speed(0, 1.0);

        let inverted = TimelineSettings {
            min_clip_speed: 3.0,
            max_clip_speed: 0.5,
            ..TimelineSettings::default()
        };
        let mut c: TestCoordinator = PlaybackCoordinator::new(HeadlessRig::default(), inverted);
        c.load_model(ClipMixer::new([ClipInfo::new("spin", 4.0)]));
        c.model_mut().set_clip_speed(0, 1.0);
        assert_eq!(c.session().settings.clip_speed_range(), 0.5..=3.0);
    }
}
