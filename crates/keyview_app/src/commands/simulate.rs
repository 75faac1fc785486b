// SPDX-License-Identifier: MIT OR Apache-2.0
//! `simulate`: headless playback through the coordinator.
//!
//! Each simulated display frame produces one JSON line:
//!
//! ```json
//! {"frame":1,"time_ms":0.0,"event":"animating","segment":0,"t":0.0,
//!  "position":[0.0,0.0,5.0],"target":[0.0,0.0,0.0],"zoom":5.0,"model_time":0.0}
//! ```

use crate::error::AppError;
use keyview_timeline::{
    CameraAnimationDocument, CameraRig, ClipInfo, ClipMixer, HeadlessRig, PlaybackCoordinator, TickOutcome,
    TimelineSettings, Vec3,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Name of the synthetic clip used by `--with-model`
const SIMULATED_CLIP: &str = "Simulated";

/// One simulated frame
#[derive(Debug, Serialize)]
struct FrameLine {
    frame: u64,
    time_ms: f64,
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    segment: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    t: Option<f32>,
    position: Vec3,
    target: Vec3,
    zoom: f32,
    model_time: f32,
}

/// Exact timestamp of `frame` at `fps` frames per second
fn frame_time(frame: u64, fps: u64) -> Duration {
    Duration::from_secs(frame / fps) + Duration::from_nanos((frame % fps) * 1_000_000_000 / fps)
}

/// Play `file` at `fps` until the camera timeline finishes
pub fn execute(
    file: &Path,
    fps: u32,
    with_model: Option<f32>,
    settings: &TimelineSettings,
    out: &mut impl Write,
) -> Result<(), AppError> {
    if fps == 0 {
        return Err(AppError::InvalidArgument("fps must be positive".to_string()));
    }
    if let Some(seconds) = with_model {
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(AppError::InvalidArgument(format!("model clip length {seconds} must be positive")));
        }
    }

    let document = CameraAnimationDocument::read_from_path(file)?;
    let rig = HeadlessRig::new(document.camera_pose());
    let mut coordinator: PlaybackCoordinator<HeadlessRig, ClipMixer> = PlaybackCoordinator::new(rig, settings.clone());
    coordinator.import_document(&document);

    let started = match with_model {
        Some(seconds) => {
            coordinator.load_model(ClipMixer::new([ClipInfo::new(SIMULATED_CLIP, seconds)]));
            coordinator.play_camera_and_model()
        }
        None => coordinator.play_camera_only(),
    };
    if !started {
        return Err(AppError::NotPlayable(document.keyframes.len()));
    }

    let fps = u64::from(fps);
    let total_ms = coordinator.session().keyframes.total_duration_ms();
    // One extra frame per segment for the advance, plus slack
    let frame_limit = total_ms
        .saturating_mul(fps)
        .div_ceil(1000)
        .saturating_add(2 * coordinator.session().keyframes.len() as u64 + 4);

    for frame in 0..frame_limit {
        let now = frame_time(frame, fps);
        let report = coordinator.on_frame(now);
        let pose = coordinator.rig().pose();

        let (event, segment, t) = match report.camera {
            TickOutcome::Idle => ("idle", None, None),
            TickOutcome::Animating { segment, t } => ("animating", Some(segment), Some(t)),
            TickOutcome::Advanced { segment } => ("advanced", Some(segment), None),
            TickOutcome::Finished => ("finished", None, None),
        };
        let line = FrameLine {
            frame: report.tick.frame,
            time_ms: report.tick.now.as_secs_f64() * 1000.0,
            event,
            segment,
            t,
            position: pose.position,
            target: pose.target,
            zoom: coordinator.session().zoom.target,
            model_time: report.model_time,
        };
        serde_json::to_writer(&mut *out, &line)?;
        writeln!(out)?;

        if report.camera == TickOutcome::Finished {
            tracing::info!(frames = report.tick.frame, "Simulation finished");
            coordinator.stop_all();
            return Ok(());
        }
    }

    tracing::warn!(frame_limit, "Simulation stopped before the timeline finished");
    coordinator.stop_all();
    Ok(())
}
