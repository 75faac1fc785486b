// SPDX-License-Identifier: MIT OR Apache-2.0
//! `info` and `validate`

use crate::error::AppError;
use keyview_timeline::{CameraAnimationDocument, KeyframeStore, TimelineSettings, Vec3};
use std::io::Write;
use std::path::Path;

fn fmt_vec3(v: Vec3) -> String {
    format!("[{:.2}, {:.2}, {:.2}]", v[0], v[1], v[2])
}

/// Print the camera and the keyframe table
pub fn execute_info(file: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let document = CameraAnimationDocument::read_from_path(file)?;
    let camera = document.camera_pose();
    let mut keyframes = KeyframeStore::new();
    keyframes.replace_all(document.to_keyframes());

    writeln!(out, "File: {}", file.display())?;
    writeln!(
        out,
        "Camera: pos {} target {} fov {:.1} near {} far {}",
        fmt_vec3(camera.position),
        fmt_vec3(camera.target),
        camera.fov,
        camera.near,
        camera.far
    )?;
    writeln!(out, "Keyframes: {} ({:.2}s total)", keyframes.len(), keyframes.total_duration_ms() as f64 / 1000.0)?;

    for (i, keyframe) in keyframes.iter().enumerate() {
        writeln!(
            out,
            "  #{:<3} pos {} target {} zoom {:.2} fov {:.1} duration {}ms model {:.2}s",
            i + 1,
            fmt_vec3(keyframe.position),
            fmt_vec3(keyframe.target),
            keyframe.zoom,
            keyframe.fov,
            keyframe.duration_ms(),
            keyframe.model_anim_time
        )?;
    }
    Ok(())
}

/// Check that a file imports and can be played.
///
/// Durations outside the configured slider range and out-of-order `index`
/// fields are reported as warnings; they do not fail validation.
pub fn execute_validate(file: &Path, settings: &TimelineSettings, out: &mut impl Write) -> Result<(), AppError> {
    let document = CameraAnimationDocument::read_from_path(file)?;

    let range = settings.duration_range();
    let mut warnings = 0usize;
    for (i, record) in document.keyframes.iter().enumerate() {
        if record.index != 0 && record.index != i + 1 {
            tracing::warn!(position = i + 1, index = record.index, "Keyframe index out of order, array order is used");
            warnings += 1;
        }
        if !range.contains(&record.duration) {
            tracing::warn!(position = i + 1, duration = record.duration, "Duration outside {range:?}");
            warnings += 1;
        }
    }

    let count = document.keyframes.len();
    if count < 2 {
        return Err(AppError::NotPlayable(count));
    }

    writeln!(out, "{}: OK ({count} keyframes, {warnings} warnings)", file.display())?;
    Ok(())
}
