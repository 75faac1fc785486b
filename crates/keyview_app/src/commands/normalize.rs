// SPDX-License-Identifier: MIT OR Apache-2.0
//! `normalize`: rewrite an animation in the current export format

use crate::error::AppError;
use keyview_timeline::CameraAnimationDocument;
use std::io::Write;
use std::path::Path;

/// Re-export `file` to `output`.
///
/// Missing `duration` / `modelAnimTime` are filled with their defaults and
/// `index` is renumbered from the array order.
pub fn execute(file: &Path, output: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let document = CameraAnimationDocument::read_from_path(file)?;
    let normalized = CameraAnimationDocument::capture(&document.camera_pose(), &document.to_keyframes());
    normalized.write_to_path(output)?;

    tracing::info!(input = %file.display(), output = %output.display(), "Normalized camera animation");
    writeln!(out, "Wrote {} keyframes to {}", normalized.keyframes.len(), output.display())?;
    Ok(())
}
