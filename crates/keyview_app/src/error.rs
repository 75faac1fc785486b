// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command errors

use keyview_timeline::{DocumentError, SettingsError};
use thiserror::Error;

/// Errors reported by the `keyview` commands
#[derive(Debug, Error)]
pub enum AppError {
    /// Animation file could not be read or parsed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Settings file could not be read or parsed
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Timeline cannot be played
    #[error("Animation needs at least two keyframes, found {0}")]
    NotPlayable(usize),

    /// Bad argument value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Frame output could not be encoded
    #[error("Failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),

    /// Writing to the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
