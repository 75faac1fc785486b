// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command implementations

pub mod inspect;
pub mod normalize;
pub mod simulate;

use crate::cli::Commands;
use crate::error::AppError;
use keyview_timeline::TimelineSettings;
use std::io::Write;

/// Run a parsed command, writing its report to `out`
pub fn execute(command: Commands, settings: &TimelineSettings, out: &mut impl Write) -> Result<(), AppError> {
    match command {
        Commands::Info { file } => inspect::execute_info(&file, out),
        Commands::Validate { file } => inspect::execute_validate(&file, settings, out),
        Commands::Simulate { file, fps, with_model } => simulate::execute(&file, fps, with_model, settings, out),
        Commands::Normalize { file, output } => normalize::execute(&file, &output, out),
    }
}
