// SPDX-License-Identifier: MIT OR Apache-2.0
//! Root CLI structure for keyview

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keyview")]
#[command(about = "Tools for camera keyframe animations", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Timeline settings file (RON)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl Cli {
    /// Log level requested on the command line
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display the camera and keyframes of an animation file
    Info {
        /// Path to the animation JSON
        file: PathBuf,
    },

    /// Check that an animation file can be imported and played
    Validate {
        /// Path to the animation JSON
        file: PathBuf,
    },

    /// Play an animation headless and print one JSON line per frame
    Simulate {
        /// Path to the animation JSON
        file: PathBuf,

        /// Frames per second of the simulated display
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=1000))]
        fps: u32,

        /// Also play a model clip of this length (seconds)
        #[arg(long, value_name = "SECONDS")]
        with_model: Option<f32>,
    },

    /// Re-export an animation with defaults filled in and indices renumbered
    Normalize {
        /// Path to the animation JSON
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: PathBuf,
    },
}
