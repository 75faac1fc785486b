// SPDX-License-Identifier: MIT OR Apache-2.0
//! `keyview` - headless tools for camera keyframe animations
//!
//! Inspects, validates, normalizes and simulates the JSON animations the
//! viewer exports, using the same timeline code the viewer runs.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::Cli;
use keyview_timeline::TimelineSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG overrides the command line verbosity
    let level = cli.log_level();
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("keyview={level},keyview_timeline={level}")));

    // Frames go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting keyview v{}", env!("CARGO_PKG_VERSION"));

    let settings = match cli.settings.as_deref() {
        Some(path) => TimelineSettings::load(path),
        None => TimelineSettings::load(std::path::Path::new(keyview_timeline::SETTINGS_FILE_NAME)),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = commands::execute(cli.command, &settings, &mut std::io::stdout().lock()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
