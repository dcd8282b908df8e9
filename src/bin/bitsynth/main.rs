//! bitsynth - terminal front-end
//!
//! Plays the synth's one-bit output through the sound card and shows the
//! decimated signal, its spectrum and the live register file.
//!
//! Run with: cargo run --release
//! Set BITSYNTH_LOG=<file> to write library logs to a file.

mod app;
mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt};

use app::Bitsynth;
use bitsynth::{patch, SynthConfig};

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    setup_logging()?;

    Bitsynth::new(SynthConfig::default())
        .presets(patch::presets())
        .run()
}

/// Logs go to a file or nowhere: the terminal belongs to the UI.
fn setup_logging() -> EyreResult<()> {
    let Ok(path) = std::env::var("BITSYNTH_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).wrap_err_with(|| format!("failed to create log file {path}"))?;

    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .compact()
        .finish()
        .try_init()
        .wrap_err("failed to install log subscriber")
}
