//! Render every built-in preset without an audio device.
//!
//! Each patch is gated for a short note and released, and the decimated
//! output is summarised per phase.
//!
//! Run with: cargo run --example offline_bounce

use bitsynth::{patch, Synth, SynthConfig};

const SAMPLE_RATE: usize = 48_000;

fn level(samples: &[f32]) -> (f32, f32) {
    let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
    let rms = (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt();
    (peak, rms)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let config = SynthConfig::default();
    let mut held = vec![0.0f32; SAMPLE_RATE / 4];
    let mut released = vec![0.0f32; SAMPLE_RATE / 4];

    for patch in patch::presets() {
        let mut synth = Synth::new(config);
        patch.apply_direct(&mut synth);

        synth.set_gate_input(true);
        synth.render_block(&mut held);
        let stage_held = synth.envelope();

        synth.set_gate_input(false);
        synth.render_block(&mut released);
        let stage_released = synth.envelope();

        let (peak, rms) = level(&held);
        let (tail_peak, tail_rms) = level(&released);
        println!(
            "{:<14} held: peak {peak:.2} rms {rms:.2} ({stage_held:?})  released: peak {tail_peak:.2} rms {tail_rms:.2} ({stage_released:?})  {} ticks",
            patch.name,
            synth.ticks(),
        );
    }

    Ok(())
}
