//! Whole-pipeline benchmarks.
//!
//! These run the synth the way the binary does: presets loaded, registers
//! arriving over the protocol queue, one tick per DAC clock.

mod tick;

pub use tick::bench_tick;
