//! Benchmarks for per-tick DSP primitives.

mod dac;
mod envelope;
mod filter;
mod mix;
mod oscillator;

pub use dac::bench_dac;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use mix::bench_mix;
pub use oscillator::bench_oscillator;
