//! Fixed-point per-tick DSP primitives.
//!
//! Every component here does a constant amount of integer work per tick and
//! owns no heap memory, so they can be composed directly inside the tick
//! pipeline. The [`Synth`](crate::Synth) wires them together in dependency
//! order; each module stays focused on its own arithmetic.

/// Signal multiplication: ring modulation and amplitude shaping.
pub mod amplify;
/// Bypass/debug override multiplexers.
pub mod bypass;
/// First-order delta-sigma one-bit output stage.
pub mod dac;
/// Attack/decay/sustain/release envelope state machine.
pub mod envelope;
/// Cascaded state-variable filter sections.
pub mod filter;
/// Frequency glide (portamento) slew limiter.
pub mod glide;
/// Six-channel saturating mixer.
pub mod mix;
/// Bipolar envelope routing and pulse-width modulation.
pub mod modulate;
/// Waveform generators and the noise LFSR.
pub mod oscillator;
/// 24-bit DDS phase accumulator.
pub mod phase;
/// Programmable, interpolated wavetable.
pub mod wavetable;

pub use envelope::EnvelopeState;

/// Maps an 8-bit gain so that 0xFF is exact unity (0..=256).
#[inline]
pub(crate) fn unity_gain(gain: u8) -> u32 {
    gain as u32 + (gain as u32 >> 7)
}
