//! Debug override multiplexers.
//!
//! Each bit of the bypass register swaps one stage's output for a known
//! value so a stage can be isolated on the bench. All four are pure
//! selections with no state.

use crate::dsp::oscillator::{Channels, Waveform};

const FORCE_OSCILLATOR: u8 = 0b0001;
const FORCE_ENVELOPE: u8 = 0b0010;
const FILTER_PASSTHROUGH: u8 = 0b0100;
const SAW_FOR_WAVETABLE: u8 = 0b1000;

/// Oscillator output while forced: mid-scale, i.e. silence.
pub const FORCED_OSCILLATOR: u8 = 0x80;
/// Envelope output while forced: fully open.
pub const FORCED_ENVELOPE: u8 = 0xFF;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bypass(u8);

impl Bypass {
    pub fn from_register(value: u8) -> Self {
        Self(value)
    }

    /// Replace the wavetable channel with the sawtooth channel.
    #[inline]
    pub fn wavetable(self, channels: &mut Channels) {
        if self.0 & SAW_FOR_WAVETABLE != 0 {
            channels[Waveform::Wavetable.index()] = channels[Waveform::Sawtooth.index()];
        }
    }

    #[inline]
    pub fn oscillator(self, signal: u8) -> u8 {
        if self.0 & FORCE_OSCILLATOR != 0 {
            FORCED_OSCILLATOR
        } else {
            signal
        }
    }

    #[inline]
    pub fn envelope(self, envelope: u8) -> u8 {
        if self.0 & FORCE_ENVELOPE != 0 {
            FORCED_ENVELOPE
        } else {
            envelope
        }
    }

    #[inline]
    pub fn filter_passthrough(self) -> bool {
        self.0 & FILTER_PASSTHROUGH != 0
    }
}
