//! Signal multiplication: ring modulation and amplitude shaping.

use crate::dsp::oscillator::{Channels, Waveform};
use crate::dsp::unity_gain;

/*
Signal Multiplication
=====================

Multiplying two 8-bit signals and keeping the top byte is the integer
version of multiplying two values in [0, 1):

    out = (a × b) >> 8

The same operation does two jobs depending on what the second signal is.


Use Case 1: Ring Modulation
---------------------------

Both inputs are audio-rate waveforms. The product contains the sum and
difference frequencies of the inputs, which is where the metallic, bell-like
character comes from.

    A:    square  (bits 2:0 of the config register)
    B:    sine    (bits 5:3)
    out:  (A × B) >> 8

Sources 0..=5 pick a waveform channel; 6 and 7 pick the mixer output, so a
waveform can be ring-modulated with the whole mix ("post-mixer"). With the
enable bit (6) clear the stage passes the mixer output through.


Use Case 2: Amplitude Shaping
-----------------------------

The second and third inputs are control signals: the envelope and the
master amplitude register.

    out = (signal × env' × master') >> 16

where env' and master' use the mixer's gain remap so 0xFF is exact unity.
A full envelope at full master amplitude leaves the signal untouched.
*/

const SOURCE_MASK: u8 = 0b111;
const SOURCE_B_SHIFT: u8 = 3;
const ENABLE_BIT: u8 = 0b0100_0000;

/// Decoded ring-modulator configuration register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingModConfig {
    pub source_a: RingSource,
    pub source_b: RingSource,
    pub enabled: bool,
}

/// Where a ring-modulator input is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingSource {
    Channel(Waveform),
    Mixer,
}

impl RingSource {
    fn decode(field: u8) -> Self {
        match Waveform::from_index(field & SOURCE_MASK) {
            Some(waveform) => RingSource::Channel(waveform),
            None => RingSource::Mixer,
        }
    }

    #[inline]
    fn pick(self, channels: &Channels, mixed: u8) -> u8 {
        match self {
            RingSource::Channel(waveform) => channels[waveform.index()],
            RingSource::Mixer => mixed,
        }
    }
}

impl RingModConfig {
    pub fn from_register(value: u8) -> Self {
        Self {
            source_a: RingSource::decode(value),
            source_b: RingSource::decode(value >> SOURCE_B_SHIFT),
            enabled: value & ENABLE_BIT != 0,
        }
    }
}

/// 8 × 8 → 8 bit product.
#[inline]
pub fn ring(a: u8, b: u8) -> u8 {
    ((a as u16 * b as u16) >> 8) as u8
}

/// Apply the ring modulator to the mixer output.
#[inline]
pub fn ring_modulate(config: &RingModConfig, channels: &Channels, mixed: u8) -> u8 {
    if !config.enabled {
        return mixed;
    }
    ring(
        config.source_a.pick(channels, mixed),
        config.source_b.pick(channels, mixed),
    )
}

/// Scale a signal by the envelope and the master amplitude.
#[inline]
pub fn shape_amplitude(signal: u8, envelope: u8, master: u8) -> u8 {
    ((signal as u32 * unity_gain(envelope) * unity_gain(master)) >> 16) as u8
}
