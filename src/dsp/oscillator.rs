#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::wavetable::Wavetable;

/*
Waveform Bank
=============

Six generators read the same 24-bit phase. All of them are pure functions
of that phase except the noise channel, which owns a shift register, and
the wavetable channel, which reads programmable memory.

Vocabulary
----------

  p           Phase bits 23:16, i.e. where in the cycle we are, 0..=255.

  duty        Square-wave threshold. Output is high while p < duty, so
              0x80 is a 50% pulse and 0x00 is silence.

  fold        Mirroring one half of a cycle onto the other. The triangle
              folds on the MSB of p; the sine folds its parabola on the
              sign bit of a 12-bit phase.


Shapes (p on the x axis, output on the y axis)
-----------------------------------------------

  square      ▔▔▔▔▁▁▁▁     high while p < duty
  sawtooth    ╱╱╱╱         output = p
  triangle    ╱╲╱╲         rising half doubles p, falling half doubles !p
  sine        ∿            parabola 4x(1-x) per half cycle, mirrored
  noise       ▚▞▚▞         top byte of a 32-bit maximal-length LFSR
  wavetable   user         64 samples, linearly interpolated


Parabolic Sine
--------------

Over one half cycle, x ∈ [0, 1):

    sin(πx) ≈ 4x(1 − x)

The worst-case deviation is about 0.056 of the peak, which is 2.8% of the
full 0..255 output span. With 11 bits of x in fixed point:

    y = x(2048 − x) >> 13        y ∈ [0, 128]

The positive half adds y to mid-scale (clipped at 255), the negative half
subtracts it.


Noise
-----

A Fibonacci LFSR with taps 31, 21, 1 and 0 has period 2^32 − 1. The only
state outside that cycle is zero, and zero maps to itself, so as long as we
never load zero we can never reach it.
*/

/// Number of waveform channels feeding the mixer.
pub const CHANNELS: usize = 6;

/// Default noise seed.
pub const LFSR_SEED: u32 = 0x0000_ACE1;

/// One sample from every generator, indexed by [`Waveform`].
pub type Channels = [u8; CHANNELS];

/// Channel order used by the mixer gains, waveform select bits and
/// ring-modulator source fields.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Waveform {
    Square = 0,
    Sawtooth = 1,
    Triangle = 2,
    Sine = 3,
    Noise = 4,
    Wavetable = 5,
}

impl Waveform {
    pub const ALL: [Waveform; CHANNELS] = [
        Waveform::Square,
        Waveform::Sawtooth,
        Waveform::Triangle,
        Waveform::Sine,
        Waveform::Noise,
        Waveform::Wavetable,
    ];

    /// Decode a 3-bit channel field. Values past the last channel have no
    /// waveform and are handled by the caller.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

#[inline]
fn high_byte(phase: u32) -> u8 {
    (phase >> 16) as u8
}

#[inline]
pub fn square(phase: u32, duty: u8) -> u8 {
    if high_byte(phase) < duty {
        0xFF
    } else {
        0x00
    }
}

#[inline]
pub fn sawtooth(phase: u32) -> u8 {
    high_byte(phase)
}

#[inline]
pub fn triangle(phase: u32) -> u8 {
    let p = high_byte(phase);
    if p & 0x80 == 0 {
        p << 1
    } else {
        (!p) << 1
    }
}

#[inline]
pub fn sine(phase: u32) -> u8 {
    let p12 = (phase >> 12) & 0x0FFF;
    let x = p12 & 0x07FF;
    let y = (x * (2048 - x)) >> 13;

    if p12 & 0x0800 == 0 {
        (128 + y.min(127)) as u8
    } else {
        (128 - y) as u8
    }
}

/// 32-bit maximal-length shift register.
#[derive(Debug, Clone, Copy)]
pub struct Lfsr {
    state: u32,
}

impl Lfsr {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { LFSR_SEED } else { seed },
        }
    }

    #[inline]
    pub fn clock(&mut self) {
        let s = self.state;
        let feedback = ((s >> 31) ^ (s >> 21) ^ (s >> 1) ^ s) & 1;
        self.state = (s << 1) | feedback;
        debug_assert_ne!(self.state, 0, "LFSR reached the all-zero state");
    }

    #[inline]
    pub fn output(&self) -> u8 {
        (self.state >> 24) as u8
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
    }
}

/// All six generators plus the state two of them need.
#[derive(Debug, Clone)]
pub struct WaveformBank {
    lfsr: Lfsr,
    seed: u32,
    wavetable: Wavetable,
}

impl WaveformBank {
    pub fn new(seed: u32) -> Self {
        let lfsr = Lfsr::new(seed);
        Self {
            seed: lfsr.state(),
            lfsr,
            wavetable: Wavetable::new(),
        }
    }

    /// Compute every channel for `phase`. The noise register advances only
    /// when `running` is set, so a stopped oscillator outputs a constant.
    #[inline]
    pub fn render(&mut self, phase: u32, duty: u8, running: bool) -> Channels {
        if running {
            self.lfsr.clock();
        }

        [
            square(phase, duty),
            sawtooth(phase),
            triangle(phase),
            sine(phase),
            self.lfsr.output(),
            self.wavetable.sample(phase),
        ]
    }

    pub fn wavetable(&self) -> &Wavetable {
        &self.wavetable
    }

    pub fn wavetable_mut(&mut self) -> &mut Wavetable {
        &mut self.wavetable
    }

    pub fn lfsr(&self) -> &Lfsr {
        &self.lfsr
    }

    /// Reset running state. The wavetable is configuration and survives.
    pub fn reset(&mut self) {
        self.lfsr.reseed(self.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    fn phase_of(p: u8) -> u32 {
        (p as u32) << 16
    }

    #[test]
    fn square_follows_duty() {
        assert_eq!(square(phase_of(0x7F), 0x80), 0xFF);
        assert_eq!(square(phase_of(0x80), 0x80), 0x00);
        assert_eq!(square(phase_of(0x00), 0x00), 0x00, "zero duty is silent");
    }

    #[test]
    fn sawtooth_is_phase_high_byte() {
        for p in 0..=255u8 {
            assert_eq!(sawtooth(phase_of(p)), p);
        }
    }

    #[test]
    fn triangle_folds_on_msb() {
        assert_eq!(triangle(phase_of(0x00)), 0x00);
        assert_eq!(triangle(phase_of(0x40)), 0x80);
        assert_eq!(triangle(phase_of(0x7F)), 0xFE);
        assert_eq!(triangle(phase_of(0x80)), 0xFE);
        assert_eq!(triangle(phase_of(0xFF)), 0x00);
    }

    #[test]
    fn sine_tracks_reference_within_three_percent() {
        let tolerance = 0.03 * 256.0 + 1.0;
        for step in 0..4096u32 {
            let phase = step << 12;
            let reference = 127.5 + 127.5 * (TAU * step as f64 / 4096.0).sin();
            let actual = sine(phase) as f64;
            assert!(
                (actual - reference).abs() <= tolerance,
                "phase step {step}: expected ~{reference:.1}, got {actual}"
            );
        }
    }

    #[test]
    fn sine_hits_extremes() {
        assert_eq!(sine(0x40_0000), 255);
        assert_eq!(sine(0xC0_0000), 0);
        assert_eq!(sine(0), 128);
    }

    #[test]
    fn lfsr_never_reaches_zero() {
        let mut lfsr = Lfsr::new(1);
        for _ in 0..1_000_000 {
            lfsr.clock();
            assert_ne!(lfsr.state(), 0);
        }
    }

    #[test]
    fn zero_seed_is_replaced() {
        assert_eq!(Lfsr::new(0).state(), LFSR_SEED);
    }

    #[test]
    fn noise_holds_when_stopped() {
        let mut bank = WaveformBank::new(LFSR_SEED);
        let first = bank.render(0, 0x80, false)[Waveform::Noise.index()];
        let second = bank.render(0, 0x80, false)[Waveform::Noise.index()];
        assert_eq!(first, second);
    }

    #[test]
    fn noise_covers_the_output_range() {
        let mut bank = WaveformBank::new(LFSR_SEED);
        let mut seen = [false; 256];
        for _ in 0..100_000 {
            seen[bank.render(0, 0x80, true)[Waveform::Noise.index()] as usize] = true;
        }
        assert!(seen.iter().filter(|&&s| s).count() > 250);
    }
}
