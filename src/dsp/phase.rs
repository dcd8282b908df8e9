//! 24-bit phase accumulator.

/*
Direct Digital Synthesis
========================

A DDS oscillator is a counter that adds a fixed increment (the frequency
word) every tick and lets the sum wrap. The wrap IS the oscillation: the
counter sweeps 0 → 2^24 once per cycle, and every waveform generator is a
function of where in that sweep we are.

    cycles per tick = frequency_word / 2^24

    frequency_word = 0x024000  →  147456 / 16777216 ≈ 0.008789
                                  period ≈ 113.78 ticks

Only the top bits are used to look up waveforms, so the low bits act as a
fractional accumulator and the long-run frequency is exact even when the
period is not an integer number of ticks.
*/

/// Phase mask: the accumulator is 24 bits wide.
pub const PHASE_MASK: u32 = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseAccumulator {
    phase: u32,
}

impl PhaseAccumulator {
    pub fn new() -> Self {
        Self { phase: 0 }
    }

    /// Advance by `freq` when enabled, hold otherwise. Returns the new phase.
    #[inline]
    pub fn advance(&mut self, enabled: bool, freq: u32) -> u32 {
        if enabled {
            self.phase = self.phase.wrapping_add(freq & PHASE_MASK) & PHASE_MASK;
        }
        self.phase
    }

    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn reset(&mut self) {
        self.phase = 0;
    }
}

/// Rotate a phase by an 8-bit offset applied to bits 23:16.
#[inline]
pub fn with_offset(phase: u32, offset: u8) -> u32 {
    phase.wrapping_add((offset as u32) << 16) & PHASE_MASK
}
