//! Programmable single-cycle wavetable with linear interpolation.
//!
//! The table holds `LEN` 8-bit samples (a power of two). The top
//! `log2(LEN)` phase bits pick a sample, the next 12 bits blend toward the
//! following sample, wrapping at the end of the table.
//!
//! Writes arrive through the register file: an index register, a data
//! port that stores at the index (optionally post-incrementing it) and a
//! control register with the auto-increment enable and an index-reset
//! strobe.

use crate::dsp::phase::PHASE_MASK;

/// Fractional bits used for interpolation.
const BLEND_BITS: u32 = 12;

/// One cycle of a sine, 128 ± 127.
pub const DEFAULT_TABLE: [u8; 64] = [
    128, 140, 153, 165, 177, 188, 199, 209, 218, 226, 234, 240, 245, 250, 253, 254, 255, 254, 253,
    250, 245, 240, 234, 226, 218, 209, 199, 188, 177, 165, 153, 140, 128, 116, 103, 91, 79, 68, 57,
    47, 38, 30, 22, 16, 11, 6, 3, 2, 1, 2, 3, 6, 11, 16, 22, 30, 38, 47, 57, 68, 79, 91, 103, 116,
];

/// A register write aimed at the wavetable memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavetableWrite {
    Index(u8),
    Data(u8),
    Control {
        auto_increment: bool,
        reset_index: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Wavetable<const LEN: usize = 64> {
    samples: [u8; LEN],
    index: usize,
    auto_increment: bool,
}

impl<const LEN: usize> Wavetable<LEN> {
    const VALID: () = assert!(
        LEN >= 2 && LEN.is_power_of_two() && LEN <= 4096,
        "wavetable length must be a power of two between 2 and 4096"
    );
    const INDEX_BITS: u32 = LEN.trailing_zeros();

    /// A table filled by resampling the default sine cycle.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID;
        let mut samples = [0u8; LEN];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = DEFAULT_TABLE[i * DEFAULT_TABLE.len() / LEN];
        }
        Self {
            samples,
            index: 0,
            auto_increment: false,
        }
    }

    pub fn from_samples(samples: [u8; LEN]) -> Self {
        #[allow(clippy::let_unit_value)]
        let _ = Self::VALID;
        Self {
            samples,
            index: 0,
            auto_increment: false,
        }
    }

    /// Interpolated sample at a 24-bit phase.
    #[inline]
    pub fn sample(&self, phase: u32) -> u8 {
        let phase = phase & PHASE_MASK;
        let index = (phase >> (24 - Self::INDEX_BITS)) as usize;
        let blend = ((phase << Self::INDEX_BITS) & PHASE_MASK) >> (24 - BLEND_BITS);

        let a = self.samples[index] as i32;
        let b = self.samples[(index + 1) & (LEN - 1)] as i32;
        (a + (((b - a) * blend as i32) >> BLEND_BITS)) as u8
    }

    pub fn set_index(&mut self, index: u8) {
        self.index = index as usize & (LEN - 1);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset_index(&mut self) {
        self.index = 0;
    }

    pub fn set_auto_increment(&mut self, enabled: bool) {
        self.auto_increment = enabled;
    }

    /// Store at the current index, then advance it if auto-increment is on.
    pub fn write_data(&mut self, value: u8) {
        self.samples[self.index] = value;
        if self.auto_increment {
            self.index = (self.index + 1) & (LEN - 1);
        }
    }

    pub fn apply(&mut self, write: WavetableWrite) {
        match write {
            WavetableWrite::Index(index) => self.set_index(index),
            WavetableWrite::Data(value) => self.write_data(value),
            WavetableWrite::Control {
                auto_increment,
                reset_index,
            } => {
                self.set_auto_increment(auto_increment);
                if reset_index {
                    self.reset_index();
                }
            }
        }
    }

    pub fn samples(&self) -> &[u8; LEN] {
        &self.samples
    }

    /// Restore default contents and addressing.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl<const LEN: usize> Default for Wavetable<LEN> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_samples_at_entry_boundaries() {
        let table = Wavetable::<64>::new();
        for i in 0..64u32 {
            assert_eq!(table.sample(i << 18), DEFAULT_TABLE[i as usize]);
        }
    }

    #[test]
    fn interpolates_halfway() {
        let mut samples = [0u8; 8];
        samples[1] = 200;
        let table = Wavetable::<8>::from_samples(samples);
        // Entry 0 spans phase 0..0x20_0000; halfway is 0x10_0000.
        assert_eq!(table.sample(0x10_0000), 100);
    }

    #[test]
    fn interpolation_stays_between_neighbours() {
        let table = Wavetable::<64>::new();
        for phase in (0..(1u32 << 24)).step_by(997) {
            let index = (phase >> 18) as usize;
            let a = DEFAULT_TABLE[index];
            let b = DEFAULT_TABLE[(index + 1) % 64];
            let s = table.sample(phase);
            assert!(s >= a.min(b) && s <= a.max(b), "phase {phase:#x}: {s} outside {a}..{b}");
        }
    }

    #[test]
    fn last_entry_wraps_to_first() {
        let mut samples = [0u8; 8];
        samples[7] = 100;
        samples[0] = 0;
        let table = Wavetable::<8>::from_samples(samples);
        let halfway_past_last = (7 << 21) | (1 << 20);
        assert_eq!(table.sample(halfway_past_last), 50);
    }

    #[test]
    fn auto_increment_walks_and_wraps() {
        let mut table = Wavetable::<8>::new();
        table.set_auto_increment(true);
        table.set_index(6);
        for value in [10, 20, 30] {
            table.write_data(value);
        }
        assert_eq!(table.samples()[6], 10);
        assert_eq!(table.samples()[7], 20);
        assert_eq!(table.samples()[0], 30);
        assert_eq!(table.index(), 1);
    }

    #[test]
    fn control_write_resets_index_and_sets_mode() {
        let mut table = Wavetable::<64>::new();
        table.apply(WavetableWrite::Index(9));
        table.apply(WavetableWrite::Control {
            auto_increment: true,
            reset_index: true,
        });
        assert_eq!(table.index(), 0);
        table.apply(WavetableWrite::Data(1));
        table.apply(WavetableWrite::Data(2));
        assert_eq!(&table.samples()[..2], &[1, 2]);
        assert_eq!(table.index(), 2);
    }

    #[test]
    fn index_is_masked_to_table_size() {
        let mut table = Wavetable::<64>::new();
        table.set_index(0xFF);
        assert_eq!(table.index(), 63);
    }
}
