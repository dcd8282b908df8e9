//! Construction-time settings for a [`Synth`](crate::Synth).
//!
//! Everything that can change while the synth runs lives in the register
//! file. This struct only covers the knobs that size buffers or seed state
//! before the first tick.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::oscillator::LFSR_SEED;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthConfig {
    /// Committed transactions that may wait between two ticks.
    pub queue_capacity: usize,
    /// PDM bits averaged into one monitoring sample by `render_block`.
    pub decimation: usize,
    /// Initial noise register. Zero is not a legal LFSR state and is
    /// replaced by the default seed.
    pub lfsr_seed: u32,
}

impl SynthConfig {
    pub fn with_decimation(mut self, decimation: usize) -> Self {
        self.decimation = decimation.max(1);
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_lfsr_seed(mut self, seed: u32) -> Self {
        self.lfsr_seed = seed;
        self
    }

    /// The seed actually loaded into the noise generator.
    pub fn effective_seed(&self) -> u32 {
        if self.lfsr_seed == 0 {
            LFSR_SEED
        } else {
            self.lfsr_seed
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            decimation: 64,
            lfsr_seed: LFSR_SEED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_falls_back_to_default() {
        let config = SynthConfig::default().with_lfsr_seed(0);
        assert_eq!(config.effective_seed(), LFSR_SEED);
    }

    #[test]
    fn builders_clamp_to_one() {
        let config = SynthConfig::default()
            .with_decimation(0)
            .with_queue_capacity(0);
        assert_eq!(config.decimation, 1);
        assert_eq!(config.queue_capacity, 1);
    }
}
