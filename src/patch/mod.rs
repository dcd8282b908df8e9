//! Named register presets.
//!
//! A patch is a list of register writes plus, optionally, a wavetable. It
//! knows how to turn itself into protocol transactions so a host can load
//! it over the wire, or write itself straight into a [`Synth`].

mod presets;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use log::{info, warn};

use crate::protocol::{CommitOutcome, ProtocolEngine, MAX_TRANSACTION_WRITES};
use crate::dsp::phase::PHASE_MASK;
use crate::registers::map::{self, wt_control};
use crate::Synth;

pub use presets::{init, presets, pwm_bass, ring_bell, saw_lead, wavetable_pad};

/// Ticks per second at which the frequency word 0x02_4000 plays A4.
/// 440 × 2^24 / 0x02_4000.
pub const REFERENCE_TICK_RATE: f64 = 50_062.222_222_222_22;

/// Frequency word for `hz` when the synth is ticked `tick_rate` times a
/// second. Saturates at the largest word.
pub fn frequency_word(hz: f64, tick_rate: f64) -> u32 {
    let word = hz / tick_rate * (1u32 << 24) as f64;
    word.round().clamp(0.0, PHASE_MASK as f64) as u32
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub name: String,
    pub description: Option<String>,
    /// (address, value) pairs, applied in order.
    pub registers: Vec<(u8, u8)>,
    /// Samples loaded from index 0 with auto-increment on.
    pub wavetable: Option<Vec<u8>>,
}

/// One protocol transaction: a start address and the data bytes after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Burst {
    pub start: u8,
    pub data: Vec<u8>,
}

impl Patch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            registers: Vec::new(),
            wavetable: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a register. A register that is already in the patch keeps its
    /// place in the list and takes the new value; the wavetable data port
    /// is a stream and always appends.
    pub fn set(mut self, address: u8, value: u8) -> Self {
        let existing = self
            .registers
            .iter_mut()
            .find(|(a, _)| *a == address && address != map::WT_DATA);
        match existing {
            Some(entry) => entry.1 = value,
            None => self.registers.push((address, value)),
        }
        self
    }

    /// Set the 24-bit frequency word.
    pub fn frequency(self, word: u32) -> Self {
        let [l, m, h, _] = word.to_le_bytes();
        self.set(map::FREQ_L, l).set(map::FREQ_M, m).set(map::FREQ_H, h)
    }

    pub fn wavetable(mut self, samples: impl Into<Vec<u8>>) -> Self {
        self.wavetable = Some(samples.into());
        self
    }

    /// Group the patch into as few transactions as the protocol allows.
    ///
    /// Runs of consecutive addresses share one burst. The wavetable, if
    /// any, is loaded by resetting the table index with auto-increment on
    /// and then streaming samples through the data port.
    pub fn bursts(&self) -> Vec<Burst> {
        let mut bursts: Vec<Burst> = Vec::new();

        for &(address, value) in &self.registers {
            match bursts.last_mut() {
                Some(burst)
                    if burst.data.len() < MAX_TRANSACTION_WRITES
                        && burst.start.wrapping_add(burst.data.len() as u8) == address
                        && burst.start != map::WT_DATA =>
                {
                    burst.data.push(value);
                }
                _ => bursts.push(Burst {
                    start: address,
                    data: vec![value],
                }),
            }
        }

        if let Some(samples) = &self.wavetable {
            bursts.push(Burst {
                start: map::WT_CONTROL,
                data: vec![wt_control::AUTO_INCREMENT | wt_control::INDEX_RESET],
            });
            for chunk in samples.chunks(MAX_TRANSACTION_WRITES) {
                bursts.push(Burst {
                    start: map::WT_DATA,
                    data: chunk.to_vec(),
                });
            }
        }

        bursts
    }

    /// Load the patch over the protocol. Stops at the first transaction
    /// that does not commit and returns its outcome.
    pub fn apply(&self, engine: &mut ProtocolEngine) -> Result<usize, CommitOutcome> {
        let mut written = 0;
        for burst in self.bursts() {
            match engine.write_burst(burst.start, &burst.data) {
                CommitOutcome::Committed(n) => written += n,
                outcome => {
                    warn!("patch '{}' partially loaded: {outcome:?}", self.name);
                    return Err(outcome);
                }
            }
        }
        info!("patch '{}' loaded ({written} writes)", self.name);
        Ok(written)
    }

    /// Write the patch straight into a synth.
    pub fn apply_direct(&self, synth: &mut Synth) {
        for burst in self.bursts() {
            let mut address = burst.start;
            for value in burst.data {
                synth.write_register(address, value);
                if address != map::WT_DATA {
                    address = address.wrapping_add(1);
                }
            }
        }
        info!("patch '{}' applied", self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SynthConfig;

    #[test]
    fn consecutive_addresses_share_a_burst() {
        let patch = Patch::new("t")
            .frequency(0x03_0201)
            .set(map::DUTY, 0x40)
            .set(map::SUSTAIN, 0x10);
        let bursts = patch.bursts();
        assert_eq!(
            bursts,
            vec![
                Burst {
                    start: map::FREQ_L,
                    data: vec![1, 2, 3, 0x40]
                },
                Burst {
                    start: map::SUSTAIN,
                    data: vec![0x10]
                },
            ]
        );
    }

    #[test]
    fn reference_pitch() {
        assert_eq!(frequency_word(440.0, REFERENCE_TICK_RATE), 0x02_4000);
        assert_eq!(frequency_word(1.0e9, REFERENCE_TICK_RATE), PHASE_MASK);
    }

    #[test]
    fn set_replaces_earlier_value() {
        let patch = Patch::new("t").set(map::DUTY, 1).set(map::SUSTAIN, 2).set(map::DUTY, 3);
        assert_eq!(patch.registers, vec![(map::DUTY, 3), (map::SUSTAIN, 2)]);
    }

    #[test]
    fn wavetable_is_streamed_through_the_data_port() {
        let patch = Patch::new("t").wavetable(vec![7u8; 200]);
        let bursts = patch.bursts();
        assert_eq!(bursts[0].start, map::WT_CONTROL);
        assert_eq!(bursts[1].start, map::WT_DATA);
        assert_eq!(bursts[1].data.len(), MAX_TRANSACTION_WRITES);
        assert_eq!(bursts[2].data.len(), 200 - MAX_TRANSACTION_WRITES);
    }

    #[test]
    fn apply_direct_matches_register_list() {
        let patch = saw_lead();
        let mut synth = Synth::new(SynthConfig::default());
        patch.apply_direct(&mut synth);
        for &(address, value) in &patch.registers {
            let info = map::info(address).unwrap();
            if info.access == map::Access::ReadWrite {
                assert_eq!(synth.read_register(address), value & info.mask, "{}", info.name);
            }
        }
    }

    #[test]
    fn wavetable_patch_loads_table() {
        let patch = wavetable_pad();
        let mut synth = Synth::new(SynthConfig::default());
        patch.apply_direct(&mut synth);
        let expected = patch.wavetable.as_ref().unwrap();
        assert_eq!(&synth.wavetable().samples()[..], &expected[..]);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn apply_over_protocol_reaches_the_synth() {
        let (mut synth, mut engine) = Synth::with_protocol(SynthConfig::default());
        let patch = ring_bell();
        let written = patch.apply(&mut engine).unwrap();
        assert!(written >= patch.registers.len());
        synth.tick();
        assert_eq!(synth.registers(), engine.shadow());
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn apply_reports_first_failure() {
        let config = SynthConfig::default().with_queue_capacity(1);
        let (_synth, mut engine) = Synth::with_protocol(config);
        let patch = saw_lead();
        assert!(patch.bursts().len() > 1);
        assert_eq!(patch.apply(&mut engine), Err(CommitOutcome::Dropped));
    }
}
