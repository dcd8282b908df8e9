//! The configuration register file.
//!
//! A [`RegisterBank`] stores every read/write register, applies masks on
//! write and serves reads with the access rules of the map. It knows
//! nothing about time: the synth owns one copy that the tick pipeline reads
//! from, and the protocol engine owns a shadow copy for host read-back.
//!
//! Writes to the wavetable ports do not land in the bank. They come back to
//! the caller as a [`WavetableWrite`] for whoever owns the table memory.

pub mod map;

use crate::dsp::{
    amplify::RingModConfig,
    bypass::Bypass,
    envelope::EnvelopeParams,
    filter::FilterSettings,
    modulate::ModulationRoutes,
    oscillator::CHANNELS,
    wavetable::WavetableWrite,
};
use map::{control, wt_control, Access, REGISTERS, REGISTER_COUNT, UNDEFINED_READ};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBank {
    values: [u8; REGISTER_COUNT],
}

impl RegisterBank {
    /// A bank holding every register's reset value.
    pub fn new() -> Self {
        let mut values = [0u8; REGISTER_COUNT];
        for register in &REGISTERS {
            values[register.address as usize] = register.default;
        }
        Self { values }
    }

    /// Apply a write with the map's masking and access rules.
    ///
    /// Undefined and read-only addresses ignore the write. The wavetable
    /// ports return the write for the table owner to apply.
    pub fn write(&mut self, address: u8, value: u8) -> Option<WavetableWrite> {
        let register = map::info(address)?;

        match address {
            map::WT_INDEX => return Some(WavetableWrite::Index(value)),
            map::WT_DATA => return Some(WavetableWrite::Data(value)),
            map::WT_CONTROL => {
                self.values[address as usize] = value & register.mask;
                return Some(WavetableWrite::Control {
                    auto_increment: value & wt_control::AUTO_INCREMENT != 0,
                    reset_index: value & wt_control::INDEX_RESET != 0,
                });
            }
            _ => {}
        }

        if register.access == Access::ReadWrite {
            self.values[address as usize] = value & register.mask;
        }
        None
    }

    /// Read with the map's access rules. Write-only registers read 0x00,
    /// undefined addresses 0xFF. The status register reads 0x00 here; its
    /// live value is published by the tick pipeline, not stored.
    pub fn read(&self, address: u8) -> u8 {
        match map::info(address) {
            None => UNDEFINED_READ,
            Some(register) => match register.access {
                Access::ReadWrite => self.values[address as usize],
                Access::ReadOnly | Access::WriteOnly => 0x00,
            },
        }
    }

    /// Restore every register to its reset value.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[inline]
    fn get(&self, address: u8) -> u8 {
        self.values[address as usize]
    }

    #[inline]
    fn control_bit(&self, bit: u8) -> bool {
        self.get(map::CONTROL) & bit != 0
    }

    pub fn oscillator_enabled(&self) -> bool {
        self.control_bit(control::OSC_ENABLE)
    }

    pub fn stream_mode(&self) -> bool {
        self.control_bit(control::STREAM_MODE)
    }

    pub fn soft_gate(&self) -> bool {
        self.control_bit(control::SOFT_GATE)
    }

    pub fn soft_reset(&self) -> bool {
        self.control_bit(control::SOFT_RESET)
    }

    pub fn envelope_loop(&self) -> bool {
        self.control_bit(control::ENVELOPE_LOOP)
    }

    pub fn wave_select(&self) -> u8 {
        self.get(map::WAVE_SELECT)
    }

    /// The 24-bit frequency word, little-endian across three registers.
    pub fn frequency(&self) -> u32 {
        u32::from_le_bytes([
            self.get(map::FREQ_L),
            self.get(map::FREQ_M),
            self.get(map::FREQ_H),
            0,
        ])
    }

    pub fn duty(&self) -> u8 {
        self.get(map::DUTY)
    }

    pub fn phase_offset(&self) -> u8 {
        self.get(map::PHASE_OFFSET)
    }

    pub fn envelope_params(&self) -> EnvelopeParams {
        EnvelopeParams {
            attack: self.get(map::ATTACK),
            decay: self.get(map::DECAY),
            sustain: self.get(map::SUSTAIN),
            release: self.get(map::RELEASE),
            looping: self.envelope_loop(),
        }
    }

    pub fn master_amplitude(&self) -> u8 {
        self.get(map::MASTER_AMP)
    }

    /// Filter settings before any envelope modulation of cutoff/resonance.
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            enabled: self.get(map::FILTER_ENABLE) & 0x01 != 0,
            sections: [
                (self.get(map::SVF1_CUTOFF), self.get(map::SVF1_RESONANCE)),
                (self.get(map::SVF2_CUTOFF), self.get(map::SVF2_RESONANCE)),
            ],
            ..FilterSettings::default()
        }
        .with_mode(self.get(map::FILTER_MODE))
    }

    pub fn modulation_routes(&self) -> ModulationRoutes {
        ModulationRoutes {
            enable: self.get(map::MOD_ROUTING),
            cutoff_depth: self.get(map::MOD_CUTOFF_DEPTH),
            resonance_depth: self.get(map::MOD_RESONANCE_DEPTH),
            pitch_depth: self.get(map::MOD_PITCH_DEPTH),
        }
    }

    pub fn bypass(&self) -> Bypass {
        Bypass::from_register(self.get(map::BYPASS))
    }

    pub fn gains(&self) -> [u8; CHANNELS] {
        let start = map::GAIN_SQUARE as usize;
        let mut gains = [0u8; CHANNELS];
        gains.copy_from_slice(&self.values[start..start + CHANNELS]);
        gains
    }

    pub fn glide_rate(&self) -> u8 {
        self.get(map::GLIDE_RATE)
    }

    pub fn pwm_depth(&self) -> u8 {
        self.get(map::PWM_DEPTH)
    }

    pub fn ring_mod(&self) -> RingModConfig {
        RingModConfig::from_register(self.get(map::RING_MOD))
    }

    pub fn stream_sample(&self) -> u8 {
        self.get(map::STREAM_SAMPLE)
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}
