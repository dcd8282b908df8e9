//! Register addresses, access rules, masks and reset values.

pub const CONTROL: u8 = 0x00;
pub const WAVE_SELECT: u8 = 0x01;
pub const FREQ_L: u8 = 0x02;
pub const FREQ_M: u8 = 0x03;
pub const FREQ_H: u8 = 0x04;
pub const DUTY: u8 = 0x05;
pub const PHASE_OFFSET: u8 = 0x06;
pub const ATTACK: u8 = 0x07;
pub const DECAY: u8 = 0x08;
pub const SUSTAIN: u8 = 0x09;
pub const RELEASE: u8 = 0x0A;
pub const MASTER_AMP: u8 = 0x0B;
pub const SVF1_CUTOFF: u8 = 0x0C;
pub const SVF1_RESONANCE: u8 = 0x0D;
pub const SVF2_CUTOFF: u8 = 0x0E;
pub const SVF2_RESONANCE: u8 = 0x0F;
pub const FILTER_MODE: u8 = 0x10;
pub const FILTER_ENABLE: u8 = 0x11;
pub const STATUS: u8 = 0x12;
pub const WT_INDEX: u8 = 0x13;
pub const WT_DATA: u8 = 0x14;
pub const WT_CONTROL: u8 = 0x15;
pub const MOD_ROUTING: u8 = 0x16;
pub const MOD_CUTOFF_DEPTH: u8 = 0x17;
pub const MOD_RESONANCE_DEPTH: u8 = 0x18;
pub const MOD_PITCH_DEPTH: u8 = 0x19;
pub const BYPASS: u8 = 0x1A;
pub const GAIN_SQUARE: u8 = 0x1B;
pub const GAIN_SAWTOOTH: u8 = 0x1C;
pub const GAIN_TRIANGLE: u8 = 0x1D;
pub const GAIN_SINE: u8 = 0x1E;
pub const GAIN_NOISE: u8 = 0x1F;
pub const GAIN_WAVETABLE: u8 = 0x20;
pub const GLIDE_RATE: u8 = 0x21;
pub const PWM_DEPTH: u8 = 0x22;
pub const RING_MOD: u8 = 0x23;
/// Sample played in stream mode. Sits one past the ring-modulator
/// register, so the map runs to 0x24 and 0x25 is the first undefined address.
pub const STREAM_SAMPLE: u8 = 0x24;

/// Number of defined addresses. Everything at or above reads 0xFF.
pub const REGISTER_COUNT: usize = 0x25;

/// Value read back from an address that is not in the map.
pub const UNDEFINED_READ: u8 = 0xFF;

/// Control register bits.
pub mod control {
    pub const OSC_ENABLE: u8 = 0b0_0001;
    pub const STREAM_MODE: u8 = 0b0_0010;
    pub const SOFT_GATE: u8 = 0b0_0100;
    pub const SOFT_RESET: u8 = 0b0_1000;
    pub const ENVELOPE_LOOP: u8 = 0b1_0000;
}

/// Status register layout.
pub mod status {
    pub const GATE: u8 = 0b0_0001;
    pub const STAGE_SHIFT: u8 = 1;
    pub const STAGE_MASK: u8 = 0b0_1110;
    pub const OSC_RUNNING: u8 = 0b1_0000;
}

/// Wavetable control register bits.
pub mod wt_control {
    pub const AUTO_INCREMENT: u8 = 0b01;
    /// Strobe: acted on when written, never stored.
    pub const INDEX_RESET: u8 = 0b10;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterInfo {
    pub address: u8,
    pub name: &'static str,
    pub access: Access,
    /// Bits that are stored. Reserved bits read back as zero.
    pub mask: u8,
    pub default: u8,
}

const fn rw(address: u8, name: &'static str, mask: u8, default: u8) -> RegisterInfo {
    RegisterInfo {
        address,
        name,
        access: Access::ReadWrite,
        mask,
        default,
    }
}

const fn wo(address: u8, name: &'static str) -> RegisterInfo {
    RegisterInfo {
        address,
        name,
        access: Access::WriteOnly,
        mask: 0xFF,
        default: 0,
    }
}

pub const REGISTERS: [RegisterInfo; REGISTER_COUNT] = [
    rw(CONTROL, "CONTROL", 0x1F, 0x00),
    rw(WAVE_SELECT, "WAVE_SELECT", 0x3F, 0x3F),
    rw(FREQ_L, "FREQ_L", 0xFF, 0x00),
    rw(FREQ_M, "FREQ_M", 0xFF, 0x00),
    rw(FREQ_H, "FREQ_H", 0xFF, 0x00),
    rw(DUTY, "DUTY", 0xFF, 0x80),
    rw(PHASE_OFFSET, "PHASE_OFFSET", 0xFF, 0x00),
    rw(ATTACK, "ATTACK", 0xFF, 0x00),
    rw(DECAY, "DECAY", 0xFF, 0x00),
    rw(SUSTAIN, "SUSTAIN", 0xFF, 0xC0),
    rw(RELEASE, "RELEASE", 0xFF, 0x00),
    rw(MASTER_AMP, "MASTER_AMP", 0xFF, 0xFF),
    rw(SVF1_CUTOFF, "SVF1_CUTOFF", 0xFF, 0xFF),
    rw(SVF1_RESONANCE, "SVF1_RESONANCE", 0xFF, 0x00),
    rw(SVF2_CUTOFF, "SVF2_CUTOFF", 0xFF, 0xFF),
    rw(SVF2_RESONANCE, "SVF2_RESONANCE", 0xFF, 0x00),
    rw(FILTER_MODE, "FILTER_MODE", 0x07, 0x00),
    rw(FILTER_ENABLE, "FILTER_ENABLE", 0x01, 0x00),
    RegisterInfo {
        address: STATUS,
        name: "STATUS",
        access: Access::ReadOnly,
        mask: 0x1F,
        default: 0x00,
    },
    wo(WT_INDEX, "WT_INDEX"),
    wo(WT_DATA, "WT_DATA"),
    rw(WT_CONTROL, "WT_CONTROL", 0x01, 0x00),
    rw(MOD_ROUTING, "MOD_ROUTING", 0x07, 0x00),
    rw(MOD_CUTOFF_DEPTH, "MOD_CUTOFF_DEPTH", 0xFF, 0x00),
    rw(MOD_RESONANCE_DEPTH, "MOD_RESONANCE_DEPTH", 0xFF, 0x00),
    rw(MOD_PITCH_DEPTH, "MOD_PITCH_DEPTH", 0xFF, 0x00),
    rw(BYPASS, "BYPASS", 0x0F, 0x00),
    rw(GAIN_SQUARE, "GAIN_SQUARE", 0xFF, 0x00),
    rw(GAIN_SAWTOOTH, "GAIN_SAWTOOTH", 0xFF, 0xFF),
    rw(GAIN_TRIANGLE, "GAIN_TRIANGLE", 0xFF, 0x00),
    rw(GAIN_SINE, "GAIN_SINE", 0xFF, 0x00),
    rw(GAIN_NOISE, "GAIN_NOISE", 0xFF, 0x00),
    rw(GAIN_WAVETABLE, "GAIN_WAVETABLE", 0xFF, 0x00),
    rw(GLIDE_RATE, "GLIDE_RATE", 0xFF, 0x00),
    rw(PWM_DEPTH, "PWM_DEPTH", 0xFF, 0x00),
    rw(RING_MOD, "RING_MOD", 0x7F, 0x00),
    rw(STREAM_SAMPLE, "STREAM_SAMPLE", 0xFF, 0x80),
];

/// Map entry for `address`, or `None` if the address is undefined.
#[inline]
pub fn info(address: u8) -> Option<&'static RegisterInfo> {
    REGISTERS.get(address as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_address() {
        for (i, register) in REGISTERS.iter().enumerate() {
            assert_eq!(register.address as usize, i, "{}", register.name);
        }
    }

    #[test]
    fn defaults_fit_their_masks() {
        for register in &REGISTERS {
            assert_eq!(register.default & !register.mask, 0, "{}", register.name);
        }
    }

    #[test]
    fn undefined_addresses_have_no_entry() {
        assert!(info(0x24).is_some());
        assert!(info(0x25).is_none());
        assert!(info(0xFF).is_none());
    }

    #[test]
    fn stream_sample_is_the_last_register() {
        let register = info(STREAM_SAMPLE).unwrap();
        assert_eq!(register.access, Access::ReadWrite);
        assert_eq!(register.default, 0x80);
        assert_eq!(REGISTERS.last().map(|r| r.address), Some(STREAM_SAMPLE));
        assert_eq!(STREAM_SAMPLE as usize + 1, REGISTER_COUNT);
    }
}
