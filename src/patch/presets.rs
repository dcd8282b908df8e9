//! Built-in patches.
//!
//! Every preset leaves the oscillator enabled and the gate low, so loading
//! one is silent until a note is gated. Pitches are given for the reference
//! tick rate at which 0x02_4000 is A4.

use super::Patch;
use crate::dsp::wavetable::DEFAULT_TABLE;
use crate::registers::map::{self, control};

const A4: u32 = 0x02_4000;
const A2: u32 = A4 >> 2;

/// All presets, in menu order.
pub fn presets() -> Vec<Patch> {
    vec![init(), saw_lead(), pwm_bass(), ring_bell(), wavetable_pad()]
}

/// Every register at its reset value, oscillator on.
pub fn init() -> Patch {
    base("init").description("Plain sawtooth, no filter")
}

fn base(name: &str) -> Patch {
    Patch::new(name)
        .set(map::CONTROL, control::OSC_ENABLE)
        .set(map::WAVE_SELECT, 0x3F)
        .frequency(A4)
        .set(map::DUTY, 0x80)
        .set(map::PHASE_OFFSET, 0x00)
        .set(map::ATTACK, 0x00)
        .set(map::DECAY, 0x00)
        .set(map::SUSTAIN, 0xC0)
        .set(map::RELEASE, 0x00)
        .set(map::MASTER_AMP, 0xFF)
        .set(map::FILTER_ENABLE, 0x00)
        .set(map::MOD_ROUTING, 0x00)
        .set(map::BYPASS, 0x00)
        .set(map::GAIN_SQUARE, 0x00)
        .set(map::GAIN_SAWTOOTH, 0xFF)
        .set(map::GAIN_TRIANGLE, 0x00)
        .set(map::GAIN_SINE, 0x00)
        .set(map::GAIN_NOISE, 0x00)
        .set(map::GAIN_WAVETABLE, 0x00)
        .set(map::GLIDE_RATE, 0x00)
        .set(map::PWM_DEPTH, 0x00)
        .set(map::RING_MOD, 0x00)
}

/// Bright sawtooth through a resonant low-pass that opens with the
/// envelope, with a little glide.
pub fn saw_lead() -> Patch {
    base("saw_lead")
        .description("Resonant sawtooth lead with envelope-swept cutoff")
        .set(map::ATTACK, 0x00)
        .set(map::DECAY, 0x02)
        .set(map::SUSTAIN, 0xA0)
        .set(map::RELEASE, 0x02)
        .set(map::SVF1_CUTOFF, 0x90)
        .set(map::SVF1_RESONANCE, 0xB0)
        .set(map::FILTER_MODE, 0x00)
        .set(map::FILTER_ENABLE, 0x01)
        .set(map::MOD_ROUTING, 0b001)
        .set(map::MOD_CUTOFF_DEPTH, 0x50)
        .set(map::GLIDE_RATE, 0x04)
}

/// Pulse-width-modulated square, four-pole low-pass.
pub fn pwm_bass() -> Patch {
    base("pwm_bass")
        .description("Four-pole PWM bass")
        .frequency(A2)
        .set(map::DUTY, 0x60)
        .set(map::DECAY, 0x03)
        .set(map::SUSTAIN, 0x80)
        .set(map::RELEASE, 0x01)
        .set(map::GAIN_SAWTOOTH, 0x00)
        .set(map::GAIN_SQUARE, 0xFF)
        .set(map::PWM_DEPTH, 0x90)
        .set(map::SVF1_CUTOFF, 0x70)
        .set(map::SVF1_RESONANCE, 0x40)
        .set(map::SVF2_CUTOFF, 0x70)
        .set(map::SVF2_RESONANCE, 0x20)
        .set(map::FILTER_MODE, 0b100)
        .set(map::FILTER_ENABLE, 0x01)
}

/// Square ring-modulated with sine: inharmonic, bell-like.
pub fn ring_bell() -> Patch {
    base("ring_bell")
        .description("Square x sine ring modulation with a long release")
        .set(map::DECAY, 0x10)
        .set(map::SUSTAIN, 0x00)
        .set(map::RELEASE, 0x10)
        .set(map::GAIN_SAWTOOTH, 0x00)
        .set(map::GAIN_SINE, 0xFF)
        // A = square, B = sine, enabled.
        .set(map::RING_MOD, 0x40 | (3 << 3))
        .set(map::MOD_ROUTING, 0b100)
        .set(map::MOD_PITCH_DEPTH, 0x10)
}

/// Soft wavetable pad with a slow looping envelope.
pub fn wavetable_pad() -> Patch {
    let mut table = DEFAULT_TABLE;
    // Fold in the second harmonic for a hollower tone.
    for (i, sample) in table.iter_mut().enumerate() {
        let harmonic = DEFAULT_TABLE[(i * 2) % DEFAULT_TABLE.len()];
        *sample = ((*sample as u16 + harmonic as u16) / 2) as u8;
    }

    base("wavetable_pad")
        .description("Looping wavetable pad through a band-pass")
        .set(map::CONTROL, control::OSC_ENABLE | control::ENVELOPE_LOOP)
        .set(map::ATTACK, 0x08)
        .set(map::DECAY, 0x08)
        .set(map::SUSTAIN, 0x90)
        .set(map::RELEASE, 0x10)
        .set(map::GAIN_SAWTOOTH, 0x00)
        .set(map::GAIN_WAVETABLE, 0xFF)
        .set(map::SVF1_CUTOFF, 0xB0)
        .set(map::SVF1_RESONANCE, 0x30)
        .set(map::FILTER_MODE, 0b010)
        .set(map::FILTER_ENABLE, 0x01)
        .wavetable(table.to_vec())
}
