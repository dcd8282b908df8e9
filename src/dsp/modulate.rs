//! Envelope-driven parameter modulation.

use crate::dsp::phase::PHASE_MASK;

/*
Parameter Modulation
====================

The envelope is the only modulation source. It is unipolar (0..=255), but
every route treats it as BIPOLAR around mid-scale so a single depth knob can
push a parameter both ways:

    envelope = 128  →  no change
    envelope = 255  →  +depth
    envelope =   0  →  −depth

Vocabulary
----------

  base          The register value the parameter has with no modulation.

  depth         How far a full-scale envelope moves the parameter.

  route         One enable bit per target in the routing register. A
                disabled route passes the base value through untouched.

  clamping      Every result is saturated to the parameter's legal range.
                Modulation never wraps.


Scaling the Bipolar Offset
--------------------------

`envelope − 128` spans −128..=127, which is not symmetric. Dividing both
sides by 128 would leave +depth unreachable (127/128 of it at most), so the
positive side divides by 127 and the negative side by 128. Both ends then
land exactly on ±depth.


Pitch
-----

Pitch is modulated proportionally: the bipolar offset is a fraction of the
current frequency word (offset / 256), so the same envelope shift gives the
same musical interval at every pitch.

    depth 0xFF, envelope 0xFF  →  freq × (1 + 255/256)  ≈ one octave up
    depth 0xFF, envelope 0x00  →  freq × (1 − 255/256)  ≈ nearly stopped


Pulse-Width Modulation
----------------------

PWM moves the square wave's duty threshold:

    duty' = clamp(duty + (envelope − 128) × pwm_depth / 256, 0, 255)

At full depth the duty swings half a cycle either way.
*/

/// Routing enable bits, as stored in the routing register.
pub const ROUTE_CUTOFF: u8 = 0b001;
pub const ROUTE_RESONANCE: u8 = 0b010;
pub const ROUTE_PITCH: u8 = 0b100;

/// Signed offset in −depth..=depth for an envelope value.
#[inline]
pub fn bipolar(envelope: u8, depth: u8) -> i32 {
    let centered = envelope as i32 - 128;
    if centered >= 0 {
        centered * depth as i32 / 127
    } else {
        centered * depth as i32 / 128
    }
}

/// Modulate an 8-bit parameter such as cutoff or resonance.
#[inline]
pub fn modulate_u8(base: u8, envelope: u8, depth: u8, enabled: bool) -> u8 {
    if !enabled {
        return base;
    }
    (base as i32 + bipolar(envelope, depth)).clamp(0, 255) as u8
}

/// Modulate a 24-bit frequency word.
#[inline]
pub fn modulate_pitch(freq: u32, envelope: u8, depth: u8, enabled: bool) -> u32 {
    if !enabled {
        return freq;
    }
    let freq = (freq & PHASE_MASK) as i64;
    let offset = freq * bipolar(envelope, depth) as i64 / 256;
    (freq + offset).clamp(0, PHASE_MASK as i64) as u32
}

/// Square-wave duty after pulse-width modulation.
#[inline]
pub fn pwm_duty(duty: u8, envelope: u8, pwm_depth: u8) -> u8 {
    let offset = (envelope as i32 - 128) * pwm_depth as i32 / 256;
    (duty as i32 + offset).clamp(0, 255) as u8
}

/// Per-tick modulation settings, read from the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModulationRoutes {
    pub enable: u8,
    pub cutoff_depth: u8,
    pub resonance_depth: u8,
    pub pitch_depth: u8,
}

impl ModulationRoutes {
    #[inline]
    pub fn cutoff(&self, base: u8, envelope: u8) -> u8 {
        modulate_u8(base, envelope, self.cutoff_depth, self.enable & ROUTE_CUTOFF != 0)
    }

    #[inline]
    pub fn resonance(&self, base: u8, envelope: u8) -> u8 {
        modulate_u8(
            base,
            envelope,
            self.resonance_depth,
            self.enable & ROUTE_RESONANCE != 0,
        )
    }

    #[inline]
    pub fn pitch(&self, freq: u32, envelope: u8) -> u32 {
        modulate_pitch(freq, envelope, self.pitch_depth, self.enable & ROUTE_PITCH != 0)
    }
}
