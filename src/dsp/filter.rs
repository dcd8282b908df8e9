#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State-Variable Filter (Fixed Point)
===================================

| response  | passes          | rejects      |
| --------- | --------------- | ------------ |
| low-pass  | below cutoff    | above cutoff |
| high-pass | above cutoff    | below cutoff |
| band-pass | around cutoff   | elsewhere    |
| notch     | away from cutoff| at cutoff    |

One SVF section produces all four responses at once from two integrators.
This is the Chamberlin topology, run entirely in integers:

    lp    += f × bp
    hp     = x − lp − q × bp
    bp    += f × hp
    notch  = x − q × bp

Vocabulary
----------

  Q12           Fixed-point format with 12 fractional bits: 4096 = 1.0.
                Both coefficients are Q12.

  f             Frequency coefficient. Sets the cutoff. Derived from the
                cutoff register as 12 × 2^(cutoff/32), spanning ≈0.003
                (cutoff 0x00) to ≈0.73 (cutoff 0xFF).

  q             Damping. 2.0 at resonance 0 (no peak), falling linearly
                to ≈0.008 at resonance 0xFF, where the section rings and
                will self-oscillate. That is expected.

  saturation    Both integrators clamp to i16 every tick. A resonant
                filter driven hard clips rather than wrapping.


Exponential Cutoff
------------------

The register is musically spaced: every 32 steps doubles the cutoff. The
fractional part of the exponent comes from a 32-entry table of
2^(i/32) in Q15, and the integer part is a left shift:

    f = (12 × EXP2_FRAC[c & 31] << (c >> 5)) >> 15

    c = 0x00  →  f = 12    (0.003)
    c = 0x80  →  f = 192   (0.047)
    c = 0xFF  →  f = 3006  (0.734)

The largest f keeps f² + 2fq below 4 for every q, so the loop is stable
across the whole register range.


Signal Domain
-------------

Samples enter as unsigned bytes and are centred and scaled into Q12-ish
headroom before filtering, then mapped back:

    x   = (in − 128) << 6         −8192..=8128
    out = clamp((y >> 6) + 128, 0, 255)


Four-Pole Mode
--------------

With the four-pole bit set, the same response is taken from a second
section fed by the first (24 dB/oct for low-pass and high-pass). The
second section has its own cutoff and resonance registers.
*/

/// 2^(i/32) for i in 0..32, Q15.
pub const EXP2_FRAC: [u32; 32] = [
    32768, 33486, 34219, 34968, 35734, 36516, 37316, 38133, 38968, 39821, 40693, 41584, 42495,
    43425, 44376, 45348, 46341, 47356, 48393, 49452, 50535, 51642, 52773, 53928, 55109, 56316,
    57549, 58809, 60097, 61413, 62757, 64132,
];

const Q12_SHIFT: u32 = 12;
const SIGNAL_SHIFT: u32 = 6;
const MODE_RESPONSE_MASK: u8 = 0b011;
const MODE_FOUR_POLE: u8 = 0b100;

/// Q12 frequency coefficient for a cutoff register value.
#[inline]
pub fn cutoff_coefficient(cutoff: u8) -> i32 {
    ((12 * EXP2_FRAC[(cutoff & 31) as usize]) << (cutoff >> 5) >> 15) as i32
}

/// Q12 damping coefficient for a resonance register value.
#[inline]
pub fn damping_coefficient(resonance: u8) -> i32 {
    8192 - 32 * resonance as i32
}

#[inline]
fn saturate(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterResponse {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    Notch,
}

impl FilterResponse {
    pub fn from_bits(bits: u8) -> Self {
        match bits & MODE_RESPONSE_MASK {
            0 => FilterResponse::LowPass,
            1 => FilterResponse::HighPass,
            2 => FilterResponse::BandPass,
            _ => FilterResponse::Notch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutputs {
    pub lowpass: i16,
    pub highpass: i16,
    pub bandpass: i16,
    pub notch: i16,
}

impl FilterOutputs {
    #[inline]
    pub fn select(&self, response: FilterResponse) -> i16 {
        match response {
            FilterResponse::LowPass => self.lowpass,
            FilterResponse::HighPass => self.highpass,
            FilterResponse::BandPass => self.bandpass,
            FilterResponse::Notch => self.notch,
        }
    }
}

/// One two-integrator section.
#[derive(Debug, Clone, Default)]
pub struct SvfSection {
    lp: i16, // low-pass integrator
    bp: i16, // band-pass integrator
}

impl SvfSection {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn next_sample(&mut self, x: i16, f: i32, q: i32) -> FilterOutputs {
        let x = x as i32;

        self.lp = saturate(self.lp as i32 + ((f * self.bp as i32) >> Q12_SHIFT));
        let hp = saturate(x - self.lp as i32 - ((q * self.bp as i32) >> Q12_SHIFT));
        self.bp = saturate(self.bp as i32 + ((f * hp as i32) >> Q12_SHIFT));
        let notch = saturate(x - ((q * self.bp as i32) >> Q12_SHIFT));

        FilterOutputs {
            lowpass: self.lp,
            highpass: hp,
            bandpass: self.bp,
            notch,
        }
    }

    pub fn reset(&mut self) {
        self.lp = 0;
        self.bp = 0;
    }
}

/// Per-tick filter settings, read from the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSettings {
    pub enabled: bool,
    pub response: FilterResponse,
    pub four_pole: bool,
    /// (cutoff, resonance) per section.
    pub sections: [(u8, u8); 2],
}

impl FilterSettings {
    /// Decode the mode register's response and four-pole bits.
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.response = FilterResponse::from_bits(mode);
        self.four_pole = mode & MODE_FOUR_POLE != 0;
        self
    }
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            response: FilterResponse::LowPass,
            four_pole: false,
            sections: [(0xFF, 0); 2],
        }
    }
}

/// Two cascadable sections.
#[derive(Debug, Clone, Default)]
pub struct FilterBank {
    sections: [SvfSection; 2],
}

impl FilterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter one unsigned sample. Disabled settings pass it through.
    pub fn process(&mut self, input: u8, settings: &FilterSettings) -> u8 {
        if !settings.enabled {
            return input;
        }

        let x = ((input as i16) - 128) << SIGNAL_SHIFT;

        let (cutoff, resonance) = settings.sections[0];
        let mut y = self.sections[0]
            .next_sample(x, cutoff_coefficient(cutoff), damping_coefficient(resonance))
            .select(settings.response);

        if settings.four_pole {
            let (cutoff, resonance) = settings.sections[1];
            y = self.sections[1]
                .next_sample(y, cutoff_coefficient(cutoff), damping_coefficient(resonance))
                .select(settings.response);
        }

        ((y >> SIGNAL_SHIFT) + 128).clamp(0, 255) as u8
    }

    pub fn reset(&mut self) {
        for section in &mut self.sections {
            section.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(response: FilterResponse, cutoff: u8, resonance: u8) -> FilterSettings {
        FilterSettings {
            enabled: true,
            response,
            four_pole: false,
            sections: [(cutoff, resonance); 2],
        }
    }

    fn settle(bank: &mut FilterBank, input: u8, settings: &FilterSettings, ticks: usize) -> u8 {
        let mut out = 0;
        for _ in 0..ticks {
            out = bank.process(input, settings);
        }
        out
    }

    #[test]
    fn coefficient_range() {
        assert_eq!(cutoff_coefficient(0x00), 12);
        assert_eq!(cutoff_coefficient(0x20), 24);
        assert_eq!(cutoff_coefficient(0xFF), 3006);
        assert_eq!(damping_coefficient(0), 8192);
        assert_eq!(damping_coefficient(0xFF), 32);
    }

    #[test]
    fn cutoff_is_monotonic_and_doubles_per_32_steps() {
        for c in 0..255u8 {
            assert!(cutoff_coefficient(c) <= cutoff_coefficient(c + 1));
        }
        for c in 0..(255 - 32) {
            let ratio = cutoff_coefficient(c + 32) as f32 / cutoff_coefficient(c) as f32;
            assert!((1.8..=2.2).contains(&ratio), "cutoff {c}: ratio {ratio}");
        }
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut bank = FilterBank::new();
        let out = settle(&mut bank, 200, &settings(FilterResponse::LowPass, 0xFF, 0), 2000);
        assert!(out.abs_diff(200) <= 2, "got {out}");
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut bank = FilterBank::new();
        let out = settle(&mut bank, 200, &settings(FilterResponse::HighPass, 0xFF, 0), 2000);
        assert!(out.abs_diff(128) <= 2, "got {out}");
    }

    #[test]
    fn lowpass_attenuates_nyquist() {
        let mut bank = FilterBank::new();
        let s = settings(FilterResponse::LowPass, 0x40, 0);
        let mut peak = 0u8;
        for i in 0..4000 {
            let input = if i % 2 == 0 { 0 } else { 255 };
            let out = bank.process(input, &s);
            if i > 2000 {
                peak = peak.max(out.abs_diff(128));
            }
        }
        assert!(peak <= 8, "peak deviation {peak}");
    }

    #[test]
    fn four_pole_attenuates_more() {
        let run = |four_pole: bool| {
            let mut bank = FilterBank::new();
            let s = FilterSettings {
                four_pole,
                ..settings(FilterResponse::LowPass, 0xE0, 0)
            };
            let mut energy = 0u32;
            for i in 0..4000u32 {
                // Square wave well above cutoff.
                let input = if (i / 4) % 2 == 0 { 64 } else { 192 };
                let out = bank.process(input, &s);
                if i > 2000 {
                    energy += out.abs_diff(128) as u32;
                }
            }
            energy
        };
        assert!(run(true) < run(false));
    }

    #[test]
    fn disabled_bank_is_passthrough() {
        let mut bank = FilterBank::new();
        let s = FilterSettings::default();
        for input in [0u8, 17, 128, 255] {
            assert_eq!(bank.process(input, &s), input);
        }
    }

    #[test]
    fn max_resonance_rings_after_impulse() {
        let mut bank = FilterBank::new();
        let s = settings(FilterResponse::BandPass, 0xFF, 0xFF);
        let mut rang = false;
        for i in 0..10_000u32 {
            let input = if i < 10 { 255 } else { 128 };
            let out = bank.process(input, &s);
            if (10..200).contains(&i) && out != 128 {
                rang = true;
            }
        }
        assert!(rang);
    }

    #[test]
    fn mode_register_decoding() {
        let s = FilterSettings::default().with_mode(0b110);
        assert_eq!(s.response, FilterResponse::BandPass);
        assert!(s.four_pole);
        assert_eq!(FilterResponse::from_bits(3), FilterResponse::Notch);
    }
}
