//! Six-channel weighted mixer with saturation.

use crate::dsp::oscillator::{Channels, CHANNELS};
use crate::dsp::unity_gain;

/*
Weighted Mixing
===============

Mixing combines several signals by ADDING them, each scaled by its own
gain. Everything here is unsigned 8-bit: waveforms sit in 0..=255 and
gains in 0x00..=0xFF.

Vocabulary
----------

  gain          Per-channel multiplier. 0x00 mutes the channel, 0xFF passes
                it unchanged (unity).

  headroom      Extra bits in the accumulator so the sum of six products
                cannot overflow before we get to saturate it.

  saturation    Clamping to the largest representable value instead of
                wrapping around. A wrapped mixer turns a loud signal into a
                quiet one, which is far worse than a clipped one.


The Math
--------

    gain'  = gain + (gain >> 7)             0xFF → 256, 0x80 → 129
    sum    = Σ waveform[i] × gain'[i]       fits in 19 bits
    output = min(sum >> 8, 255)

The gain remap is what makes 0xFF exact unity: 255 × 256 >> 8 = 255,
whereas 255 × 255 >> 8 would give 254.

    one channel,  gain 0xFF:    out == in
    two channels, gain 0x80:    128 × 129 × 2 >> 8 = 129  (≈ 128)
    six channels at 0xFF, 0xFF: 1530 → clipped to 255


Channel Enable
--------------

The waveform-select register holds one enable bit per channel. A channel
with its bit clear contributes nothing regardless of its gain, which lets
a host mute a voice without losing its mix setting.
*/

/// Mix six channels. Channels whose bit is clear in `enable_mask` are muted.
#[inline]
pub fn mix(channels: &Channels, gains: &[u8; CHANNELS], enable_mask: u8) -> u8 {
    let mut sum = 0u32;
    for (i, (&sample, &gain)) in channels.iter().zip(gains.iter()).enumerate() {
        if enable_mask & (1 << i) != 0 {
            sum += sample as u32 * unity_gain(gain);
        }
    }
    (sum >> 8).min(255) as u8
}
