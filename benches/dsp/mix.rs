//! Benchmarks for the mixer and the multiplier stages.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::dsp::{
    amplify::{self, RingModConfig},
    mix,
    oscillator::Channels,
};

use crate::BLOCK_SIZES;

pub fn bench_mix(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/mix");

    for &size in BLOCK_SIZES {
        let frames: Vec<Channels> = (0..size)
            .map(|i| {
                let t = i as u8;
                [t, t.wrapping_mul(3), !t, t ^ 0x55, t.rotate_left(3), t / 2]
            })
            .collect();
        let mut out = vec![0u8; size];

        let gains = [0x40; 6];
        group.bench_with_input(BenchmarkId::new("six_channels", size), &size, |b, _| {
            b.iter(|| {
                for (o, ch) in out.iter_mut().zip(&frames) {
                    *o = mix::mix(black_box(ch), &gains, 0x3F);
                }
            })
        });

        // Mixer, ring modulator and amplitude shaping back to back.
        let ring = RingModConfig::from_register(0x40 | (3 << 3));
        group.bench_with_input(BenchmarkId::new("mix_ring_amp", size), &size, |b, _| {
            b.iter(|| {
                for (o, ch) in out.iter_mut().zip(&frames) {
                    let mixed = mix::mix(black_box(ch), &gains, 0x3F);
                    let ringed = amplify::ring_modulate(&ring, ch, mixed);
                    *o = amplify::shape_amplitude(ringed, 0xC0, 0xFF);
                }
            })
        });
    }

    group.finish();
}
