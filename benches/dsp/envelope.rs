//! Benchmarks for the ADSR state machine.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::dsp::envelope::{Envelope, EnvelopeParams};

use crate::BLOCK_SIZES;

const PARAMS: EnvelopeParams = EnvelopeParams {
    attack: 0x04,
    decay: 0x04,
    sustain: 0xA0,
    release: 0x04,
    looping: false,
};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut out = vec![0u8; size];

        // Attack phase (ramping up, slow enough to stay there)
        let slow = EnvelopeParams {
            attack: 0xFF,
            ..PARAMS
        };
        let mut env = Envelope::new();
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    *sample = env.tick(black_box(true), &slow);
                }
            })
        });

        // Sustain phase (holding steady)
        let mut env = Envelope::new();
        for _ in 0..10_000 {
            env.tick(true, &PARAMS);
        }
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    *sample = env.tick(black_box(true), &PARAMS);
                }
            })
        });

        // Loop mode: every stage transition gets exercised
        let looping = EnvelopeParams {
            attack: 0,
            decay: 0,
            release: 0,
            looping: true,
            ..PARAMS
        };
        let mut env = Envelope::new();
        group.bench_with_input(BenchmarkId::new("loop", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    *sample = env.tick(black_box(true), &looping);
                }
            })
        });
    }

    group.finish();
}
