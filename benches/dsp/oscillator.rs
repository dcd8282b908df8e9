//! Benchmarks for the phase accumulator and waveform generators.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::dsp::{
    oscillator::{self, WaveformBank, LFSR_SEED},
    phase::PhaseAccumulator,
};

use crate::BLOCK_SIZES;

const A4: u32 = 0x02_4000;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut out = vec![0u8; size];

        let mut phase = PhaseAccumulator::new();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    *sample = oscillator::sine(phase.advance(true, black_box(A4)));
                }
            })
        });

        let mut phase = PhaseAccumulator::new();
        group.bench_with_input(BenchmarkId::new("square", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    *sample = oscillator::square(phase.advance(true, black_box(A4)), 0x40);
                }
            })
        });

        // All six channels, including the LFSR clock and the wavetable
        // interpolation.
        let mut phase = PhaseAccumulator::new();
        let mut bank = WaveformBank::new(LFSR_SEED);
        group.bench_with_input(BenchmarkId::new("bank", size), &size, |b, _| {
            b.iter(|| {
                for sample in out.iter_mut() {
                    let channels = bank.render(phase.advance(true, black_box(A4)), 0x80, true);
                    *sample = channels[5];
                }
            })
        });
    }

    group.finish();
}
