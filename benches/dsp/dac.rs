//! Benchmarks for the one-bit output stage and the monitor decimator.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::{dsp::dac::DeltaSigmaDac, io::PdmDecimator};

use crate::BLOCK_SIZES;

pub fn bench_dac(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/dac");

    for &size in BLOCK_SIZES {
        let input: Vec<u8> = (0..size).map(|i| (i * 7) as u8).collect();
        let mut bits = vec![false; size];

        let mut dac = DeltaSigmaDac::new();
        group.bench_with_input(BenchmarkId::new("delta_sigma", size), &size, |b, _| {
            b.iter(|| {
                for (bit, &x) in bits.iter_mut().zip(&input) {
                    *bit = dac.tick(black_box(x));
                }
            })
        });

        let mut decimator = PdmDecimator::new(64);
        let mut pcm = vec![0.0f32; size / 64 + 1];
        group.bench_with_input(BenchmarkId::new("decimate_64", size), &size, |b, _| {
            b.iter(|| decimator.process(black_box(&bits), &mut pcm))
        });
    }

    group.finish();
}
