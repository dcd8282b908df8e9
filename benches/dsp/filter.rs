//! Benchmarks for the state-variable filter bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::dsp::{
    filter::{FilterBank, FilterSettings},
    oscillator,
};

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth input: plenty of harmonics to work on.
        let input: Vec<u8> = (0..size)
            .map(|i| oscillator::sawtooth((i as u32 * 0x02_4000) & 0xFF_FFFF))
            .collect();
        let mut out = vec![0u8; size];

        let two_pole = FilterSettings {
            enabled: true,
            sections: [(0x80, 0x60), (0xFF, 0)],
            ..FilterSettings::default()
        };
        let mut bank = FilterBank::new();
        group.bench_with_input(BenchmarkId::new("two_pole", size), &size, |b, _| {
            b.iter(|| {
                for (o, &x) in out.iter_mut().zip(&input) {
                    *o = bank.process(black_box(x), &two_pole);
                }
            })
        });

        let four_pole = FilterSettings {
            enabled: true,
            sections: [(0x80, 0x60), (0x80, 0x20)],
            ..FilterSettings::default()
        }
        .with_mode(0b100);
        let mut bank = FilterBank::new();
        group.bench_with_input(BenchmarkId::new("four_pole", size), &size, |b, _| {
            b.iter(|| {
                for (o, &x) in out.iter_mut().zip(&input) {
                    *o = bank.process(black_box(x), &four_pole);
                }
            })
        });
    }

    group.finish();
}
