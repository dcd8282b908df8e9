//! Benchmarks for the full tick pipeline.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use bitsynth::{
    patch::{self, Patch},
    Synth, SynthConfig,
};

use crate::BLOCK_SIZES;

fn gated(patch: &Patch) -> Synth {
    let mut synth = Synth::new(SynthConfig::default());
    patch.apply_direct(&mut synth);
    synth.set_gate_input(true);
    synth
}

pub fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/tick");

    for &size in BLOCK_SIZES {
        let mut bits = vec![false; size];

        // Baseline: sawtooth straight to the DAC
        let mut init = gated(&patch::init());
        group.bench_with_input(BenchmarkId::new("init", size), &size, |b, _| {
            b.iter(|| init.render_bits(black_box(&mut bits)))
        });

        // Envelope-swept resonant filter with glide
        let mut lead = gated(&patch::saw_lead());
        group.bench_with_input(BenchmarkId::new("saw_lead", size), &size, |b, _| {
            b.iter(|| lead.render_bits(black_box(&mut bits)))
        });

        // Both filter sections and PWM
        let mut bass = gated(&patch::pwm_bass());
        group.bench_with_input(BenchmarkId::new("pwm_bass", size), &size, |b, _| {
            b.iter(|| bass.render_bits(black_box(&mut bits)))
        });

        // Transactions drained every tick: one frequency write per block
        let (mut synth, mut engine) = Synth::with_protocol(SynthConfig::default());
        patch::saw_lead().apply(&mut engine).ok();
        engine.set_gate_input(true);
        let mut word: u32 = 0x02_4000;
        group.bench_with_input(BenchmarkId::new("protocol", size), &size, |b, _| {
            b.iter(|| {
                word = word.wrapping_add(0x100) & 0xFF_FFFF;
                let [l, m, h, _] = word.to_le_bytes();
                engine.write_burst(bitsynth::registers::map::FREQ_L, &[l, m, h]);
                synth.render_bits(black_box(&mut bits));
            })
        });
    }

    group.finish();
}
