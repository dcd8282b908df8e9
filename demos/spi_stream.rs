//! Drive the synth bit by bit over the serial interface from another
//! thread, the way an external controller would.
//!
//! Run with: cargo run --example spi_stream

use std::{thread, time::Duration};

use bitsynth::{
    patch::{self, frequency_word, REFERENCE_TICK_RATE},
    protocol::SpiSlave,
    registers::map::{self, control},
    Synth, SynthConfig,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let (mut synth, engine) = Synth::with_protocol(SynthConfig::default());
    let lines = synth.lines().clone();

    let host = thread::spawn(move || {
        let mut spi = SpiSlave::new(engine);

        for burst in patch::saw_lead().bursts() {
            spi.transfer(burst.start, &burst.data);
        }

        // A short arpeggio, one atomic frequency write per note.
        for hz in [220.0, 277.18, 329.63, 440.0] {
            let [l, m, h, _] = frequency_word(hz, REFERENCE_TICK_RATE).to_le_bytes();
            let outcome = spi.transfer(map::FREQ_L, &[l, m, h]);
            spi.transfer(map::CONTROL, &[control::OSC_ENABLE | control::SOFT_GATE]);
            println!("host: {hz:>7.2} Hz -> {outcome:?}");
            thread::sleep(Duration::from_millis(20));
        }

        spi.transfer(map::CONTROL, &[control::OSC_ENABLE]);
    });

    let mut bits = vec![false; 4_096];
    let mut ones = 0usize;
    while !host.is_finished() {
        synth.render_bits(&mut bits);
        ones += bits.iter().filter(|&&b| b).count();
        thread::yield_now();
    }
    host.join()
        .map_err(|_| color_eyre::eyre::eyre!("host thread panicked"))?;

    // Let the release run out.
    for _ in 0..64 {
        synth.render_bits(&mut bits);
    }

    println!(
        "synth: {} ticks, density {:.3}, stage {:?}, status {:#04x}",
        synth.ticks(),
        ones as f64 / synth.ticks().max(1) as f64,
        lines.envelope_state(),
        synth.status(),
    );

    Ok(())
}
