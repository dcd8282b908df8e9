use std::sync::Arc;

use log::debug;

use crate::{
    config::SynthConfig,
    dsp::{
        amplify::{ring_modulate, shape_amplitude},
        dac::DeltaSigmaDac,
        envelope::Envelope,
        filter::FilterBank,
        glide::Glide,
        mix::mix,
        modulate::pwm_duty,
        oscillator::WaveformBank,
        phase::{with_offset, PhaseAccumulator},
        wavetable::Wavetable,
        EnvelopeState,
    },
    io::PdmDecimator,
    protocol::{Transaction, TransactionReceiver},
    registers::{map, RegisterBank},
    synth::lines::{encode_status, SharedLines},
};

#[cfg(feature = "rtrb")]
use crate::protocol::ProtocolEngine;

/*
The Tick Pipeline
=================

One call to `tick()` is one output sample. Every stage runs exactly once,
in this order, and each reads only what the stages before it produced:

    committed transactions ──→ registers
                                   │
    frequency ─→ glide ─→ pitch mod ─→ phase ─→ + offset
                                                   │
    duty ─→ PWM ──────────────────────→ waveforms (6 channels)
                                                   │
                               bypass: saw in place of wavetable
                                                   │
                                  mixer ─→ ring mod ─→ stream select
                                                   │
                                         bypass: force 0x80
                                                   │
    gate ─→ envelope ─→ bypass: force 0xFF ─→ × envelope × master
                  │                                │
                  └─→ cutoff/resonance mod ─→ filter (or pass-through)
                                                   │
                                               delta-sigma ─→ bit
                                                   │
                                             status published


Envelope Feedback
-----------------

Pitch and pulse width are modulated by the envelope value from the
PREVIOUS tick: the oscillator has to run before this tick's envelope
exists. Cutoff and resonance come after the envelope and use the current
value. This one-tick lag is inaudible and keeps the pipeline acyclic.


Register Updates
----------------

Transactions are drained at the very start of a tick and applied whole,
so no tick ever sees half of a multi-register update such as a 24-bit
frequency word.


Soft Reset
----------

While the soft-reset control bit is set every running stage is held at
its reset state and the output bit is 0. Registers and the wavetable are
configuration and are left alone.
*/

pub struct Synth {
    config: SynthConfig,
    registers: RegisterBank,
    rx: Option<Box<dyn TransactionReceiver + Send>>,
    lines: Arc<SharedLines>,

    glide: Glide,
    phase: PhaseAccumulator,
    waves: WaveformBank,
    envelope: Envelope,
    filter: FilterBank,
    dac: DeltaSigmaDac,

    decimator: PdmDecimator,
    status: u8,
    ticks: u64,
}

impl Synth {
    /// A synth driven only through direct register access.
    pub fn new(config: SynthConfig) -> Self {
        debug!(
            "synth created: queue capacity {}, decimation {}, seed {:#010x}",
            config.queue_capacity,
            config.decimation,
            config.effective_seed()
        );

        Self {
            registers: RegisterBank::new(),
            rx: None,
            lines: Arc::new(SharedLines::new()),
            glide: Glide::new(),
            phase: PhaseAccumulator::new(),
            waves: WaveformBank::new(config.effective_seed()),
            envelope: Envelope::new(),
            filter: FilterBank::new(),
            dac: DeltaSigmaDac::new(),
            decimator: PdmDecimator::new(config.decimation),
            status: 0,
            ticks: 0,
            config,
        }
    }

    /// A synth that drains committed transactions from `receiver` at the
    /// start of every tick.
    pub fn with_receiver(
        config: SynthConfig,
        receiver: impl TransactionReceiver + Send + 'static,
    ) -> Self {
        let mut synth = Self::new(config);
        synth.rx = Some(Box::new(receiver));
        synth
    }

    /// A synth plus the host-side protocol engine that feeds it.
    ///
    /// The engine may move to another thread; the two halves share only a
    /// lock-free transaction ring and the status lines.
    #[cfg(feature = "rtrb")]
    pub fn with_protocol(config: SynthConfig) -> (Self, ProtocolEngine) {
        let (tx, rx) = rtrb::RingBuffer::<Transaction>::new(config.queue_capacity.max(1));
        let synth = Self::with_receiver(config, rx);
        let engine = ProtocolEngine::new(tx, Arc::clone(&synth.lines));
        (synth, engine)
    }

    /// Advance one tick and return the output bit.
    pub fn tick(&mut self) -> bool {
        self.drain_transactions();

        let gate = self.registers.soft_gate() || self.lines.gate_input();

        if self.registers.soft_reset() {
            self.reset_state();
            self.publish_status(gate, EnvelopeState::Idle, false);
            self.ticks += 1;
            return false;
        }

        let regs = &self.registers;
        let running = regs.oscillator_enabled();
        let routes = regs.modulation_routes();
        let bypass = regs.bypass();
        let previous_envelope = self.envelope.value();

        // Oscillator
        let freq = self.glide.tick(regs.frequency(), regs.glide_rate());
        let freq = routes.pitch(freq, previous_envelope);
        let phase = with_offset(self.phase.advance(running, freq), regs.phase_offset());
        let duty = pwm_duty(regs.duty(), previous_envelope, regs.pwm_depth());

        let mut channels = self.waves.render(phase, duty, running);
        bypass.wavetable(&mut channels);

        // Mixing
        let mixed = mix(&channels, &regs.gains(), regs.wave_select());
        let mut signal = ring_modulate(&regs.ring_mod(), &channels, mixed);
        if regs.stream_mode() {
            signal = regs.stream_sample();
        }
        let signal = bypass.oscillator(signal);

        // Envelope and amplitude
        let envelope = self.envelope.tick(gate, &regs.envelope_params());
        let shaped = shape_amplitude(signal, bypass.envelope(envelope), regs.master_amplitude());

        // Filter
        let mut filter = regs.filter_settings();
        for (cutoff, resonance) in filter.sections.iter_mut() {
            *cutoff = routes.cutoff(*cutoff, envelope);
            *resonance = routes.resonance(*resonance, envelope);
        }
        filter.enabled &= !bypass.filter_passthrough();
        let filtered = self.filter.process(shaped, &filter);

        let bit = self.dac.tick(filtered);

        self.publish_status(gate, self.envelope.state(), running);
        self.ticks += 1;
        bit
    }

    /// Fill `out` with consecutive output bits.
    pub fn render_bits(&mut self, out: &mut [bool]) {
        for bit in out.iter_mut() {
            *bit = self.tick();
        }
    }

    /// Fill `out` with decimated monitoring samples in [-1, 1]. Each sample
    /// costs `config.decimation` ticks.
    pub fn render_block(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = loop {
                let bit = self.tick();
                if let Some(value) = self.decimator.push(bit) {
                    break value;
                }
            };
        }
    }

    /// Write a register directly, with the same rules as the protocol.
    ///
    /// This goes around any attached `ProtocolEngine`: its shadow bank is
    /// not updated, so host reads keep showing the last committed value.
    pub fn write_register(&mut self, address: u8, value: u8) {
        if self.rx.is_some() {
            debug!("direct write {value:#04x} -> {address:#04x} bypasses host read-back");
        }
        self.store(address, value);
    }

    /// Read a register. Status is the value published by the last tick.
    pub fn read_register(&self, address: u8) -> u8 {
        if address == map::STATUS {
            self.status
        } else {
            self.registers.read(address)
        }
    }

    /// Drive the external gate input.
    pub fn set_gate_input(&self, gate: bool) {
        self.lines.set_gate_input(gate);
    }

    pub fn gate_active(&self) -> bool {
        self.lines.gate_active()
    }

    pub fn oscillator_running(&self) -> bool {
        self.lines.oscillator_running()
    }

    pub fn envelope(&self) -> EnvelopeState {
        self.envelope.state()
    }

    pub fn envelope_value(&self) -> u8 {
        self.envelope.value()
    }

    pub fn status(&self) -> u8 {
        self.status
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn registers(&self) -> &RegisterBank {
        &self.registers
    }

    pub fn wavetable(&self) -> &Wavetable {
        self.waves.wavetable()
    }

    pub fn lines(&self) -> &Arc<SharedLines> {
        &self.lines
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Return to the power-on state: registers, wavetable and every
    /// running stage.
    ///
    /// Like [`Synth::write_register`] this does not reach an attached
    /// engine's shadow; a host resets both sides with
    /// `ProtocolEngine::system_reset`.
    pub fn reset(&mut self) {
        debug!("system reset after {} ticks", self.ticks);
        self.registers.reset();
        self.waves.wavetable_mut().reset();
        self.reset_state();
        self.decimator.reset();
        self.ticks = 0;
        self.publish_status(false, EnvelopeState::Idle, false);
    }

    fn reset_state(&mut self) {
        self.glide.reset();
        self.phase.reset();
        self.waves.reset();
        self.envelope.reset();
        self.filter.reset();
        self.dac.reset();
    }

    fn drain_transactions(&mut self) {
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        while let Some(transaction) = rx.pop() {
            self.apply_transaction(&transaction);
        }
        self.rx = Some(rx);
    }

    fn apply_transaction(&mut self, transaction: &Transaction) {
        if transaction.is_system_reset() {
            self.reset();
        }
        for write in transaction.writes() {
            self.store(write.address, write.value);
        }
    }

    #[inline]
    fn store(&mut self, address: u8, value: u8) {
        if let Some(write) = self.registers.write(address, value) {
            self.waves.wavetable_mut().apply(write);
        }
    }

    #[inline]
    fn publish_status(&mut self, gate: bool, stage: EnvelopeState, running: bool) {
        self.status = encode_status(gate, stage, running);
        self.lines.publish_status(self.status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::map::{control, status};

    fn synth() -> Synth {
        Synth::new(SynthConfig::default())
    }

    #[test]
    fn idle_synth_is_silent() {
        let mut synth = synth();
        synth.tick();
        let ones = (0..1000).filter(|_| synth.tick()).count();
        assert_eq!(ones, 0);
        assert_eq!(synth.envelope(), EnvelopeState::Idle);
    }

    #[test]
    fn stream_mode_with_open_envelope_outputs_the_stream_sample() {
        let mut synth = synth();
        synth.write_register(map::STREAM_SAMPLE, 0xFF);
        synth.write_register(map::BYPASS, 0b0010);
        synth.write_register(map::CONTROL, control::STREAM_MODE);
        assert!((0..500).all(|_| synth.tick()));
    }

    #[test]
    fn soft_reset_holds_output_low() {
        let mut synth = synth();
        synth.write_register(map::STREAM_SAMPLE, 0xFF);
        synth.write_register(map::BYPASS, 0b0010);
        synth.write_register(
            map::CONTROL,
            control::STREAM_MODE | control::OSC_ENABLE | control::SOFT_RESET,
        );
        assert!((0..500).all(|_| !synth.tick()));
        assert_eq!(synth.status() & status::OSC_RUNNING, 0);
        assert_eq!(synth.envelope(), EnvelopeState::Idle);
    }

    #[test]
    fn status_reports_gate_stage_and_running() {
        let mut synth = synth();
        synth.write_register(map::CONTROL, control::OSC_ENABLE | control::SOFT_GATE);
        synth.tick();
        let value = synth.read_register(map::STATUS);
        assert_eq!(value & status::GATE, status::GATE);
        assert_eq!(value & status::OSC_RUNNING, status::OSC_RUNNING);
        assert_eq!(
            (value & status::STAGE_MASK) >> status::STAGE_SHIFT,
            EnvelopeState::Attack.code()
        );
        assert!(synth.gate_active());
        assert!(synth.oscillator_running());
    }

    #[test]
    fn hardware_gate_is_ored_with_soft_gate() {
        let mut synth = synth();
        synth.set_gate_input(true);
        synth.tick();
        assert!(synth.gate_active());
        assert_eq!(synth.envelope(), EnvelopeState::Attack);
        synth.set_gate_input(false);
        synth.tick();
        assert!(!synth.gate_active());
    }

    #[test]
    fn direct_wavetable_writes_reach_the_table() {
        let mut synth = synth();
        synth.write_register(map::WT_CONTROL, 0b11);
        for value in [9, 8, 7] {
            synth.write_register(map::WT_DATA, value);
        }
        assert_eq!(&synth.wavetable().samples()[..3], &[9, 8, 7]);
        assert_eq!(synth.read_register(map::WT_DATA), 0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn direct_access_does_not_touch_the_host_shadow() {
        let (mut synth, mut engine) = Synth::with_protocol(SynthConfig::default());
        synth.write_register(map::DUTY, 0x20);
        assert_eq!(synth.read_register(map::DUTY), 0x20);
        assert_eq!(engine.read(map::DUTY), 0x80);

        engine.write(map::SUSTAIN, 0x10);
        synth.tick();
        synth.reset();
        assert_eq!(synth.read_register(map::SUSTAIN), 0xC0);
        assert_eq!(engine.read(map::SUSTAIN), 0x10);
    }

    #[test]
    fn reset_restores_power_on_state() {
        let mut synth = synth();
        synth.write_register(map::DUTY, 0x01);
        synth.write_register(map::WT_DATA, 0x00);
        synth.write_register(map::CONTROL, control::SOFT_GATE);
        for _ in 0..10 {
            synth.tick();
        }
        synth.reset();
        assert_eq!(synth.read_register(map::DUTY), 0x80);
        assert_eq!(synth.wavetable().samples(), Wavetable::<64>::new().samples());
        assert_eq!(synth.ticks(), 0);
        assert_eq!(synth.status(), 0);
    }

    #[test]
    fn render_block_costs_decimation_ticks_per_sample() {
        let mut synth = Synth::new(SynthConfig::default().with_decimation(16));
        let mut out = [0.0f32; 10];
        synth.render_block(&mut out);
        assert_eq!(synth.ticks(), 160);
        assert!(out.iter().all(|s| (-1.0..=1.0).contains(s)));
    }
}
