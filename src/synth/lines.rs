//! Signals shared between the host side and the tick pipeline.
//!
//! The status byte is published by the tick pipeline once per tick and the
//! external gate line is driven by the host. Both are single bytes behind
//! atomics, so neither side ever observes a torn value and neither side
//! ever waits.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::dsp::EnvelopeState;
use crate::registers::map::status;

#[derive(Debug, Default)]
pub struct SharedLines {
    status: AtomicU8,
    gate_input: AtomicBool,
}

impl SharedLines {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently published status register value.
    pub fn status(&self) -> u8 {
        self.status.load(Ordering::Acquire)
    }

    pub(crate) fn publish_status(&self, value: u8) {
        self.status.store(value, Ordering::Release);
    }

    /// State of the external (hardware) gate input.
    pub fn gate_input(&self) -> bool {
        self.gate_input.load(Ordering::Acquire)
    }

    pub fn set_gate_input(&self, gate: bool) {
        self.gate_input.store(gate, Ordering::Release);
    }

    /// Gate LED: the combined gate seen by the envelope on the last tick.
    pub fn gate_active(&self) -> bool {
        self.status() & status::GATE != 0
    }

    /// Oscillator-running LED.
    pub fn oscillator_running(&self) -> bool {
        self.status() & status::OSC_RUNNING != 0
    }

    pub fn envelope_state(&self) -> EnvelopeState {
        decode_stage(self.status())
    }
}

/// Pack the status register.
#[inline]
pub fn encode_status(gate: bool, stage: EnvelopeState, running: bool) -> u8 {
    let mut value = (stage.code() << status::STAGE_SHIFT) & status::STAGE_MASK;
    if gate {
        value |= status::GATE;
    }
    if running {
        value |= status::OSC_RUNNING;
    }
    value
}

/// The envelope stage held in a status register value.
pub fn decode_stage(value: u8) -> EnvelopeState {
    EnvelopeState::from_code((value & status::STAGE_MASK) >> status::STAGE_SHIFT)
        .unwrap_or_default()
}
