/*
ADSR Envelope Implementation
============================

This module implements an 8-bit linear ADSR envelope generator driven by a
gate line and a per-stage rate counter, the same structure the classic
sound chips use.

Vocabulary
----------

  value       The envelope's current output, 0..=255. It multiplies the
              audio signal to control amplitude over time.

  stage       Which phase of the envelope we're in: Idle, Attack, Decay,
              Sustain, or Release. A state machine governs transitions.

  gate        The note on/off line. Sampled once per tick; rising and
              falling edges are found by comparing with the last tick.

  rate        8-bit register per stage. Larger is slower.

  rate counter
              Counts down from rate × 256. Each time it is found at zero
              the value steps by one and the counter is reloaded.


The Shape: Linear Steps
-----------------------

  Value
    255 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
      0 └─╱───────────────────╲──→ Ticks
        Attack Decay  Sustain  Release


Rate → Time
-----------

Every step costs (rate × 256 + 1) ticks:

    rate 0x00  →  1 tick per step      255 ticks for a full sweep
    rate 0x01  →  257 ticks per step   ≈ 65.5k ticks
    rate 0xFF  →  65281 ticks per step ≈ 16.6M ticks

Rate 0 is the fastest setting, not "instant": one full sweep still takes
255 ticks.


The State Machine
-----------------

    ┌──────┐  gate high  ┌────────┐  value=255  ┌───────┐
    │ Idle │ ──────────→ │ Attack │ ──────────→ │ Decay │
    └──────┘             └────────┘             └───────┘
        ↑                     │ gate low            │  value=S
        │ value=0             ↓                     ↓
    ┌─────────┐  gate low ┌─────────┐  gate low ┌─────────┐
    │ Release │ ←──────── │ (any)   │ ←──────── │ Sustain │
    └─────────┘           └─────────┘           └─────────┘
        │ gate rising: restart Attack from 0

Transitions are evaluated before the step, so a gate edge takes effect on
the tick it is seen. Release always starts from the CURRENT value, so
releasing mid-attack ramps down from wherever the attack got to.

Loop mode sends Sustain straight to Release even while the gate is held.
Release then reaches Idle, the held gate starts a new Attack, and the
envelope cycles A-D-R for as long as the gate stays high.
*/

/// The current stage of the envelope state machine.
///
/// The discriminant is the 3-bit code reported in the status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum EnvelopeState {
    #[default]
    Idle = 0, // Gate low, value = 0
    Attack = 1,  // Ramping up to 255
    Decay = 2,   // Ramping down to sustain level
    Sustain = 3, // Holding at sustain level while gate is high
    Release = 4, // Gate went low, ramping down to 0
}

impl EnvelopeState {
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(EnvelopeState::Idle),
            1 => Some(EnvelopeState::Attack),
            2 => Some(EnvelopeState::Decay),
            3 => Some(EnvelopeState::Sustain),
            4 => Some(EnvelopeState::Release),
            _ => None,
        }
    }
}

/// Per-tick envelope inputs, read from the register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeParams {
    pub attack: u8,
    pub decay: u8,
    pub sustain: u8,
    pub release: u8,
    /// Cycle A-D-R while the gate is held instead of sustaining.
    pub looping: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Envelope {
    stage: EnvelopeState,
    value: u8,
    rate_counter: u16,
    prev_gate: bool,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the envelope by one tick. Returns the new value.
    pub fn tick(&mut self, gate: bool, params: &EnvelopeParams) -> u8 {
        let rising = gate && !self.prev_gate;
        self.prev_gate = gate;

        match self.stage {
            EnvelopeState::Idle if gate => self.enter(EnvelopeState::Attack),
            EnvelopeState::Attack | EnvelopeState::Decay | EnvelopeState::Sustain if !gate => {
                self.enter(EnvelopeState::Release)
            }
            EnvelopeState::Release if rising => {
                // Retrigger: a clean attack from zero.
                self.value = 0;
                self.enter(EnvelopeState::Attack);
            }
            _ => {}
        }

        match self.stage {
            EnvelopeState::Idle => {
                self.value = 0;
            }

            EnvelopeState::Attack => {
                if self.step_due(params.attack) {
                    self.value = self.value.saturating_add(1);
                }
                if self.value == u8::MAX {
                    self.enter(EnvelopeState::Decay);
                }
            }

            EnvelopeState::Decay => {
                if self.value > params.sustain && self.step_due(params.decay) {
                    self.value -= 1;
                }
                if self.value <= params.sustain {
                    self.value = params.sustain;
                    self.enter(EnvelopeState::Sustain);
                }
            }

            EnvelopeState::Sustain => {
                self.value = params.sustain;
                if params.looping {
                    self.enter(EnvelopeState::Release);
                }
            }

            EnvelopeState::Release => {
                if self.value > 0 && self.step_due(params.release) {
                    self.value -= 1;
                }
                if self.value == 0 {
                    self.enter(EnvelopeState::Idle);
                }
            }
        }

        self.value
    }

    #[inline]
    fn enter(&mut self, stage: EnvelopeState) {
        self.stage = stage;
        self.rate_counter = 0;
    }

    /// Count down one tick; true when the value should step.
    #[inline]
    fn step_due(&mut self, rate: u8) -> bool {
        if self.rate_counter == 0 {
            self.rate_counter = (rate as u16) << 8;
            true
        } else {
            self.rate_counter -= 1;
            false
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        !matches!(self.stage, EnvelopeState::Idle)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }
}
