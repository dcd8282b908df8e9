//! Frequency glide (portamento).
//!
//! The frequency registers hold a *target*. The oscillator runs at a
//! *current* frequency that chases the target, moving every `rate` ticks by
//! one sixteenth of the remaining distance plus one. The step never exceeds
//! the distance left, so the current frequency lands on the target exactly
//! and never overshoots. Rate 0 disables glide: current follows target on
//! the same tick.

use crate::dsp::phase::PHASE_MASK;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Glide {
    target: u32,
    current: u32,
    slew_counter: u8,
}

impl Glide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chase `target` at `rate` and return the frequency to play this tick.
    pub fn tick(&mut self, target: u32, rate: u8) -> u32 {
        self.target = target & PHASE_MASK;

        if rate == 0 {
            self.current = self.target;
            self.slew_counter = 0;
            return self.current;
        }

        self.slew_counter = self.slew_counter.saturating_add(1);
        if self.slew_counter >= rate {
            self.slew_counter = 0;
            let diff = self.current.abs_diff(self.target);
            if diff != 0 {
                let step = (diff >> 4) + 1;
                if self.current < self.target {
                    self.current += step;
                } else {
                    self.current -= step;
                }
            }
        }

        self.current
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
