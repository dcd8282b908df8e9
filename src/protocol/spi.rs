//! Bit-level front end: an SPI mode-0 slave.
//!
//! Chip select is active low and data is sampled on the rising clock edge,
//! most significant bit first. Each call to [`SpiSlave::clock`] is one
//! rising edge. Eight edges make a byte for the [`ProtocolEngine`]; a byte
//! left half shifted when chip select rises aborts the whole transaction.

use crate::protocol::{AbortReason, CommitOutcome, ProtocolEngine};

pub struct SpiSlave {
    engine: ProtocolEngine,
    shift: u8,
    bits: u8,
}

impl SpiSlave {
    pub fn new(engine: ProtocolEngine) -> Self {
        Self {
            engine,
            shift: 0,
            bits: 0,
        }
    }

    /// Chip select falls.
    pub fn select(&mut self) {
        self.shift = 0;
        self.bits = 0;
        self.engine.begin();
    }

    /// One rising clock edge with the current MOSI level.
    pub fn clock(&mut self, mosi: bool) {
        if !self.engine.in_transaction() {
            return;
        }
        self.shift = (self.shift << 1) | mosi as u8;
        self.bits += 1;
        if self.bits == 8 {
            self.engine.push_byte(self.shift);
            self.shift = 0;
            self.bits = 0;
        }
    }

    /// Chip select rises.
    pub fn deselect(&mut self) -> CommitOutcome {
        if self.bits != 0 {
            self.bits = 0;
            self.shift = 0;
            return self.engine.abort_with(AbortReason::PartialByte);
        }
        self.engine.end()
    }

    /// Shift a whole byte, MSB first.
    pub fn clock_byte(&mut self, byte: u8) {
        for bit in (0..8).rev() {
            self.clock((byte >> bit) & 1 != 0);
        }
    }

    /// One complete transaction: select, address, data, deselect.
    pub fn transfer(&mut self, address: u8, data: &[u8]) -> CommitOutcome {
        self.select();
        self.clock_byte(address);
        for &byte in data {
            self.clock_byte(byte);
        }
        self.deselect()
    }

    pub fn engine(&self) -> &ProtocolEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ProtocolEngine {
        &mut self.engine
    }

    pub fn into_inner(self) -> ProtocolEngine {
        self.engine
    }
}
