//! Host side of the register protocol.
//!
//! The host talks to the synth in transactions: chip select goes low, an
//! address byte arrives, then any number of data bytes, then chip select
//! goes high. The [`ProtocolEngine`] frames those bytes into register
//! writes and hands finished transactions to the tick pipeline.

pub mod spi;
pub mod transaction;

use std::sync::Arc;

use log::{debug, trace, warn};

use crate::registers::{map, RegisterBank};
use crate::synth::SharedLines;
pub use spi::SpiSlave;
pub use transaction::{
    AbortReason, CommitOutcome, RegisterWrite, Transaction, TransactionReceiver,
    TransactionSender, MAX_TRANSACTION_WRITES,
};

/*
Transactions
============

    CS  ‾‾‾‾\___________________________________________/‾‾‾‾
            [address][data][data][data] ...        [data]
                      ↓     ↓     ↓
                     addr  addr+1 addr+2    (wrapping at 0xFF)

The first byte after chip select is the ADDRESS. Every later byte is DATA
for the current address, after which the address moves on by one. The
wavetable data port is the exception: its address stays put, so a burst
of data bytes streams consecutive table samples.

Vocabulary
----------

  frame         An address byte plus the data bytes that follow it.

  commit        Handing a finished transaction to the tick pipeline in one
                piece. The pipeline sees either all of its writes or none.

  shadow        The host's own copy of the registers. It is updated only
                when a transaction is accepted by the queue, and it is what
                `read` returns.


When a Transaction Is Thrown Away
---------------------------------

Everything is all-or-nothing. A transaction that does not end on a frame
boundary never reaches the queue, so no register changes:

    [address]                   dangling address        → Aborted
    [address][data][1011...]    partial byte (bit level) → Aborted
    [address] + 129 data bytes  overflow                → Aborted
    (nothing)                                           → Empty

A well-formed transaction can still be refused if the tick pipeline has
fallen behind and the queue is full. That comes back as `Dropped`, and the
shadow stays as it was so reads never show a value the synth never got.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Chip select is high.
    Deselected,
    /// Waiting for the address byte.
    Address,
    /// Address received; the next byte is data for it.
    Data { address: u8 },
}

pub struct ProtocolEngine {
    sender: Box<dyn TransactionSender + Send>,
    lines: Arc<SharedLines>,
    shadow: RegisterBank,
    pending: Transaction,
    frame: Frame,
    overflowed: bool,
}

impl ProtocolEngine {
    pub fn new(sender: impl TransactionSender + Send + 'static, lines: Arc<SharedLines>) -> Self {
        Self {
            sender: Box::new(sender),
            lines,
            shadow: RegisterBank::new(),
            pending: Transaction::new(),
            frame: Frame::Deselected,
            overflowed: false,
        }
    }

    /// Chip select asserted. A transaction still in progress is discarded.
    pub fn begin(&mut self) {
        if self.in_transaction() {
            debug!("chip select re-asserted; discarding open transaction");
        }
        self.pending.clear();
        self.overflowed = false;
        self.frame = Frame::Address;
    }

    /// One byte while chip select is asserted. Ignored otherwise.
    pub fn push_byte(&mut self, byte: u8) {
        match self.frame {
            Frame::Deselected => {
                trace!("byte {byte:#04x} outside a transaction ignored");
            }
            Frame::Address => {
                self.frame = Frame::Data { address: byte };
            }
            Frame::Data { address } => {
                if self.overflowed || !self.pending.push(address, byte) {
                    self.overflowed = true;
                    return;
                }
                if address != map::WT_DATA {
                    self.frame = Frame::Data {
                        address: address.wrapping_add(1),
                    };
                }
            }
        }
    }

    /// Chip select released. Commits or discards the transaction.
    pub fn end(&mut self) -> CommitOutcome {
        let frame = std::mem::replace(&mut self.frame, Frame::Deselected);
        let outcome = match frame {
            Frame::Deselected | Frame::Address => CommitOutcome::Empty,
            Frame::Data { .. } if self.overflowed => CommitOutcome::Aborted(AbortReason::Overflow),
            Frame::Data { .. } if self.pending.is_empty() => {
                CommitOutcome::Aborted(AbortReason::DanglingAddress)
            }
            Frame::Data { .. } => self.commit(),
        };
        self.pending.clear();
        self.overflowed = false;

        if let CommitOutcome::Aborted(reason) = outcome {
            warn!("transaction discarded: {reason:?}");
        }
        outcome
    }

    /// Abandon the transaction in progress without committing anything.
    pub fn abort(&mut self) -> CommitOutcome {
        self.abort_with(AbortReason::Cancelled)
    }

    pub(crate) fn abort_with(&mut self, reason: AbortReason) -> CommitOutcome {
        let was_open = self.in_transaction();
        self.frame = Frame::Deselected;
        self.pending.clear();
        self.overflowed = false;
        if was_open {
            warn!("transaction discarded: {reason:?}");
            CommitOutcome::Aborted(reason)
        } else {
            CommitOutcome::Empty
        }
    }

    /// Write one register in its own transaction.
    pub fn write(&mut self, address: u8, value: u8) -> CommitOutcome {
        self.write_burst(address, &[value])
    }

    /// Write consecutive registers starting at `start` in one transaction.
    pub fn write_burst(&mut self, start: u8, data: &[u8]) -> CommitOutcome {
        self.begin();
        self.push_byte(start);
        for &byte in data {
            self.push_byte(byte);
        }
        self.end()
    }

    /// Queue a system reset. On acceptance the shadow returns to defaults
    /// as well.
    pub fn system_reset(&mut self) -> CommitOutcome {
        if self.in_transaction() {
            self.abort();
        }
        match self.sender.push(Transaction::system_reset()) {
            Ok(()) => {
                debug!("system reset queued");
                self.shadow.reset();
                CommitOutcome::Committed(0)
            }
            Err(_) => {
                warn!("system reset dropped: transaction queue full");
                CommitOutcome::Dropped
            }
        }
    }

    /// Read back a register. Status is live; everything else comes from
    /// the shadow bank.
    pub fn read(&self, address: u8) -> u8 {
        if address == map::STATUS {
            self.lines.status()
        } else {
            self.shadow.read(address)
        }
    }

    /// Drive the external gate line.
    pub fn set_gate_input(&self, gate: bool) {
        self.lines.set_gate_input(gate);
    }

    pub fn lines(&self) -> &Arc<SharedLines> {
        &self.lines
    }

    pub fn shadow(&self) -> &RegisterBank {
        &self.shadow
    }

    pub fn in_transaction(&self) -> bool {
        self.frame != Frame::Deselected
    }

    fn commit(&mut self) -> CommitOutcome {
        let transaction = self.pending;
        match self.sender.push(transaction) {
            Ok(()) => {
                for write in transaction.writes() {
                    self.shadow.write(write.address, write.value);
                }
                trace!("committed {} register writes", transaction.len());
                CommitOutcome::Committed(transaction.len())
            }
            Err(_) => {
                warn!("transaction dropped: queue full");
                CommitOutcome::Dropped
            }
        }
    }
}
