#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, PushError};

/// Most data bytes one chip-select period may carry.
pub const MAX_TRANSACTION_WRITES: usize = 128;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterWrite {
    pub address: u8,
    pub value: u8,
}

/// A committed transaction on its way to the tick pipeline.
///
/// Fixed-size and `Copy` so it can live in a preallocated ring without the
/// tick side ever touching the allocator.
#[derive(Debug, Clone, Copy)]
pub struct Transaction {
    writes: [RegisterWrite; MAX_TRANSACTION_WRITES],
    len: u8,
    system_reset: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self {
            writes: [RegisterWrite::default(); MAX_TRANSACTION_WRITES],
            len: 0,
            system_reset: false,
        }
    }

    /// A transaction that restores the synth to its power-on state.
    pub fn system_reset() -> Self {
        Self {
            system_reset: true,
            ..Self::new()
        }
    }

    /// Append a write. Returns false when the transaction is full.
    pub fn push(&mut self, address: u8, value: u8) -> bool {
        let len = self.len as usize;
        if len == MAX_TRANSACTION_WRITES {
            return false;
        }
        self.writes[len] = RegisterWrite { address, value };
        self.len += 1;
        true
    }

    pub fn writes(&self) -> &[RegisterWrite] {
        &self.writes[..self.len as usize]
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_system_reset(&self) -> bool {
        self.system_reset
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.system_reset = false;
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// Why a transaction was discarded at chip-select release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// An address byte with no data byte after it.
    DanglingAddress,
    /// Chip select released with a byte half shifted in.
    PartialByte,
    /// More data bytes than one transaction holds.
    Overflow,
    /// The host abandoned the transaction.
    Cancelled,
}

/// What happened to a transaction at chip-select release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Queued for the tick pipeline; the count is the number of writes.
    Committed(usize),
    /// Nothing was sent. Not an error.
    Empty,
    /// Discarded before reaching the queue. No register changed.
    Aborted(AbortReason),
    /// Well-formed, but the queue was full. No register changed.
    Dropped,
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}

/// Host side of the handoff to the tick pipeline.
pub trait TransactionSender {
    /// Queue a transaction, handing it back if there is no room.
    fn push(&mut self, transaction: Transaction) -> Result<(), Transaction>;
}

/// Tick side of the handoff.
pub trait TransactionReceiver {
    fn pop(&mut self) -> Option<Transaction>;
}

#[cfg(feature = "rtrb")]
impl TransactionSender for Producer<Transaction> {
    fn push(&mut self, transaction: Transaction) -> Result<(), Transaction> {
        Producer::push(self, transaction).map_err(|err| match err {
            PushError::Full(transaction) => transaction,
        })
    }
}

#[cfg(feature = "rtrb")]
impl TransactionReceiver for Consumer<Transaction> {
    fn pop(&mut self) -> Option<Transaction> {
        Consumer::pop(self).ok()
    }
}
