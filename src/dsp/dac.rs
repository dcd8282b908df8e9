/*
Delta-Sigma Output Stage
========================

The synth has one output pin. An 8-bit sample is turned into a stream of
single bits whose DENSITY (fraction of ones) tracks the sample value. An
external RC low-pass smooths the bit stream back into a voltage.

Vocabulary
----------

  error         Running difference between what we wanted to output and
                what we actually output. Signed, kept in an i16.

  feedback      The value the previous bit represents: 255 for a one,
                0 for a zero.

  PDM           Pulse-density modulation. The name of the resulting bit
                stream.


First-Order Loop
----------------

    error += input − feedback(previous bit)
    bit    = error ≥ 0

Each tick the loop adds what it owes and subtracts what it already paid.
Over N ticks the number of ones is within one of N × input / 255, so the
error stays bounded in −255..=255 and the density converges quickly:

    input 0xFF  →  1111111111...
    input 0x80  →  1010101010...  (≈ 50%)
    input 0x00  →  1000000000...  (the first tick sees error = 0)
*/

#[derive(Debug, Clone, Default)]
pub struct DeltaSigmaDac {
    error: i16,
    output: bool,
}

impl DeltaSigmaDac {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one 8-bit sample and emit one bit.
    #[inline]
    pub fn tick(&mut self, input: u8) -> bool {
        let feedback = if self.output { 255 } else { 0 };
        self.error += input as i16 - feedback;
        self.output = self.error >= 0;
        self.output
    }

    pub fn output(&self) -> bool {
        self.output
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
