/*
PDM → PCM
=========

The synth's output is one bit per tick. To listen to it on a sound card
(or look at it on a scope view) the bit stream has to become ordinary
samples again. The analog answer is an RC low-pass; the digital answer is
to average blocks of bits.

    bits:    1 1 0 1 0 1 1 1 | 0 0 1 0 0 0 1 0 | ...
    density:       6/8       |       2/8       |
    sample:       +0.50      |      −0.50      |

A boxcar (plain average) of N bits gives one sample per N ticks, mapped so
all zeros is −1.0 and all ones is +1.0. Larger N means less quantisation
noise and a lower output rate.
*/

#[derive(Debug, Clone)]
pub struct PdmDecimator {
    factor: usize,
    ones: usize,
    count: usize,
}

impl PdmDecimator {
    /// Average `factor` bits per sample. A factor of zero is treated as one.
    pub fn new(factor: usize) -> Self {
        Self {
            factor: factor.max(1),
            ones: 0,
            count: 0,
        }
    }

    pub fn factor(&self) -> usize {
        self.factor
    }

    /// Feed one bit. Returns a sample every `factor` bits.
    #[inline]
    pub fn push(&mut self, bit: bool) -> Option<f32> {
        self.ones += bit as usize;
        self.count += 1;
        if self.count < self.factor {
            return None;
        }
        let sample = density_to_sample(self.ones, self.factor);
        self.ones = 0;
        self.count = 0;
        Some(sample)
    }

    /// Decimate a whole bit buffer into `out`. Returns the number of
    /// samples written, which stops early if `out` is full.
    pub fn process(&mut self, bits: &[bool], out: &mut [f32]) -> usize {
        let mut written = 0;
        for &bit in bits {
            if written == out.len() {
                break;
            }
            if let Some(sample) = self.push(bit) {
                out[written] = sample;
                written += 1;
            }
        }
        written
    }

    pub fn reset(&mut self) {
        self.ones = 0;
        self.count = 0;
    }
}

#[inline]
fn density_to_sample(ones: usize, total: usize) -> f32 {
    2.0 * ones as f32 / total as f32 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_unit_range() {
        let mut decimator = PdmDecimator::new(4);
        let mut out = [0.0f32; 2];
        let written = decimator.process(&[true, true, true, true, false, false, false, false], &mut out);
        assert_eq!(written, 2);
        assert_eq!(out, [1.0, -1.0]);
    }

    #[test]
    fn half_density_is_zero() {
        let mut decimator = PdmDecimator::new(8);
        let bits: Vec<bool> = (0..8).map(|i| i % 2 == 0).collect();
        let mut out = [1.0f32; 1];
        decimator.process(&bits, &mut out);
        assert!(out[0].abs() < 1e-6);
    }

    #[test]
    fn push_yields_every_factor_bits() {
        let mut decimator = PdmDecimator::new(3);
        assert_eq!(decimator.push(true), None);
        assert_eq!(decimator.push(true), None);
        assert!(decimator.push(true).is_some());
        assert_eq!(decimator.push(true), None);
    }

    #[test]
    fn zero_factor_is_one() {
        let mut decimator = PdmDecimator::new(0);
        assert_eq!(decimator.factor(), 1);
        assert_eq!(decimator.push(false), Some(-1.0));
    }
}
