use rand::{Rng, RngCore};

/// Probability helpers shared by every system that rolls dice.
///
/// All rolls derive from a single uniform sample in `[0, 1)` so that a
/// scripted source can steer every branch precisely.
pub trait RollExt: RngCore {
    /// Uniform sample in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Returns true with the provided probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let scaled = (self.unit() * len as f64) as usize;
        scaled.min(len.saturating_sub(1))
    }

    /// Uniform sample in `[low, high)`.
    fn between(&mut self, low: f64, high: f64) -> f64 {
        low + self.unit() * (high - low)
    }
}

impl<R: RngCore> RollExt for R {
    fn unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}
