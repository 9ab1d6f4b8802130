//! The single random source consulted by every probability branch.

use std::fmt;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_SIMULATION: &str = "elemental-defence/simulation";

/// Injectable random stream owned by the world.
pub struct SimRng {
    inner: Box<dyn RngCore + Send>,
}

impl SimRng {
    /// Creates a ChaCha stream derived from the session seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(derive_stream_seed(
            seed,
            RNG_STREAM_SIMULATION,
        )))
    }

    /// Wraps an arbitrary generator, typically a scripted one in tests.
    #[must_use]
    pub fn from_rng<R>(rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            inner: Box::new(rng),
        }
    }
}

impl fmt::Debug for SimRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimRng").finish_non_exhaustive()
    }
}

impl RngCore for SimRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(seed: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

/// Generator that replays a fixed list of unit samples, cycling when exhausted.
///
/// Each sample `x` in `[0, 1)` is encoded so that `RollExt::unit` yields `x`
/// back exactly, which lets scenarios steer every probability branch.
#[cfg(any(test, feature = "scenario_scaffolding"))]
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    samples: Vec<u64>,
    cursor: usize,
}

#[cfg(any(test, feature = "scenario_scaffolding"))]
impl ScriptedRng {
    /// Creates a stream replaying `units` in order.
    #[must_use]
    pub fn new(units: &[f64]) -> Self {
        let samples = units
            .iter()
            .map(|unit| ((unit.clamp(0.0, 1.0 - f64::EPSILON) * (1u64 << 53) as f64) as u64) << 11)
            .collect();
        Self { samples, cursor: 0 }
    }

    /// Stream whose every sample is `unit`.
    #[must_use]
    pub fn constant(unit: f64) -> Self {
        Self::new(&[unit])
    }
}

#[cfg(any(test, feature = "scenario_scaffolding"))]
impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        let value = self.samples[self.cursor % self.samples.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
