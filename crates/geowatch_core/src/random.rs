//! crates/geowatch_core/src/random.rs
//!
//! The shared random source behind ids and synthetic data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use uuid::Builder;

/// A cloneable handle to one RNG. Seed it to get reproducible output.
#[derive(Clone)]
pub struct RandomSource {
    inner: Arc<Mutex<StdRng>>,
}

impl RandomSource {
    pub fn from_os() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            inner: Arc::new(Mutex::new(rng)),
        }
    }

    /// Runs `f` with exclusive access to the RNG.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A panic inside `f` cannot leave the RNG in a bad state, so poisoning is ignored.
        let mut rng = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    pub fn record_id(&self) -> String {
        self.with(|rng| record_id(rng))
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_os()
    }
}

/// A fresh record id: a v4 UUID in simple (hyphenless) form drawn from `rng`.
pub fn record_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.random();
    Builder::from_random_bytes(bytes)
        .into_uuid()
        .simple()
        .to_string()
}
