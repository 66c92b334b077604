//! Injectable shuffle sources.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// In-place permutation of a slice.
pub trait Shuffle {
    fn shuffle<T>(&mut self, items: &mut [T]);
}

impl<S: Shuffle + ?Sized> Shuffle for &mut S {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        (**self).shuffle(items);
    }
}

/// Leaves every slice untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoShuffle;

impl Shuffle for NoShuffle {
    fn shuffle<T>(&mut self, _items: &mut [T]) {}
}

/// Uniform shuffle driven by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngShuffle<R> {
    rng: R,
}

impl<R: Rng> RngShuffle<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngShuffle<StdRng> {
    /// Reproducible source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Shuffle for RngShuffle<R> {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}
