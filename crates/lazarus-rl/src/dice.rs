//! Dice rolls and random picks for content generation.

use rand::distr::uniform::SampleUniform;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// A dice roller over any random number generator.
pub struct Dice<R: Rng> {
    pub rng: R,
}

impl<R: Rng> Dice<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Sum of `times` rolls of a die with `sides` faces.
    ///
    /// A one-sided die always yields `times`; zero sides or zero rolls
    /// yield 0.
    pub fn roll(&mut self, sides: u32, times: u32) -> u64 {
        match (sides, times) {
            (0, _) | (_, 0) => 0,
            (1, _) => u64::from(times),
            _ => (0..times)
                .map(|_| u64::from(self.rng.random_range(1..=sides)))
                .sum(),
        }
    }

    /// `true` with probability `1/n`. Always `true` for `n < 2`.
    pub fn one_in(&mut self, n: u32) -> bool {
        n < 2 || self.rng.random_range(1..=n) == 1
    }

    /// A value in the inclusive range between `lo` and `hi`, in either order.
    pub fn range<T>(&mut self, lo: T, hi: T) -> T
    where
        T: SampleUniform + PartialOrd,
    {
        if hi < lo {
            self.rng.random_range(hi..=lo)
        } else {
            self.rng.random_range(lo..=hi)
        }
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl Dice<StdRng> {
    /// A reproducible roller.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// A roller seeded from the operating system.
    pub fn from_os_rng() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}
