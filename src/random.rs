//! Random value generator
//!
//! A single ChaCha8 stream shared by every factory of a registry. Draws go
//! through a mutex so that one generator can back factories used from several
//! test threads; separate generators are fully independent.

use crate::error::EmptySampleError;
use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::ops::Range;
use std::sync::{Mutex, PoisonError};

#[derive(Debug)]
pub struct RandomValueGenerator {
    rng: Mutex<ChaCha8Rng>,
}

impl RandomValueGenerator {
    /// Generator seeded from the operating system.
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Generator with a fixed seed. Sequences are stable for one build of the
    /// crate but not promised across versions.
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self { rng: Mutex::new(rng) }
    }

    fn with_rng<R>(&self, draw: impl FnOnce(&mut ChaCha8Rng) -> R) -> R {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        draw(&mut rng)
    }

    pub fn next_bool(&self) -> bool {
        self.with_rng(|rng| rng.gen())
    }

    pub fn next_u64(&self) -> u64 {
        self.with_rng(|rng| rng.gen())
    }

    /// Uniform draw from `[0, 1)`.
    pub fn next_f64(&self) -> f64 {
        self.with_rng(|rng| rng.gen())
    }

    /// Uniform draw from `[0, bound)`, or 0 when `bound` is 0.
    pub fn next_below(&self, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        self.with_rng(|rng| rng.gen_range(0..bound))
    }

    /// Uniform draw from `low..=high`; returns `low` if the range is empty.
    pub fn next_size(&self, low: usize, high: usize) -> usize {
        if high <= low {
            return low;
        }
        self.with_rng(|rng| rng.gen_range(low..=high))
    }

    pub fn next_i64_in(&self, range: Range<i64>) -> i64 {
        if range.is_empty() {
            return range.start;
        }
        self.with_rng(|rng| rng.gen_range(range))
    }

    pub fn next_alphanumeric(&self) -> char {
        self.with_rng(|rng| char::from(rng.sample(Alphanumeric)))
    }

    pub fn next_alphanumeric_string(&self, length: usize) -> String {
        self.with_rng(|rng| {
            rng.sample_iter(&Alphanumeric)
                .take(length)
                .map(char::from)
                .collect()
        })
    }

    /// Pick one element uniformly, `None` for an empty slice.
    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = self.next_below(items.len() as u64) as usize;
        items.get(index)
    }

    /// Pick one element uniformly; an empty slice is an error.
    pub fn get_from<'a, T>(&self, items: &'a [T]) -> Result<&'a T, EmptySampleError> {
        self.choose(items).ok_or(EmptySampleError)
    }
}

impl Default for RandomValueGenerator {
    fn default() -> Self {
        Self::new()
    }
}
