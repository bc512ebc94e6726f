//! Explicit pseudo-random handle threaded through every generation stage.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

pub struct GenRng {
    inner: ChaCha8Rng,
}

impl GenRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform value in `[min_value, max_value]`.
    pub fn range_usize(&mut self, min_value: usize, max_value: usize) -> usize {
        debug_assert!(min_value <= max_value);
        let range_size = (max_value - min_value) as u64 + 1;
        min_value + (self.next_u64() % range_size) as usize
    }

    /// Uniform value in `[min_value, max_value]`.
    pub fn range_i32(&mut self, min_value: i32, max_value: i32) -> i32 {
        debug_assert!(min_value <= max_value);
        let range_size = (i64::from(max_value) - i64::from(min_value)) as u64 + 1;
        (i64::from(min_value) + (self.next_u64() % range_size) as i64) as i32
    }

    /// Uniform value in `[0, 1)` with 53 bits of precision.
    pub fn unit_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1_u64 << 53) as f64)
    }

    /// Uniform value in `[0, upper)`.
    pub fn uniform_f32(&mut self, upper: f32) -> f32 {
        let value = (self.unit_f64() * f64::from(upper)) as f32;
        // Narrowing to f32 can round up onto the bound.
        if value < upper { value } else { upper.next_down().max(0.0) }
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit_f64() < probability
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_with = self.range_usize(0, index);
            items.swap(index, swap_with);
        }
    }

    /// Index drawn with probability proportional to its weight. Falls back to
    /// a uniform pick when every weight is zero; `None` only for an empty slice.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }
        let total: u64 = weights.iter().map(|&weight| u64::from(weight)).sum();
        if total == 0 {
            return Some(self.range_usize(0, weights.len() - 1));
        }
        let mut roll = self.next_u64() % total;
        for (index, &weight) in weights.iter().enumerate() {
            let weight = u64::from(weight);
            if roll < weight {
                return Some(index);
            }
            roll -= weight;
        }
        Some(weights.len() - 1)
    }
}
