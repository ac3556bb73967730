//! Uniform buffer size sampling

use rand::{Rng, RngCore};

/// Default lower bound for scratch buffers (1 MiB)
pub const MIN_ALLOCATION_SIZE: usize = 1024 * 1024;

/// Default upper bound for scratch buffers (20 MiB)
pub const MAX_ALLOCATION_SIZE: usize = 20 * 1024 * 1024;

/// Uniform sampler over an inclusive byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSampler {
    min: usize,
    max: usize,
}

impl SizeSampler {
    /// Create a sampler over `[min, max]`
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(min: usize, max: usize) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Lower bound (inclusive)
    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound (inclusive)
    pub fn max(&self) -> usize {
        self.max
    }

    /// Draw a size uniformly from `[min, max]`
    ///
    /// Only advances `rng`; no other side effects.
    #[inline(always)]
    pub fn sample(&self, rng: &mut dyn RngCore) -> usize {
        rng.gen_range(self.min..=self.max)
    }
}

impl Default for SizeSampler {
    fn default() -> Self {
        Self::new(MIN_ALLOCATION_SIZE, MAX_ALLOCATION_SIZE)
    }
}
