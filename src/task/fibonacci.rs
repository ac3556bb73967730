//! Naive recursive Fibonacci task
//!
//! The double recursion is the load. Do not memoize.

use super::{Checksum, CpuTask, TaskKind};
use crate::error::IterationError;
use rand::RngCore;

/// Default recursion depth
pub const DEFAULT_DEPTH: u32 = 35;

/// Largest `n` whose Fibonacci number fits in a `u64`
pub const MAX_DEPTH: u32 = 93;

/// Naive Fibonacci of a fixed depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NaiveFibonacci {
    depth: u32,
}

impl NaiveFibonacci {
    pub fn new(depth: u32) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for NaiveFibonacci {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

/// fib(0) = 0, fib(1) = 1, fib(n) = fib(n - 1) + fib(n - 2)
#[inline(never)]
pub fn naive_fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    naive_fibonacci(n - 1) + naive_fibonacci(n - 2)
}

impl CpuTask for NaiveFibonacci {
    fn kind(&self) -> TaskKind {
        TaskKind::Fibonacci
    }

    fn run(&self, _buffer: &[u8], _rng: &mut dyn RngCore) -> Result<Checksum, IterationError> {
        Ok(Checksum::Unsigned(naive_fibonacci(std::hint::black_box(self.depth))))
    }
}
