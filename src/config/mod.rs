//! Configuration module
//!
//! Handles CLI argument parsing and validation. The resulting [`Config`] is
//! built once at startup and shared read-only with every worker.

pub mod cli;
pub mod cli_convert;
pub mod validator;

use crate::distribution::size::{MAX_ALLOCATION_SIZE, MIN_ALLOCATION_SIZE};
use crate::pattern::AllocationPatternKind;
use crate::task::{fibonacci, matrix};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of iterations per worker
pub const DEFAULT_ITERATIONS: usize = 500;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Number of worker threads (default: available processing units)
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,
    /// Iterations per worker
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Smallest scratch buffer in bytes (inclusive)
    #[serde(default = "default_min_allocation_size")]
    pub min_allocation_size: usize,
    /// Largest scratch buffer in bytes (inclusive)
    #[serde(default = "default_max_allocation_size")]
    pub max_allocation_size: usize,
    /// Side length of the square matrices
    #[serde(default = "default_matrix_dimension")]
    pub matrix_dimension: usize,
    /// Fibonacci index computed by the recursive task
    #[serde(default = "default_fib_depth")]
    pub fib_depth: u32,
    /// Force every worker onto one allocation pattern (None = each picks its own)
    #[serde(default)]
    pub pattern: Option<AllocationPatternKind>,
    /// Base seed for worker generators (None = time-derived)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pin worker `i` to CPU core `i % cores`
    #[serde(default)]
    pub pin_workers: bool,
}

fn default_worker_count() -> usize {
    crate::worker::affinity::num_cpus()
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

fn default_min_allocation_size() -> usize {
    MIN_ALLOCATION_SIZE
}

fn default_max_allocation_size() -> usize {
    MAX_ALLOCATION_SIZE
}

fn default_matrix_dimension() -> usize {
    matrix::DEFAULT_DIMENSION
}

fn default_fib_depth() -> u32 {
    fibonacci::DEFAULT_DEPTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            iterations: default_iterations(),
            min_allocation_size: default_min_allocation_size(),
            max_allocation_size: default_max_allocation_size(),
            matrix_dimension: default_matrix_dimension(),
            fib_depth: default_fib_depth(),
            pattern: None,
            seed: None,
            pin_workers: false,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Workers:          {}", self.worker_count)?;
        writeln!(f, "  Iterations:       {}", self.iterations)?;
        writeln!(
            f,
            "  Allocation size:  {} - {} bytes",
            self.min_allocation_size, self.max_allocation_size
        )?;
        writeln!(
            f,
            "  Matrix dimension: {}x{}",
            self.matrix_dimension, self.matrix_dimension
        )?;
        writeln!(f, "  Fibonacci depth:  {}", self.fib_depth)?;
        match self.pattern {
            Some(kind) => writeln!(f, "  Pattern:          {}", kind)?,
            None => writeln!(f, "  Pattern:          per-worker random")?,
        }
        match self.seed {
            Some(seed) => writeln!(f, "  Seed:             {}", seed)?,
            None => writeln!(f, "  Seed:             time-derived")?,
        }
        write!(f, "  CPU pinning:      {}", if self.pin_workers { "on" } else { "off" })
    }
}
