//! CPU-bound tasks
//!
//! This module defines the three interchangeable CPU workloads a worker can run
//! in one iteration, and the policy that picks between them.
//!
//! # Task Kinds
//!
//! - **Matrix multiply**: naive O(n³) product of two random square matrices
//! - **SHA-256 digest**: hash of the iteration's scratch buffer
//! - **Fibonacci**: naive double recursion, no memoization
//!
//! # Selection
//!
//! A value `r` is drawn uniformly from `[0, 1)` for every iteration:
//! matrix multiply if `r < 1/3`, digest if `r < 2/3`, Fibonacci otherwise.
//!
//! # Checksums
//!
//! Every task folds its output into a [`Checksum`]. The worker compares it to a
//! sentinel no realistic input reaches and only reports on a match, which keeps
//! the result observable so the work cannot be optimized away.

pub mod digest;
pub mod fibonacci;
pub mod matrix;

use crate::error::IterationError;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use digest::Sha256Digest;
pub use fibonacci::NaiveFibonacci;
pub use matrix::MatrixMultiply;

/// Which CPU task ran
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    MatrixMultiply,
    Digest,
    Fibonacci,
}

impl TaskKind {
    /// Map a uniform draw from `[0, 1)` to a task kind
    pub fn from_draw(r: f64) -> Self {
        if r < 1.0 / 3.0 {
            TaskKind::MatrixMultiply
        } else if r < 2.0 / 3.0 {
            TaskKind::Digest
        } else {
            TaskKind::Fibonacci
        }
    }

    /// Draw a value from `rng` and map it to a task kind
    pub fn select(rng: &mut dyn RngCore) -> Self {
        Self::from_draw(rng.gen::<f64>())
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::MatrixMultiply => write!(f, "matrix multiply"),
            TaskKind::Digest => write!(f, "sha256"),
            TaskKind::Fibonacci => write!(f, "fibonacci"),
        }
    }
}

/// Folded output of a task
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Checksum {
    Float(f64),
    Unsigned(u64),
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Float(v) => write!(f, "{}", v),
            Checksum::Unsigned(v) => write!(f, "{}", v),
        }
    }
}

/// Result of one task invocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskOutput {
    pub kind: TaskKind,
    pub checksum: Checksum,
}

impl TaskOutput {
    /// True when the checksum equals the task's sentinel value
    ///
    /// Sentinels: `-1.0` for matrix multiply, `u64::MAX` for the digest,
    /// `0` for Fibonacci.
    pub fn hits_sentinel(&self) -> bool {
        match (self.kind, self.checksum) {
            (TaskKind::MatrixMultiply, Checksum::Float(v)) => v == -1.0,
            (TaskKind::Digest, Checksum::Unsigned(v)) => v == u64::MAX,
            (TaskKind::Fibonacci, Checksum::Unsigned(v)) => v == 0,
            _ => false,
        }
    }

    /// Label used when a sentinel hit is reported
    pub fn label(&self) -> &'static str {
        match self.kind {
            TaskKind::MatrixMultiply => "Matrix multiplication checksum",
            TaskKind::Digest => "SHA-256 checksum",
            TaskKind::Fibonacci => "Fibonacci result",
        }
    }
}

/// CPU task trait
///
/// Implementations must be `Send` since each worker thread owns its own set.
/// `buffer` is the iteration's scratch buffer; tasks that do not read it
/// ignore it.
pub trait CpuTask: Send {
    /// Kind of this task
    fn kind(&self) -> TaskKind;

    /// Run the task once and fold the output into a checksum
    ///
    /// Working memory beyond `buffer` must be acquired fallibly and reported
    /// as [`IterationError::Allocation`].
    fn run(&self, buffer: &[u8], rng: &mut dyn RngCore) -> Result<Checksum, IterationError>;
}

/// The three CPU tasks of one worker
#[derive(Debug, Clone)]
pub struct CpuTaskSet {
    matrix: MatrixMultiply,
    digest: Sha256Digest,
    fibonacci: NaiveFibonacci,
}

impl CpuTaskSet {
    /// Create a task set with the given matrix dimension and Fibonacci depth
    pub fn new(matrix_dimension: usize, fib_depth: u32) -> Self {
        Self {
            matrix: MatrixMultiply::new(matrix_dimension),
            digest: Sha256Digest,
            fibonacci: NaiveFibonacci::new(fib_depth),
        }
    }

    /// Get the task for a kind
    pub fn task(&self, kind: TaskKind) -> &dyn CpuTask {
        match kind {
            TaskKind::MatrixMultiply => &self.matrix,
            TaskKind::Digest => &self.digest,
            TaskKind::Fibonacci => &self.fibonacci,
        }
    }

    /// Run exactly one task of the given kind
    pub fn run(
        &self,
        kind: TaskKind,
        buffer: &[u8],
        rng: &mut dyn RngCore,
    ) -> Result<TaskOutput, IterationError> {
        let task = self.task(kind);
        let checksum = task.run(buffer, rng)?;
        Ok(TaskOutput {
            kind: task.kind(),
            checksum: std::hint::black_box(checksum),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_from_draw_thresholds() {
        assert_eq!(TaskKind::from_draw(0.0), TaskKind::MatrixMultiply);
        assert_eq!(TaskKind::from_draw(0.3333), TaskKind::MatrixMultiply);
        assert_eq!(TaskKind::from_draw(1.0 / 3.0), TaskKind::Digest);
        assert_eq!(TaskKind::from_draw(0.5), TaskKind::Digest);
        assert_eq!(TaskKind::from_draw(0.6666), TaskKind::Digest);
        assert_eq!(TaskKind::from_draw(2.0 / 3.0), TaskKind::Fibonacci);
        assert_eq!(TaskKind::from_draw(0.9999), TaskKind::Fibonacci);
    }

    #[test]
    fn test_select_is_roughly_uniform() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let mut counts = [0u32; 3];

        for _ in 0..9000 {
            let idx = match TaskKind::select(&mut rng) {
                TaskKind::MatrixMultiply => 0,
                TaskKind::Digest => 1,
                TaskKind::Fibonacci => 2,
            };
            counts[idx] += 1;
        }

        // Each kind should get about 3000 draws; allow 15% deviation
        for count in counts {
            assert!(count > 2550 && count < 3450, "count {} outside expected range", count);
        }
    }

    #[test]
    fn test_sentinels() {
        let hit = |kind, checksum| TaskOutput { kind, checksum }.hits_sentinel();

        assert!(hit(TaskKind::MatrixMultiply, Checksum::Float(-1.0)));
        assert!(!hit(TaskKind::MatrixMultiply, Checksum::Float(1.0)));
        assert!(hit(TaskKind::Digest, Checksum::Unsigned(u64::MAX)));
        assert!(!hit(TaskKind::Digest, Checksum::Unsigned(4080)));
        assert!(hit(TaskKind::Fibonacci, Checksum::Unsigned(0)));
        assert!(!hit(TaskKind::Fibonacci, Checksum::Unsigned(9227465)));
        assert!(!hit(TaskKind::Fibonacci, Checksum::Float(0.0)));
    }

    #[test]
    fn test_task_set_runs_requested_kind() {
        let tasks = CpuTaskSet::new(4, 10);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let buffer = vec![0u8; 128];

        for kind in [TaskKind::MatrixMultiply, TaskKind::Digest, TaskKind::Fibonacci] {
            assert_eq!(tasks.task(kind).kind(), kind);
            let output = tasks.run(kind, &buffer, &mut rng).unwrap();
            assert_eq!(output.kind, kind);
            assert!(!output.hits_sentinel());
        }
    }

    #[test]
    fn test_fibonacci_output_through_task_set() {
        let tasks = CpuTaskSet::new(2, 10);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let output = tasks.run(TaskKind::Fibonacci, &[], &mut rng).unwrap();
        assert_eq!(output.checksum, Checksum::Unsigned(55));
    }

    #[test]
    fn test_oversized_matrix_fails_without_aborting() {
        let tasks = CpuTaskSet::new(1 << 29, 5);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);

        let result = tasks.run(TaskKind::MatrixMultiply, &[], &mut rng);
        assert!(matches!(result, Err(IterationError::Allocation { .. })));

        // The other tasks are unaffected by the matrix dimension
        assert!(tasks.run(TaskKind::Fibonacci, &[], &mut rng).is_ok());
    }
}
