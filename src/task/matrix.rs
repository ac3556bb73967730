//! Dense matrix multiplication task
//!
//! Matrices are allocated fallibly: a dimension too large for the allocator
//! fails the iteration with [`IterationError::Allocation`] instead of
//! aborting the process.

use super::{Checksum, CpuTask, TaskKind};
use crate::error::IterationError;
use rand::{Rng, RngCore};

/// Default matrix dimension
pub const DEFAULT_DIMENSION: usize = 300;

/// Largest accepted dimension: 2 GiB per matrix, about 4.4e12 multiply-adds
pub const MAX_DIMENSION: usize = 16_384;

/// Naive O(n³) product of two random `n x n` matrices of `f64`
///
/// All three matrices are allocated per call and dropped when it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixMultiply {
    dimension: usize,
}

impl MatrixMultiply {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for MatrixMultiply {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

/// Bytes needed by one `n x n` matrix, saturating at `usize::MAX`
pub fn matrix_bytes(n: usize) -> usize {
    n.saturating_mul(n).saturating_mul(std::mem::size_of::<f64>())
}

/// Empty matrix with room for exactly `n * n` entries
fn reserve_matrix(n: usize) -> Result<Vec<f64>, IterationError> {
    // An overflowing n * n saturates to a request the allocator always rejects
    let len = n.saturating_mul(n);
    let mut m = Vec::new();
    m.try_reserve_exact(len)
        .map_err(|source| IterationError::Allocation {
            size: matrix_bytes(n),
            source,
        })?;
    Ok(m)
}

/// Row-major `n x n` matrix filled with values from `[0, 1)`
pub fn random_matrix(n: usize, rng: &mut dyn RngCore) -> Result<Vec<f64>, IterationError> {
    let mut m = reserve_matrix(n)?;
    m.extend((0..n * n).map(|_| rng.gen::<f64>()));
    Ok(m)
}

/// Multiply two row-major `n x n` matrices
///
/// # Panics
///
/// Panics if either input does not hold exactly `n * n` entries.
pub fn multiply(a: &[f64], b: &[f64], n: usize) -> Result<Vec<f64>, IterationError> {
    assert_eq!(a.len(), n * n, "left matrix is not {}x{}", n, n);
    assert_eq!(b.len(), n * n, "right matrix is not {}x{}", n, n);

    let mut result = reserve_matrix(n)?;
    result.resize(n * n, 0.0);
    for i in 0..n {
        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..n {
                sum += a[i * n + k] * b[k * n + j];
            }
            result[i * n + j] = sum;
        }
    }
    Ok(result)
}

impl CpuTask for MatrixMultiply {
    fn kind(&self) -> TaskKind {
        TaskKind::MatrixMultiply
    }

    fn run(&self, _buffer: &[u8], rng: &mut dyn RngCore) -> Result<Checksum, IterationError> {
        let n = self.dimension;
        let a = random_matrix(n, rng)?;
        let b = random_matrix(n, rng)?;
        let result = multiply(&a, &b, n)?;
        Ok(Checksum::Float(result.iter().sum()))
    }
}
