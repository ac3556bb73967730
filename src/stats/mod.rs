//! Run statistics
//!
//! A run records a single wall-clock figure: the time from just before the
//! first worker launches to just after the last one joins. Per-worker and
//! per-iteration numbers are not kept.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Outcome of a complete run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Total wall-clock duration
    pub elapsed: Duration,
    /// Number of workers that ran
    pub workers: usize,
}

impl RunStats {
    pub fn new(elapsed: Duration, workers: usize) -> Self {
        Self { elapsed, workers }
    }

    /// Elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_secs() {
        let stats = RunStats::new(Duration::from_millis(2250), 4);
        assert_eq!(stats.elapsed_secs(), 2.25);
        assert_eq!(stats.workers, 4);
    }

    #[test]
    fn test_zero_elapsed() {
        let stats = RunStats::new(Duration::ZERO, 1);
        assert_eq!(stats.elapsed_secs(), 0.0);
    }
}
