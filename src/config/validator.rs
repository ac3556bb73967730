//! Configuration validation

use super::*;
use crate::task::fibonacci::MAX_DEPTH;
use crate::task::matrix::{matrix_bytes, MAX_DIMENSION};
use anyhow::Result;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    validate_workers(config)?;
    validate_allocation(config)?;
    validate_tasks(config)?;
    Ok(())
}

/// Validate worker settings
fn validate_workers(config: &Config) -> Result<()> {
    if config.worker_count == 0 {
        anyhow::bail!("worker_count must be at least 1");
    }

    if config.iterations == 0 {
        anyhow::bail!("iterations must be at least 1");
    }

    Ok(())
}

/// Validate scratch buffer bounds
fn validate_allocation(config: &Config) -> Result<()> {
    if config.min_allocation_size == 0 {
        anyhow::bail!("min_allocation_size must be at least 1 byte");
    }

    if config.min_allocation_size > config.max_allocation_size {
        anyhow::bail!(
            "min_allocation_size ({}) must not exceed max_allocation_size ({})",
            config.min_allocation_size,
            config.max_allocation_size
        );
    }

    // Every worker can hold one buffer and three matrices at a time
    let per_worker = (config.max_allocation_size as u64)
        .saturating_add(3u64.saturating_mul(matrix_bytes(config.matrix_dimension) as u64));
    let peak = per_worker.saturating_mul(config.worker_count as u64);
    if peak >= 16u64 << 30 {
        log::warn!(
            "Peak scratch memory may reach {} bytes ({} workers x {} bytes)",
            peak,
            config.worker_count,
            per_worker
        );
    }

    Ok(())
}

/// Validate CPU task parameters
fn validate_tasks(config: &Config) -> Result<()> {
    if config.matrix_dimension == 0 {
        anyhow::bail!("matrix_dimension must be at least 1");
    }

    if config.matrix_dimension > MAX_DIMENSION {
        anyhow::bail!(
            "matrix_dimension must be at most {}, got {}",
            MAX_DIMENSION,
            config.matrix_dimension
        );
    }

    if config.matrix_dimension > 2000 {
        log::warn!(
            "matrix_dimension {} will take a very long time per iteration",
            config.matrix_dimension
        );
    }

    if config.fib_depth > MAX_DEPTH {
        anyhow::bail!(
            "fib_depth must be at most {} (larger results overflow u64), got {}",
            MAX_DEPTH,
            config.fib_depth
        );
    }

    if config.fib_depth > 45 {
        log::warn!(
            "fib_depth {} will take a very long time per iteration",
            config.fib_depth
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cfg = Config { worker_count: 0, ..Config::default() };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let cfg = Config { iterations: 0, ..Config::default() };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let cfg = Config {
            min_allocation_size: 2048,
            max_allocation_size: 1024,
            ..Config::default()
        };
        let err = validate_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("must not exceed"));
    }

    #[test]
    fn test_zero_min_size_rejected() {
        let cfg = Config { min_allocation_size: 0, ..Config::default() };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_equal_bounds_accepted() {
        let cfg = Config {
            min_allocation_size: 4096,
            max_allocation_size: 4096,
            ..Config::default()
        };
        assert!(validate_config(&cfg).is_ok());
    }

    #[test]
    fn test_matrix_dimension_rejected() {
        let cfg = Config { matrix_dimension: 0, ..Config::default() };
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_fib_depth_limit() {
        let ok = Config { fib_depth: 93, ..Config::default() };
        assert!(validate_config(&ok).is_ok());

        let too_deep = Config { fib_depth: 94, ..Config::default() };
        assert!(validate_config(&too_deep).is_err());
    }

    #[test]
    fn test_matrix_dimension_limit() {
        let ok = Config { matrix_dimension: MAX_DIMENSION, ..Config::default() };
        assert!(validate_config(&ok).is_ok());

        let too_big = Config { matrix_dimension: MAX_DIMENSION + 1, ..Config::default() };
        let err = validate_config(&too_big).unwrap_err();
        assert!(err.to_string().contains("matrix_dimension must be at most"));

        let huge = Config { matrix_dimension: 1 << 29, ..Config::default() };
        assert!(validate_config(&huge).is_err());
    }
}
