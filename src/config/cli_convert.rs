//! CLI to Config conversion utilities

use crate::config::cli::{Cli, PatternArg};
use crate::config::Config;
use crate::pattern::AllocationPatternKind;
use crate::worker::affinity::num_cpus;
use anyhow::{Context, Result};

/// Parse a size string (e.g., "1G", "20M", "4k") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with('k') || s.ends_with("kb") {
        (s.trim_end_matches("kb").trim_end_matches('k'), 1024u64)
    } else if s.ends_with('m') || s.ends_with("mb") {
        (s.trim_end_matches("mb").trim_end_matches('m'), 1024 * 1024)
    } else if s.ends_with('g') || s.ends_with("gb") {
        (s.trim_end_matches("gb").trim_end_matches('g'), 1024 * 1024 * 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Convert CLI PatternArg to AllocationPatternKind
pub fn convert_pattern(arg: PatternArg) -> AllocationPatternKind {
    match arg {
        PatternArg::Sequential => AllocationPatternKind::Sequential,
        PatternArg::Random => AllocationPatternKind::Random,
        PatternArg::Burst => AllocationPatternKind::Burst,
    }
}

/// Build configuration from CLI arguments
pub fn build_config(cli: &Cli) -> Result<Config> {
    let min_allocation_size = parse_size(&cli.min_size).context("Invalid min size")?;
    let max_allocation_size = parse_size(&cli.max_size).context("Invalid max size")?;

    Ok(Config {
        worker_count: cli.threads.unwrap_or_else(num_cpus),
        iterations: cli.iterations,
        min_allocation_size: usize::try_from(min_allocation_size)
            .context("min size does not fit in memory address space")?,
        max_allocation_size: usize::try_from(max_allocation_size)
            .context("max size does not fit in memory address space")?,
        matrix_dimension: cli.matrix_dim,
        fib_depth: cli.fib_depth,
        pattern: cli.pattern.map(convert_pattern),
        seed: cli.seed,
        pin_workers: cli.pin,
    })
}
