//! CLI argument parsing using clap

use clap::{ArgAction, Parser, ValueEnum};

/// Allocation pattern selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternArg {
    /// Fixed 10ms pause after every iteration
    Sequential,
    /// Pause drawn uniformly from 5-20ms
    Random,
    /// No pause
    Burst,
}

/// MemPulse - CPU and memory burn-in workload generator
#[derive(Parser, Debug)]
#[command(name = "mempulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Iterations per worker
    #[arg(short = 'i', long, default_value = "500")]
    pub iterations: usize,

    /// Smallest scratch buffer (e.g., 1M, 512k)
    #[arg(long, default_value = "1M")]
    pub min_size: String,

    /// Largest scratch buffer (e.g., 20M)
    #[arg(long, default_value = "20M")]
    pub max_size: String,

    /// Side length of the square matrices for the matrix task
    #[arg(long, default_value = "300")]
    pub matrix_dim: usize,

    /// Fibonacci index computed by the recursive task
    #[arg(long, default_value = "35")]
    pub fib_depth: u32,

    /// Force all workers onto one allocation pattern
    #[arg(long, value_enum)]
    pub pattern: Option<PatternArg>,

    /// Base seed for worker generators (reproducible runs)
    #[arg(long, env = "MEMPULSE_SEED")]
    pub seed: Option<u64>,

    /// Pin each worker thread to its own CPU core (Linux only)
    #[arg(long)]
    pub pin: bool,

    /// Print a JSON run summary after the text output
    #[arg(long)]
    pub json: bool,

    /// Validate and print the configuration, then exit
    #[arg(long)]
    pub dry_run: bool,

    /// Increase diagnostic verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1");
        }

        if self.iterations == 0 {
            anyhow::bail!("iterations must be at least 1");
        }

        if self.matrix_dim == 0 {
            anyhow::bail!("matrix_dim must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mempulse"]).unwrap();
        assert_eq!(cli.threads, None);
        assert_eq!(cli.iterations, 500);
        assert_eq!(cli.min_size, "1M");
        assert_eq!(cli.max_size, "20M");
        assert_eq!(cli.matrix_dim, 300);
        assert_eq!(cli.fib_depth, 35);
        assert_eq!(cli.pattern, None);
        assert!(!cli.json);
        assert!(!cli.dry_run);
        assert_eq!(cli.verbose, 0);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "mempulse", "-t", "4", "-i", "2", "--min-size", "4k", "--max-size", "64k",
            "--pattern", "burst", "--seed", "7", "-vv", "--json",
        ])
        .unwrap();
        assert_eq!(cli.threads, Some(4));
        assert_eq!(cli.iterations, 2);
        assert_eq!(cli.min_size, "4k");
        assert_eq!(cli.max_size, "64k");
        assert_eq!(cli.pattern, Some(PatternArg::Burst));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.verbose, 2);
        assert!(cli.json);
    }

    #[test]
    fn test_validate_threads() {
        let cli = Cli::try_parse_from(["mempulse", "--threads", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_validate_iterations() {
        let cli = Cli::try_parse_from(["mempulse", "--iterations", "0"]).unwrap();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_unknown_pattern_rejected() {
        assert!(Cli::try_parse_from(["mempulse", "--pattern", "zigzag"]).is_err());
    }
}
