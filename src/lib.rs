//! MemPulse - CPU and memory burn-in workload generator
//!
//! MemPulse runs a fixed number of worker threads. Each worker repeatedly
//! allocates a randomly sized scratch buffer, fills it with random bytes,
//! runs one of three CPU-bound tasks on it and then pauses according to its
//! allocation pattern. The run reports per-worker progress lines and the total
//! wall-clock time.
//!
//! # Architecture
//!
//! - **Workers**: one OS thread each, own RNG, own allocation pattern
//! - **CPU tasks**: naive matrix multiply, SHA-256 digest, recursive Fibonacci
//! - **Allocation patterns**: sequential (fixed pause), random (jittered pause), burst (no pause)
//! - **Reporting**: a serialized line channel so output from workers never interleaves
//!
//! # Example
//!
//! ```no_run
//! use mempulse::{Config, Orchestrator, Reporter};
//! use std::sync::Arc;
//!
//! let config = Arc::new(Config { iterations: 10, ..Config::default() });
//! let orchestrator = Orchestrator::new(config, Arc::new(Reporter::stdout()));
//! let stats = orchestrator.run().unwrap();
//! println!("{} workers in {:.3}s", stats.workers, stats.elapsed_secs());
//! ```

pub mod config;
pub mod coordinator;
pub mod distribution;
pub mod error;
pub mod output;
pub mod pattern;
pub mod stats;
pub mod task;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use coordinator::Orchestrator;
pub use error::IterationError;
pub use output::Reporter;
pub use stats::RunStats;
pub use worker::Worker;

/// Result type used throughout MemPulse
pub type Result<T> = anyhow::Result<T>;
