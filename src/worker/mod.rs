//! Worker thread implementation
//!
//! This module implements the Worker, the execution unit that generates load.
//! Each worker thread runs independently with its own generator, scratch
//! buffers and matrices; the only thing workers share is the [`Reporter`].
//!
//! # Lifecycle
//!
//! 1. **Starting**: seed the generator, pick the allocation pattern, announce start
//! 2. **Iterating**: repeat allocate → fill → compute → release → pause
//! 3. **Completed**: announce completion
//!
//! A failure inside an iteration is reported and the loop moves on to the next
//! iteration. Failures while starting are returned from [`Worker::new`].
//!
//! # Example
//!
//! ```no_run
//! use mempulse::config::Config;
//! use mempulse::output::Reporter;
//! use mempulse::worker::Worker;
//! use std::sync::atomic::AtomicBool;
//! use std::sync::Arc;
//!
//! let config = Arc::new(Config { iterations: 10, ..Config::default() });
//! let reporter = Arc::new(Reporter::stdout());
//! let stop = Arc::new(AtomicBool::new(false));
//!
//! let mut worker = Worker::new(0, config, reporter, stop)?;
//! let completed = worker.run();
//! assert_eq!(completed, 10);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod affinity;

use crate::config::Config;
use crate::distribution::SizeSampler;
use crate::error::IterationError;
use crate::output::Reporter;
use crate::pattern::{self, AllocationPatternKind};
use crate::task::{CpuTaskSet, TaskKind, TaskOutput};
use crate::util::buffer::ScratchBuffer;
use crate::Result;
use anyhow::Context;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Worker lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Starting,
    Iterating,
    Completed,
}

/// Worker thread that runs the allocate-compute loop
///
/// # Thread Safety
///
/// Each worker owns its generator and task set and is designed to run in its
/// own thread. Output goes through the shared, internally locked [`Reporter`].
pub struct Worker {
    /// Worker ID (for identification in report lines)
    id: usize,

    /// Shared configuration
    config: Arc<Config>,

    /// Shared reporting channel
    reporter: Arc<Reporter>,

    /// Checked at every iteration boundary
    stop_flag: Arc<AtomicBool>,

    /// Private generator for sizes, fill bytes, task choice and delays
    rng: Xoshiro256PlusPlus,

    /// Allocation pattern, fixed for the whole run
    pattern: AllocationPatternKind,

    sampler: SizeSampler,
    tasks: CpuTaskSet,
    state: WorkerState,
}

impl Worker {
    /// Create a new worker
    ///
    /// # Arguments
    ///
    /// * `id` - Worker ID for identification
    /// * `config` - Shared configuration
    /// * `reporter` - Shared reporting channel
    /// * `stop_flag` - Cancellation flag checked between iterations
    ///
    /// # Errors
    ///
    /// Returns an error if the generator cannot be seeded.
    pub fn new(
        id: usize,
        config: Arc<Config>,
        reporter: Arc<Reporter>,
        stop_flag: Arc<AtomicBool>,
    ) -> Result<Self> {
        let seed = worker_seed(id, config.seed)?;
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        let pattern = match config.pattern {
            Some(kind) => kind,
            None => AllocationPatternKind::choose(&mut rng),
        };

        let sampler = SizeSampler::new(config.min_allocation_size, config.max_allocation_size);
        let tasks = CpuTaskSet::new(config.matrix_dimension, config.fib_depth);

        log::debug!("Worker {} seeded with {:#018x}, pattern {}", id, seed, pattern);

        Ok(Self {
            id,
            config,
            reporter,
            stop_flag,
            rng,
            pattern,
            sampler,
            tasks,
            state: WorkerState::Starting,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Allocation pattern chosen at creation
    pub fn pattern(&self) -> AllocationPatternKind {
        self.pattern
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Run the worker to completion
    ///
    /// Returns the number of iterations executed, which is less than the
    /// configured count only if the stop flag was raised.
    pub fn run(&mut self) -> usize {
        if self.config.pin_workers {
            let core = affinity::core_for_worker(self.id);
            match affinity::pin_current_thread(core) {
                Ok(()) => log::debug!("Worker {} pinned to core {}", self.id, core),
                Err(e) => log::warn!("Worker {} not pinned: {:#}", self.id, e),
            }
        }

        self.reporter.worker_started(self.id, self.pattern);
        self.state = WorkerState::Iterating;

        let mut completed = 0;
        for iteration in 0..self.config.iterations {
            if self.stop_flag.load(Ordering::Relaxed) {
                log::info!("Worker {} stopping after {} iterations", self.id, iteration);
                break;
            }

            match self.run_iteration() {
                Ok(output) => {
                    log::trace!("Worker {} iteration {}: {}", self.id, iteration, output.kind);
                    if output.hits_sentinel() {
                        self.reporter.sentinel(&output);
                    }
                }
                Err(e) => self.reporter.worker_error(self.id, &e),
            }

            pattern::apply(self.pattern, &mut self.rng);
            completed += 1;
        }

        self.reporter.worker_completed(self.id);
        self.state = WorkerState::Completed;
        completed
    }

    /// One allocate → fill → compute → release cycle
    fn run_iteration(&mut self) -> std::result::Result<TaskOutput, IterationError> {
        let tasks = &self.tasks;
        iterate(&self.sampler, &mut self.rng, |buffer, rng| {
            let kind = TaskKind::select(rng);
            guarded(kind, || tasks.run(kind, buffer, rng))
        })
    }
}

/// Seed for a worker's generator: ID plus the base seed or the clock
fn worker_seed(id: usize, base: Option<u64>) -> Result<u64> {
    let base = match base {
        Some(seed) => seed,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_nanos() as u64,
    };
    Ok(base.wrapping_add(id as u64))
}

/// Acquire and fill a scratch buffer, run `compute` on it, then release it
///
/// The buffer is released on both the success and the failure path of
/// `compute`. If the buffer cannot be acquired, `compute` is not called.
fn iterate<F>(
    sampler: &SizeSampler,
    rng: &mut Xoshiro256PlusPlus,
    compute: F,
) -> std::result::Result<TaskOutput, IterationError>
where
    F: FnOnce(&[u8], &mut Xoshiro256PlusPlus) -> std::result::Result<TaskOutput, IterationError>,
{
    let size = sampler.sample(rng);
    let buffer = ScratchBuffer::allocate(size, rng)?;

    let result = compute(buffer.as_slice(), rng);
    buffer.release();
    result
}

/// Run a task, turning a panic into a computation failure
fn guarded<F>(kind: TaskKind, task: F) -> std::result::Result<TaskOutput, IterationError>
where
    F: FnOnce() -> std::result::Result<TaskOutput, IterationError>,
{
    panic::catch_unwind(AssertUnwindSafe(task))
        .unwrap_or_else(|payload| Err(IterationError::from_panic(kind, payload)))
}
