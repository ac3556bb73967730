//! Coordinator module
//!
//! The [`Orchestrator`] launches one worker thread per configured worker,
//! waits for all of them to complete and measures the wall-clock time of the
//! whole run.
//!
//! # Failure Model
//!
//! Iteration failures are handled inside the workers. A worker that fails to
//! start, or whose thread panics outside an iteration, fails the whole run:
//! the stop flag is raised so the remaining workers wind down at their next
//! iteration boundary, every thread is joined, and the first error is
//! returned.

use crate::config::Config;
use crate::output::Reporter;
use crate::stats::RunStats;
use crate::worker::Worker;
use crate::Result;
use anyhow::Context;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

/// Launches and joins workers
pub struct Orchestrator {
    config: Arc<Config>,
    reporter: Arc<Reporter>,
    stop_flag: Arc<AtomicBool>,
}

impl Orchestrator {
    /// Create an orchestrator for a configuration
    pub fn new(config: Arc<Config>, reporter: Arc<Reporter>) -> Self {
        Self {
            config,
            reporter,
            stop_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that stops all workers at their next iteration boundary when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Run all workers to completion
    ///
    /// Prints the start banner, launches `worker_count` workers, joins them and
    /// prints the total execution time.
    ///
    /// # Errors
    ///
    /// Returns an error if a worker thread cannot be spawned, a worker fails
    /// to start, or a worker thread panics.
    pub fn run(&self) -> Result<RunStats> {
        let num_workers = self.config.worker_count;
        self.reporter.banner();
        log::info!("Launching {} workers", num_workers);

        let start = Instant::now();

        let mut handles = Vec::with_capacity(num_workers);
        let mut first_error = None;

        for worker_id in 0..num_workers {
            match self.spawn_worker(worker_id) {
                Ok(handle) => handles.push((worker_id, handle)),
                Err(e) => {
                    self.stop_flag.store(true, Ordering::Relaxed);
                    first_error = Some(e);
                    break;
                }
            }
        }

        for (worker_id, handle) in handles {
            let outcome = handle
                .join()
                .map_err(|_| anyhow::anyhow!("Worker {} thread panicked", worker_id))
                .and_then(|result| result);

            if let Err(e) = outcome {
                self.stop_flag.store(true, Ordering::Relaxed);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        let stats = RunStats::new(start.elapsed(), num_workers);

        if let Some(e) = first_error {
            return Err(e);
        }

        self.reporter.summary(&stats);
        Ok(stats)
    }

    fn spawn_worker(&self, worker_id: usize) -> Result<JoinHandle<Result<usize>>> {
        let config = self.config.clone();
        let reporter = self.reporter.clone();
        let stop_flag = self.stop_flag.clone();

        std::thread::Builder::new()
            .name(format!("mempulse-worker-{}", worker_id))
            .spawn(move || {
                let mut worker = Worker::new(worker_id, config, reporter, stop_flag.clone())
                    .with_context(|| format!("Worker {} failed to start", worker_id))
                    .map_err(|e| {
                        stop_flag.store(true, Ordering::Relaxed);
                        e
                    })?;
                let completed = worker.run();
                log::debug!("Worker {} finished {} iterations", worker.id(), completed);
                Ok(completed)
            })
            .with_context(|| format!("Failed to spawn worker thread {}", worker_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MemorySink;
    use crate::pattern::AllocationPatternKind;
    use std::io::{self, Write};

    /// Sink whose writes of worker lines panic, outside any iteration
    struct FailingWorkerSink(MemorySink);

    impl Write for FailingWorkerSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.starts_with(b"Thread") {
                panic!("sink rejected worker line");
            }
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.flush()
        }
    }

    fn config(workers: usize, iterations: usize) -> Config {
        Config {
            worker_count: workers,
            iterations,
            min_allocation_size: 1024,
            max_allocation_size: 8192,
            matrix_dimension: 8,
            fib_depth: 15,
            pattern: Some(AllocationPatternKind::Burst),
            seed: Some(1),
            pin_workers: false,
        }
    }

    #[test]
    fn test_run_reports_every_worker() {
        let sink = MemorySink::new();
        let orchestrator =
            Orchestrator::new(Arc::new(config(3, 2)), Arc::new(Reporter::new(sink.clone())));

        let stats = orchestrator.run().unwrap();
        assert_eq!(stats.workers, 3);

        let contents = sink.contents();
        assert!(contents.starts_with("Starting Enhanced Performance Benchmark...\n\n"));
        for id in 0..3 {
            assert!(contents.contains(&format!("Thread {} started with Allocation Pattern: Burst\n", id)));
            assert!(contents.contains(&format!("Thread {} completed.\n", id)));
        }
        assert!(contents.ends_with("Benchmark Completed.\n"));
    }

    #[test]
    fn test_elapsed_covers_worker_delays() {
        let cfg = Config {
            pattern: Some(AllocationPatternKind::Sequential),
            ..config(2, 3)
        };
        let orchestrator = Orchestrator::new(Arc::new(cfg), Arc::new(Reporter::new(MemorySink::new())));

        let stats = orchestrator.run().unwrap();

        // Three sequential pauses of 10ms each run back to back in every worker
        assert!(stats.elapsed >= std::time::Duration::from_millis(30));
    }

    #[test]
    fn test_stop_handle_cancels_run() {
        let sink = MemorySink::new();
        let orchestrator =
            Orchestrator::new(Arc::new(config(2, 1_000_000)), Arc::new(Reporter::new(sink.clone())));
        orchestrator.stop_handle().store(true, Ordering::Relaxed);

        let stats = orchestrator.run().unwrap();

        assert_eq!(stats.workers, 2);
        assert!(sink.contents().contains("Thread 1 completed.\n"));
    }

    #[test]
    fn test_worker_thread_panic_fails_run() {
        let sink = MemorySink::new();
        let orchestrator = Orchestrator::new(
            Arc::new(config(2, 3)),
            Arc::new(Reporter::new(FailingWorkerSink(sink.clone()))),
        );

        let err = orchestrator.run().unwrap_err();

        assert!(err.to_string().contains("Worker 0 thread panicked"), "{:#}", err);
        assert!(orchestrator.stop_handle().load(Ordering::Relaxed));
        let contents = sink.contents();
        assert!(contents.starts_with("Starting Enhanced Performance Benchmark..."));
        assert!(!contents.contains("Total Execution Time"));
        assert!(!contents.contains("Benchmark Completed."));
    }
}
