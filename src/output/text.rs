//! Human-readable text output
//!
//! All workers share one [`Reporter`]. Every message is written and flushed
//! while the reporter's lock is held, so lines from different workers never
//! interleave. This lock is the only synchronization point between workers.

use crate::pattern::AllocationPatternKind;
use crate::stats::RunStats;
use crate::task::TaskOutput;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// Serialized, line-oriented reporting channel
pub struct Reporter {
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    /// Create a reporter writing to `sink`
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        Self {
            sink: Mutex::new(Box::new(sink)),
        }
    }

    /// Create a reporter writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        // A worker that panicked mid-write leaves at worst a partial line
        self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write one or more complete lines atomically
    pub fn lines(&self, lines: &[fmt::Arguments<'_>]) {
        let mut sink = self.lock();
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(sink, "{}", line))
            .and_then(|_| sink.flush());
        if let Err(e) = result {
            log::warn!("Failed to write report line: {}", e);
        }
    }

    /// Write a single complete line
    pub fn line(&self, line: fmt::Arguments<'_>) {
        self.lines(&[line]);
    }

    /// Start banner, printed once before workers launch
    pub fn banner(&self) {
        self.lines(&[
            format_args!("Starting Enhanced Performance Benchmark..."),
            format_args!(""),
        ]);
    }

    pub fn worker_started(&self, worker_id: usize, pattern: AllocationPatternKind) {
        self.line(format_args!(
            "Thread {} started with Allocation Pattern: {}",
            worker_id, pattern
        ));
    }

    pub fn worker_error(&self, worker_id: usize, error: &dyn fmt::Display) {
        self.line(format_args!(
            "Thread {} encountered an error: {}",
            worker_id, error
        ));
    }

    pub fn worker_completed(&self, worker_id: usize) {
        self.line(format_args!("Thread {} completed.", worker_id));
    }

    /// Report a task output whose checksum hit its sentinel
    pub fn sentinel(&self, output: &TaskOutput) {
        self.line(format_args!("{}: {}", output.label(), output.checksum));
    }

    /// Final timing lines
    pub fn summary(&self, stats: &RunStats) {
        self.lines(&[
            format_args!(""),
            format_args!("Total Execution Time: {} seconds", stats.elapsed_secs()),
            format_args!("Benchmark Completed."),
        ]);
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter").finish_non_exhaustive()
    }
}

/// In-memory sink whose contents can be read back after a run
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|p| p.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
