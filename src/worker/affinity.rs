//! Processor discovery and CPU pinning
//!
//! Workers default to one per logical CPU. With `--pin`, worker `i` is bound to
//! core `i % num_cpus()` so each core carries exactly one worker's load.
//!
//! # Platform Support
//!
//! Pinning uses `sched_setaffinity` and is only available on Linux. Elsewhere
//! [`pin_current_thread`] returns an error, which the worker logs and ignores.

use crate::Result;
#[cfg(target_os = "linux")]
use anyhow::Context;

/// Get the number of available CPU cores
///
/// Returns the number of logical CPU cores available on the system.
///
/// # Example
///
/// ```
/// use mempulse::worker::affinity::num_cpus;
///
/// let cpus = num_cpus();
/// assert!(cpus > 0);
/// ```
pub fn num_cpus() -> usize {
    num_cpus::get()
}

/// Core a worker is pinned to
pub fn core_for_worker(worker_id: usize) -> usize {
    worker_id % num_cpus().max(1)
}

/// Bind the current thread to a single CPU core
///
/// # Errors
///
/// Returns an error if the core ID is out of range, the platform does not
/// support affinity, or the syscall fails.
#[cfg(target_os = "linux")]
pub fn pin_current_thread(core: usize) -> Result<()> {
    use libc::{cpu_set_t, sched_setaffinity, CPU_SET, CPU_SETSIZE, CPU_ZERO};
    use std::mem;

    if core >= CPU_SETSIZE as usize {
        anyhow::bail!("CPU core ID {} is too large (max {})", core, CPU_SETSIZE - 1);
    }

    // SAFETY: cpu_set_t is plain data; the set is fully initialised before use
    // and only passed by reference to sched_setaffinity for the calling thread.
    let result = unsafe {
        let mut cpu_set: cpu_set_t = mem::zeroed();
        CPU_ZERO(&mut cpu_set);
        CPU_SET(core, &mut cpu_set);
        sched_setaffinity(0, mem::size_of::<cpu_set_t>(), &cpu_set)
    };

    if result != 0 {
        let err = std::io::Error::last_os_error();
        return Err(err).context(format!("Failed to pin thread to CPU core {}", core));
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_core: usize) -> Result<()> {
    anyhow::bail!("CPU pinning is only supported on Linux")
}

/// Check if thread count exceeds CPU count and warn if so
///
/// Returns true if the thread count exceeds the CPU count.
pub fn warn_if_oversubscribed(thread_count: usize) -> bool {
    let cpu_count = num_cpus();
    if thread_count > cpu_count {
        log::warn!(
            "Thread count ({}) exceeds CPU count ({}). \
             Workers will share cores and timings will include context switching.",
            thread_count,
            cpu_count
        );
        true
    } else {
        false
    }
}
