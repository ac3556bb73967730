//! Scratch buffer management
//!
//! Each worker iteration acquires one [`ScratchBuffer`] filled with
//! pseudo-random bytes, hands it to a CPU task and releases it. Acquisition is
//! fallible so that an allocation failure becomes an iteration error instead
//! of aborting the process.

use crate::error::IterationError;
use rand::RngCore;

#[cfg(test)]
thread_local! {
    static RELEASES: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

/// Number of scratch buffers released on the current thread (test builds only)
#[cfg(test)]
pub(crate) fn releases_on_this_thread() -> usize {
    RELEASES.with(|r| r.get())
}

/// Iteration-scoped byte region
///
/// The memory is owned by the buffer and returned to the allocator when it is
/// dropped, on every exit path of the iteration that owns it.
pub struct ScratchBuffer {
    data: Vec<u8>,
}

/// Random bytes are generated into a stack chunk of this size and appended
const FILL_CHUNK: usize = 4096;

impl ScratchBuffer {
    /// Acquire a buffer of exactly `size` bytes filled from `rng`
    ///
    /// The capacity is reserved up front and each byte is written once, with
    /// random data. The buffer is never zero-filled first.
    ///
    /// # Errors
    ///
    /// Returns [`IterationError::Allocation`] if the allocator cannot provide
    /// the requested capacity.
    pub fn allocate(size: usize, rng: &mut dyn RngCore) -> Result<Self, IterationError> {
        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|source| IterationError::Allocation { size, source })?;

        let mut chunk = [0u8; FILL_CHUNK];
        while data.len() < size {
            let n = (size - data.len()).min(FILL_CHUNK);
            rng.fill_bytes(&mut chunk[..n]);
            data.extend_from_slice(&chunk[..n]);
        }

        Ok(Self { data })
    }

    /// Get the buffer as a slice
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the size of the buffer in bytes
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Release the buffer
    ///
    /// Consumes the buffer, so a second release cannot be written.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        #[cfg(test)]
        RELEASES.with(|r| r.set(r.get() + 1));
    }
}
