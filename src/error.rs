//! Iteration-level error taxonomy
//!
//! Errors raised inside a single worker iteration. They are caught at the
//! iteration boundary, reported, and never abort the worker loop.

use crate::task::TaskKind;
use std::collections::TryReserveError;
use thiserror::Error;

/// Failure of one allocate-fill-compute cycle
#[derive(Debug, Error)]
pub enum IterationError {
    /// Scratch buffer or task working memory could not be obtained
    #[error("failed to allocate {size} bytes: {source}")]
    Allocation {
        size: usize,
        #[source]
        source: TryReserveError,
    },

    /// A CPU task failed while running
    #[error("{task} task failed: {message}")]
    Computation { task: TaskKind, message: String },
}

impl IterationError {
    /// Build a computation failure from a caught panic payload
    pub fn from_panic(task: TaskKind, payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::Computation { task, message }
    }
}
