//! Output formatting
//!
//! - [`text`]: the line-oriented reporting channel shared by all workers
//! - [`json`]: optional machine-readable run summary

pub mod json;
pub mod text;

pub use text::{MemorySink, Reporter};
