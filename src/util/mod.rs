//! Shared utilities

pub mod buffer;
