//! SHA-256 digest task

use super::{Checksum, CpuTask, TaskKind};
use crate::error::IterationError;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// SHA-256 over the whole scratch buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Digest;

/// Hash `data` and return the 32-byte digest
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Sum of all digest bytes
pub fn byte_sum(digest: &[u8]) -> u64 {
    digest.iter().map(|&b| b as u64).sum()
}

impl CpuTask for Sha256Digest {
    fn kind(&self) -> TaskKind {
        TaskKind::Digest
    }

    fn run(&self, buffer: &[u8], _rng: &mut dyn RngCore) -> Result<Checksum, IterationError> {
        Ok(Checksum::Unsigned(byte_sum(&sha256(buffer))))
    }
}
