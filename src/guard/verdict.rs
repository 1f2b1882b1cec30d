//! Outcome of one guard evaluation.

use crate::error::PayloadTooLarge;

/// Result of evaluating one request. Consumed immediately by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardVerdict {
    Pass,
    Reject(PayloadTooLarge),
}

impl GuardVerdict {
    pub fn reject(received_bytes: u64, allowed_bytes: u64) -> Self {
        Self::Reject(PayloadTooLarge {
            received_bytes,
            allowed_bytes,
        })
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}
