//! Error types shared across the guard.
//!
//! # Taxonomy
//! - Configuration errors are fatal at startup and refused on reload
//! - `PayloadTooLarge` is the per-request rejection, rendered as 413 by the
//!   HTTP layer and never propagated as a `GuardError`
//! - Ambiguous request signals are never errors (the check is skipped)

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::validation::ValidationError;

/// Rejection produced when a declared content length exceeds the resolved limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("JSON payload of {received_bytes} bytes exceeds the {allowed_bytes} byte limit")]
pub struct PayloadTooLarge {
    /// Declared content length of the request.
    pub received_bytes: u64,
    /// Limit resolved for the request's route.
    pub allowed_bytes: u64,
}

/// Top-level error type for the guard and its binaries.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`GuardError`].
pub type Result<T> = std::result::Result<T, GuardError>;
