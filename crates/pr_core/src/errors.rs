//! Error surface of the allocation engine.
//!
//! Only configuration problems are errors. Degenerate numbers (no votes, a
//! zero quota) and exhausted iteration caps are resolved in-band and reported
//! through `AllocNote`s instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocError {
    /// The district cannot be allocated as given (no seats, no parties,
    /// duplicate or reserved party ids, barrier out of range).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Method token not among hare | droop | imperiali | dhondt | saintelague.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),
}

impl AllocError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        AllocError::InvalidConfiguration(msg.into())
    }
}
