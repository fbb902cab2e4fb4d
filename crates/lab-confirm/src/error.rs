//! Confirmation gate errors

use thiserror::Error;

use crate::types::RequestId;

/// Errors raised by [`crate::ConfirmationGate`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GateError {
    /// Another confirmation is pending and the gate rejects overlap
    #[error("confirmation already pending: {pending}")]
    Busy {
        /// Title of the pending prompt
        pending: String,
    },

    /// Request is not the active one (already resolved, withdrawn or queued)
    #[error("confirmation {0} is not pending")]
    NotPending(RequestId),
}

impl GateError {
    /// Check if the caller may retry once the gate frees up
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }
}
