//! Error types for the desk
//!
//! Wraps the component crates' errors so callers handle one type.

use std::path::PathBuf;

use lab_confirm::GateError;
use lab_records::RecordError;
use lab_table::TableError;
use lab_workflow::WorkflowError;

/// Main desk error type
#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    /// Record parsing or schema failure
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Table misconfiguration
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Rejected work-tree operation
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Confirmation gate refused the request
    #[error("confirmation error: {0}")]
    Gate(#[from] GateError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A confirmation touching this node is outstanding
    #[error("{id} is locked by a pending confirmation for {pending}")]
    TargetLocked {
        /// Node the caller tried to change
        id: String,
        /// Target named by the outstanding confirmation
        pending: String,
    },

    /// Undo or redo attempted while a confirmation is outstanding
    #[error("history is locked by a pending confirmation for {pending}")]
    HistoryLocked {
        /// What the outstanding confirmation is about
        pending: String,
    },

    /// Bulk action without any selected node
    #[error("no nodes selected")]
    EmptySelection,

    /// Undo history exhausted
    #[error("nothing to undo")]
    NothingToUndo,

    /// Redo history exhausted
    #[error("nothing to redo")]
    NothingToRedo,
}

impl DeskError {
    /// Check if the node did not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Workflow(e) if e.is_not_found())
    }

    /// Check if required input was missing
    #[inline]
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Workflow(WorkflowError::Validation { .. }))
    }

    /// Check if a pending confirmation blocked the call
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        matches!(self, Self::TargetLocked { .. } | Self::HistoryLocked { .. })
    }

    /// Check if the same call may succeed once the gate frees up
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TargetLocked { .. } | Self::HistoryLocked { .. } => true,
            Self::Gate(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// TOML did not parse into a config
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed but out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
