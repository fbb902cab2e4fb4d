//! Error types for work-item operations
//!
//! Every failure leaves the caller's tree exactly as it was.

use std::fmt::{self, Display, Formatter};

use crate::tree::NodeKind;

/// Field an assignment must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// Analyst or divisional head
    Assignee,
    /// Due date
    DueDate,
}

impl Display for RequiredField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assignee => f.write_str("assignee"),
            Self::DueDate => f.write_str("due date"),
        }
    }
}

/// Lifecycle action attempted on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Assign staff and due date
    Assign,
    /// Mark test work started
    Start,
    /// Mark test work finished
    Complete,
    /// Send completed work back to in progress
    Reopen,
    /// Approve a completed order
    Approve,
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Assign => "assign",
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Reopen => "reopen",
            Self::Approve => "approve",
        };
        f.write_str(name)
    }
}

/// Work-item operation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkflowError {
    /// No node with this id exists in the tree
    #[error("node not found: {0}")]
    NotFound(String),

    /// Required assignment fields are missing
    #[error("validation failed for {id}: missing {}", join_fields(.missing))]
    Validation {
        /// Target node
        id: String,
        /// Every missing field, in declaration order
        missing: Vec<RequiredField>,
    },

    /// Action is not allowed from the node's current status
    #[error("cannot {action} {id} while it is {from}")]
    IllegalTransition {
        /// Target node
        id: String,
        /// Current status label
        from: String,
        /// Attempted action
        action: Action,
    },

    /// Action only applies to another kind of node
    #[error("cannot {action} {id}: expected a {expected}, found a {found}")]
    WrongKind {
        /// Target node
        id: String,
        /// Attempted action
        action: Action,
        /// Kind the action applies to
        expected: NodeKind,
        /// Kind actually found
        found: NodeKind,
    },

    /// Node has no children to act on
    #[error("cannot {action} {id}: it has no {child}s")]
    NoChildren {
        /// Target node
        id: String,
        /// Attempted action
        action: Action,
        /// Kind of child that is missing
        child: NodeKind,
    },

    /// Registration reused an id already in the tree
    #[error("duplicate node id: {0}")]
    DuplicateId(String),
}

impl WorkflowError {
    /// Check if the target did not exist
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Missing fields for a validation failure
    #[must_use]
    pub fn missing_fields(&self) -> &[RequiredField] {
        match self {
            Self::Validation { missing, .. } => missing,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[RequiredField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
