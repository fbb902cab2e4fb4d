//! Confirmation request types

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique confirmation request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presentation class of a prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmKind {
    /// Irreversible, e.g. delete
    #[default]
    Destructive,
    /// Reversible but significant, e.g. reopen
    Warning,
}

/// What the user is asked to confirm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmDescriptor {
    /// Prompt title
    pub title: String,
    /// Prompt body
    pub message: String,
    /// Presentation class
    pub kind: ConfirmKind,
    /// Nodes or records the action will touch
    pub targets: Vec<String>,
}

impl ConfirmDescriptor {
    /// Destructive prompt
    #[must_use]
    pub fn destructive(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind: ConfirmKind::Destructive,
            targets: Vec::new(),
        }
    }

    /// Warning prompt
    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConfirmKind::Warning,
            ..Self::destructive(title, message)
        }
    }

    /// Name a target the action will touch
    #[must_use]
    pub fn for_target(mut self, target: impl Into<String>) -> Self {
        self.targets.push(target.into());
        self
    }

    /// Name several targets at once, e.g. a bulk selection
    #[must_use]
    pub fn for_targets<I, T>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.targets.extend(targets.into_iter().map(Into::into));
        self
    }

    /// Check if the action touches `target`
    #[inline]
    #[must_use]
    pub fn names(&self, target: &str) -> bool {
        self.targets.iter().any(|t| t == target)
    }
}

/// Snapshot of the prompt the UI should currently show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPrompt {
    /// Request to resolve
    pub id: RequestId,
    /// What to show
    pub descriptor: ConfirmDescriptor,
}

/// What happens when a request arrives while another is pending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatePolicy {
    /// Wait in FIFO order behind the pending request
    #[default]
    Queue,
    /// Fail with [`crate::GateError::Busy`]
    Reject,
}
