//! Status enumerations per node kind
//!
//! Test status is set directly by lifecycle actions. Sample and order
//! statuses are derived by [`crate::cascade`] and never set by hand.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Status of a single test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TestStatus {
    /// Waiting for an analyst
    #[default]
    Pending,
    /// Analyst assigned, work not started
    Assigned,
    /// Analyst working on it
    InProgress,
    /// Result entered
    Completed,
}

impl TestStatus {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    /// Whether an analyst has been assigned at some point
    #[inline]
    #[must_use]
    pub fn is_assigned(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether work has started (in progress or done)
    #[inline]
    #[must_use]
    pub fn is_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }
}

/// Status of a sample, derived from its tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleStatus {
    /// No test has an analyst
    #[default]
    PendingAllocation,
    /// Some tests have analysts
    PartiallyAllocated,
    /// Every test has an analyst, none started
    Allocated,
    /// Every test has an analyst and work has started
    InProgress,
    /// Every test completed
    Completed,
}

impl SampleStatus {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PendingAllocation => "Pending Allocation",
            Self::PartiallyAllocated => "Partially Allocated",
            Self::Allocated => "Allocated",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

/// Status of an order, derived from its samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Nothing allocated yet
    #[default]
    PendingAssignment,
    /// Samples handed to divisional heads or analysts
    Assigned,
    /// Work started on at least one sample
    InProgress,
    /// Completed and explicitly approved
    Approved,
    /// Every sample completed
    Completed,
}

impl OrderStatus {
    /// Human-readable label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PendingAssignment => "Pending Assignment",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Approved => "Approved",
            Self::Completed => "Completed",
        }
    }
}

impl Display for TestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Display for SampleStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
