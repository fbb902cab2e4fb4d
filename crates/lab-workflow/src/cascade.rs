//! Status cascade reducer
//!
//! Pure functions deriving a parent's status from its children. Every
//! operation in [`crate::ops`] ends by recomputing the touched order through
//! [`recompute_order`]; [`recompute`] does the whole tree and is idempotent.

use im::Vector;

use crate::status::{OrderStatus, SampleStatus, TestStatus};
use crate::tree::{Order, Sample, Test, WorkTree};

/// Derive a sample's status from its tests
///
/// | tests                                    | status               |
/// |------------------------------------------|----------------------|
/// | none                                     | `PendingAllocation`  |
/// | all completed                            | `Completed`          |
/// | all pending                              | `PendingAllocation`  |
/// | none pending, none started               | `Allocated`          |
/// | none pending, some started               | `InProgress`         |
/// | some pending, some assigned              | `PartiallyAllocated` |
#[must_use]
pub fn sample_status(tests: &Vector<Test>) -> SampleStatus {
    let total = tests.len();
    if total == 0 {
        return SampleStatus::PendingAllocation;
    }

    let mut pending = 0;
    let mut started = 0;
    let mut completed = 0;
    for test in tests {
        match test.status() {
            TestStatus::Pending => pending += 1,
            TestStatus::Assigned => {}
            TestStatus::InProgress => started += 1,
            TestStatus::Completed => {
                started += 1;
                completed += 1;
            }
        }
    }

    if completed == total {
        SampleStatus::Completed
    } else if pending == total {
        SampleStatus::PendingAllocation
    } else if pending == 0 {
        if started == 0 {
            SampleStatus::Allocated
        } else {
            SampleStatus::InProgress
        }
    } else {
        SampleStatus::PartiallyAllocated
    }
}

/// Derive an order's status from its samples and approval flag
///
/// Samples must already carry their derived status.
#[must_use]
pub fn order_status(samples: &Vector<Sample>, approved: bool) -> OrderStatus {
    if samples.is_empty() {
        return OrderStatus::PendingAssignment;
    }

    if samples.iter().all(|s| s.status() == SampleStatus::Completed) {
        return if approved {
            OrderStatus::Approved
        } else {
            OrderStatus::Completed
        };
    }

    let started = samples.iter().any(|s| {
        matches!(s.status(), SampleStatus::InProgress | SampleStatus::Completed)
            || s.tests().iter().any(|t| t.status().is_started())
    });
    if started {
        return OrderStatus::InProgress;
    }

    let assigned = samples.iter().any(|s| {
        s.status() != SampleStatus::PendingAllocation || s.assigned_divisional_head().is_some()
    });
    if assigned {
        OrderStatus::Assigned
    } else {
        OrderStatus::PendingAssignment
    }
}

/// Whether every sample of a non-empty order is completed
#[must_use]
pub fn is_fully_completed(samples: &Vector<Sample>) -> bool {
    !samples.is_empty() && samples.iter().all(|s| s.status() == SampleStatus::Completed)
}

/// Recompute every sample of an order, then the order itself
///
/// An approval does not survive the order leaving the completed state.
pub fn recompute_order(order: &mut Order) {
    for sample in order.samples_mut().iter_mut() {
        let status = sample_status(sample.tests());
        if sample.status() != status {
            sample.set_status(status);
        }
    }

    if order.is_approved() && !is_fully_completed(order.samples()) {
        order.set_approved(false);
    }

    let status = order_status(order.samples(), order.is_approved());
    if order.status() != status {
        order.set_status(status);
    }
}

/// Recompute every derived status in the tree
#[must_use]
pub fn recompute(tree: &WorkTree) -> WorkTree {
    let mut next = tree.clone();
    for order in next.orders_mut().iter_mut() {
        recompute_order(order);
    }
    next
}
