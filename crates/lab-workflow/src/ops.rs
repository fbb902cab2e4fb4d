//! Tree operations
//!
//! Every operation takes `&self` and returns a new [`WorkTree`]; failures
//! return the error and nothing else, so the caller's snapshot stays valid.
//! The touched order is recomputed through the cascade before returning.

use crate::assignment::Assignment;
use crate::cascade;
use crate::error::{Action, WorkflowError};
use crate::status::{OrderStatus, TestStatus};
use crate::tree::{Location, NodeKind, Order, Sample, Test, WorkTree};

impl WorkTree {
    /// Assign staff and a due date to a node
    ///
    /// - Test: sets the analyst; `Pending` becomes `Assigned`, `Assigned` and
    ///   `InProgress` tests are reassigned in place
    /// - Sample: sets the divisional head
    /// - Order: sets the divisional head on every sample
    ///
    /// # Errors
    /// - [`WorkflowError::NotFound`] for an unknown id
    /// - [`WorkflowError::Validation`] when assignee or due date is missing
    /// - [`WorkflowError::IllegalTransition`] for a completed test
    /// - [`WorkflowError::NoChildren`] for an order without samples
    pub fn assign(&self, id: &str, assignment: &Assignment) -> Result<Self, WorkflowError> {
        let location = self.require(id)?;
        let (assignee, due_date) = assignment.validate(id)?;

        let mut next = self.clone();
        match location {
            Location::Test(o, s, t) => {
                let test = next.test_at_mut(o, s, t).ok_or_else(|| not_found(id))?;
                if test.status() == TestStatus::Completed {
                    return Err(illegal(id, test.status().label(), Action::Assign));
                }
                test.set_assignment(assignee.clone(), due_date);
                if test.status() == TestStatus::Pending {
                    test.set_status(TestStatus::Assigned);
                }
            }
            Location::Sample(o, s) => {
                next.sample_at_mut(o, s)
                    .ok_or_else(|| not_found(id))?
                    .set_assignment(assignee.clone(), due_date);
            }
            Location::Order(o) => {
                let order = next.order_at_mut(o).ok_or_else(|| not_found(id))?;
                if order.samples().is_empty() {
                    return Err(WorkflowError::NoChildren {
                        id: id.to_string(),
                        action: Action::Assign,
                        child: NodeKind::Sample,
                    });
                }
                for sample in order.samples_mut().iter_mut() {
                    sample.set_assignment(assignee.clone(), due_date);
                }
            }
        }

        next.settle(location.order_index());
        tracing::debug!(node = id, kind = %location.kind(), %assignee, %due_date, "assigned");
        Ok(next)
    }

    /// Mark test work started: `Assigned → InProgress`
    ///
    /// # Errors
    /// - [`WorkflowError::NotFound`] for an unknown id
    /// - [`WorkflowError::WrongKind`] when `id` is not a test
    /// - [`WorkflowError::IllegalTransition`] unless the test is `Assigned`
    pub fn start_test(&self, id: &str) -> Result<Self, WorkflowError> {
        self.advance_test(id, Action::Start, TestStatus::Assigned, TestStatus::InProgress)
    }

    /// Mark test work finished: `InProgress → Completed`
    ///
    /// # Errors
    /// - [`WorkflowError::NotFound`] for an unknown id
    /// - [`WorkflowError::WrongKind`] when `id` is not a test
    /// - [`WorkflowError::IllegalTransition`] unless the test is `InProgress`
    pub fn complete_test(&self, id: &str) -> Result<Self, WorkflowError> {
        self.advance_test(id, Action::Complete, TestStatus::InProgress, TestStatus::Completed)
    }

    /// Send completed work back to `InProgress`
    ///
    /// On a sample or order, every completed test below it is reopened.
    /// Reopening clears an order's approval.
    ///
    /// # Errors
    /// - [`WorkflowError::NotFound`] for an unknown id
    /// - [`WorkflowError::IllegalTransition`] when nothing below the node is completed
    pub fn reopen(&self, id: &str) -> Result<Self, WorkflowError> {
        let location = self.require(id)?;
        let mut next = self.clone();

        let reopened = match location {
            Location::Test(o, s, t) => {
                let test = next.test_at_mut(o, s, t).ok_or_else(|| not_found(id))?;
                reopen_test(test)
            }
            Location::Sample(o, s) => {
                let sample = next.sample_at_mut(o, s).ok_or_else(|| not_found(id))?;
                reopen_sample(sample)
            }
            Location::Order(o) => {
                let order = next.order_at_mut(o).ok_or_else(|| not_found(id))?;
                order.samples_mut().iter_mut().map(reopen_sample).sum()
            }
        };

        if reopened == 0 {
            return Err(illegal(id, &self.status_label(location), Action::Reopen));
        }

        next.settle(location.order_index());
        tracing::debug!(node = id, reopened, "reopened");
        Ok(next)
    }

    /// Approve a completed order
    ///
    /// # Errors
    /// - [`WorkflowError::NotFound`] for an unknown id
    /// - [`WorkflowError::WrongKind`] when `id` is not an order
    /// - [`WorkflowError::IllegalTransition`] unless the order is `Completed`
    pub fn approve_order(&self, id: &str) -> Result<Self, WorkflowError> {
        let location = self.require(id)?;
        let Location::Order(o) = location else {
            return Err(wrong_kind(id, Action::Approve, NodeKind::Order, location.kind()));
        };

        let mut next = self.clone();
        let order = next.order_at_mut(o).ok_or_else(|| not_found(id))?;
        if order.status() != OrderStatus::Completed {
            return Err(illegal(id, order.status().label(), Action::Approve));
        }
        order.set_approved(true);

        next.settle(o);
        tracing::debug!(order = id, "order approved");
        Ok(next)
    }

    /// Remove a node and everything below it, recomputing its ancestors
    ///
    /// # Errors
    /// Returns [`WorkflowError::NotFound`] for an unknown id.
    pub fn remove(&self, id: &str) -> Result<Self, WorkflowError> {
        let location = self.require(id)?;
        let mut next = self.clone();

        match location {
            Location::Order(o) => {
                next.orders_mut().remove(o);
            }
            Location::Sample(o, s) => {
                next.order_at_mut(o)
                    .ok_or_else(|| not_found(id))?
                    .samples_mut()
                    .remove(s);
                next.settle(o);
            }
            Location::Test(o, s, t) => {
                next.sample_at_mut(o, s)
                    .ok_or_else(|| not_found(id))?
                    .tests_mut()
                    .remove(t);
                next.settle(o);
            }
        }

        tracing::debug!(node = id, kind = %location.kind(), "removed");
        Ok(next)
    }

    /// Status label of the node at a location
    #[must_use]
    pub fn status_label(&self, location: Location) -> String {
        let orders = self.orders();
        let label = match location {
            Location::Order(o) => orders.get(o).map(|order| order.status().label()),
            Location::Sample(o, s) => orders
                .get(o)
                .and_then(|order| order.samples().get(s))
                .map(|sample| sample.status().label()),
            Location::Test(o, s, t) => orders
                .get(o)
                .and_then(|order| order.samples().get(s))
                .and_then(|sample| sample.tests().get(t))
                .map(|test| test.status().label()),
        };
        label.unwrap_or_default().to_string()
    }

    fn advance_test(
        &self,
        id: &str,
        action: Action,
        from: TestStatus,
        to: TestStatus,
    ) -> Result<Self, WorkflowError> {
        let location = self.require(id)?;
        let Location::Test(o, s, t) = location else {
            return Err(wrong_kind(id, action, NodeKind::Test, location.kind()));
        };

        let mut next = self.clone();
        let test = next.test_at_mut(o, s, t).ok_or_else(|| not_found(id))?;
        if test.status() != from {
            return Err(illegal(id, test.status().label(), action));
        }
        test.set_status(to);

        next.settle(o);
        tracing::debug!(test = id, %action, status = %to, "test advanced");
        Ok(next)
    }

    fn require(&self, id: &str) -> Result<Location, WorkflowError> {
        self.locate(id).ok_or_else(|| {
            tracing::warn!(node = id, "operation on unknown node");
            not_found(id)
        })
    }

    fn settle(&mut self, order_index: usize) {
        if let Some(order) = self.order_at_mut(order_index) {
            cascade::recompute_order(order);
        }
    }

    fn order_at_mut(&mut self, o: usize) -> Option<&mut Order> {
        self.orders_mut().get_mut(o)
    }

    fn sample_at_mut(&mut self, o: usize, s: usize) -> Option<&mut Sample> {
        self.order_at_mut(o)?.samples_mut().get_mut(s)
    }

    fn test_at_mut(&mut self, o: usize, s: usize, t: usize) -> Option<&mut Test> {
        self.sample_at_mut(o, s)?.tests_mut().get_mut(t)
    }
}

fn reopen_test(test: &mut Test) -> usize {
    if test.status() == TestStatus::Completed {
        test.set_status(TestStatus::InProgress);
        1
    } else {
        0
    }
}

fn reopen_sample(sample: &mut Sample) -> usize {
    sample.tests_mut().iter_mut().map(reopen_test).sum()
}

fn not_found(id: &str) -> WorkflowError {
    WorkflowError::NotFound(id.to_string())
}

fn illegal(id: &str, from: &str, action: Action) -> WorkflowError {
    WorkflowError::IllegalTransition {
        id: id.to_string(),
        from: from.to_string(),
        action,
    }
}

fn wrong_kind(id: &str, action: Action, expected: NodeKind, found: NodeKind) -> WorkflowError {
    WorkflowError::WrongKind {
        id: id.to_string(),
        action,
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::SampleStatus;
    use chrono::NaiveDate;

    fn due() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn tree() -> WorkTree {
        WorkTree::from_orders([Order::new("ORD-1", "Acme").with_sample(
            Sample::new("S-1", "Soil")
                .with_test(Test::new("T-1", "pH"))
                .with_test(Test::new("T-2", "Moisture"))
                .with_test(Test::new("T-3", "Nitrogen")),
        )])
        .unwrap()
    }

    fn sample_status(tree: &WorkTree) -> SampleStatus {
        tree.sample("S-1").unwrap().status()
    }

    #[test]
    fn assign_moves_pending_test_to_assigned() {
        let next = tree().assign("T-1", &Assignment::new("Priya", due())).unwrap();
        let test = next.test("T-1").unwrap();
        assert_eq!(test.status(), TestStatus::Assigned);
        assert_eq!(test.assigned_analyst(), Some("Priya"));
        assert_eq!(test.due_date(), Some(due()));
        assert_eq!(sample_status(&next), SampleStatus::PartiallyAllocated);
        assert_eq!(next.order("ORD-1").unwrap().status(), OrderStatus::Assigned);
    }

    #[test]
    fn failed_assign_returns_error_and_keeps_tree() {
        let before = tree();
        let err = before.assign("T-1", &Assignment::default()).unwrap_err();
        assert_eq!(err.missing_fields().len(), 2);
        assert_eq!(before, tree());

        let err = before.assign("T-404", &Assignment::new("x", due())).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn reassigning_keeps_status() {
        let assigned = tree()
            .assign("T-1", &Assignment::new("Priya", due()))
            .and_then(|t| t.start_test("T-1"))
            .unwrap();
        let reassigned = assigned.assign("T-1", &Assignment::new("Ravi", due())).unwrap();
        let test = reassigned.test("T-1").unwrap();
        assert_eq!(test.status(), TestStatus::InProgress);
        assert_eq!(test.assigned_analyst(), Some("Ravi"));
    }

    #[test]
    fn lifecycle_cannot_skip_states() {
        let err = tree().start_test("T-1").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::IllegalTransition { action: Action::Start, ref from, .. } if from == "Pending"
        ));

        let assigned = tree().assign("T-1", &Assignment::new("Priya", due())).unwrap();
        assert!(assigned.complete_test("T-1").is_err());
    }

    #[test]
    fn lifecycle_rejects_wrong_kind() {
        let err = tree().start_test("S-1").unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::WrongKind { expected: NodeKind::Test, found: NodeKind::Sample, .. }
        ));
        assert!(tree().approve_order("T-1").is_err());
    }

    #[test]
    fn completed_test_cannot_be_reassigned() {
        let done = tree()
            .assign("T-1", &Assignment::new("Priya", due()))
            .and_then(|t| t.start_test("T-1"))
            .and_then(|t| t.complete_test("T-1"))
            .unwrap();
        let err = done.assign("T-1", &Assignment::new("Ravi", due())).unwrap_err();
        assert!(matches!(err, WorkflowError::IllegalTransition { action: Action::Assign, .. }));
    }

    #[test]
    fn order_assignment_fans_out_to_samples() {
        let next = tree().assign("ORD-1", &Assignment::new("Dr. Rao", due())).unwrap();
        assert_eq!(
            next.sample("S-1").unwrap().assigned_divisional_head(),
            Some("Dr. Rao")
        );
        assert_eq!(sample_status(&next), SampleStatus::PendingAllocation);
        assert_eq!(next.order("ORD-1").unwrap().status(), OrderStatus::Assigned);

        let empty = WorkTree::from_orders([Order::new("ORD-2", "Beta")]).unwrap();
        assert!(matches!(
            empty.assign("ORD-2", &Assignment::new("Dr. Rao", due())),
            Err(WorkflowError::NoChildren { .. })
        ));
    }

    #[test]
    fn approval_requires_completion_and_is_cleared_by_reopen() {
        let mut tree = tree();
        assert!(tree.approve_order("ORD-1").is_err());

        for id in ["T-1", "T-2", "T-3"] {
            tree = tree
                .assign(id, &Assignment::new("Priya", due()))
                .and_then(|t| t.start_test(id))
                .and_then(|t| t.complete_test(id))
                .unwrap();
        }
        assert_eq!(tree.order("ORD-1").unwrap().status(), OrderStatus::Completed);

        let approved = tree.approve_order("ORD-1").unwrap();
        assert_eq!(approved.order("ORD-1").unwrap().status(), OrderStatus::Approved);
        assert!(approved.approve_order("ORD-1").is_err());

        let reopened = approved.reopen("T-2").unwrap();
        let order = reopened.order("ORD-1").unwrap();
        assert_eq!(order.status(), OrderStatus::InProgress);
        assert!(!order.is_approved());
        assert_eq!(reopened.test("T-2").unwrap().status(), TestStatus::InProgress);
    }

    #[test]
    fn reopen_without_completed_work_is_illegal() {
        assert!(matches!(
            tree().reopen("ORD-1"),
            Err(WorkflowError::IllegalTransition { action: Action::Reopen, .. })
        ));
    }

    #[test]
    fn remove_recomputes_ancestors() {
        let tree = tree()
            .assign("T-1", &Assignment::new("Priya", due()))
            .and_then(|t| t.assign("T-2", &Assignment::new("Priya", due())))
            .unwrap();
        assert_eq!(sample_status(&tree), SampleStatus::PartiallyAllocated);

        let trimmed = tree.remove("T-3").unwrap();
        assert!(!trimmed.contains("T-3"));
        assert_eq!(sample_status(&trimmed), SampleStatus::Allocated);
        assert!(tree.contains("T-3"));

        let no_tests = trimmed.remove("T-1").and_then(|t| t.remove("T-2")).unwrap();
        assert_eq!(sample_status(&no_tests), SampleStatus::PendingAllocation);

        let gone = tree.remove("ORD-1").unwrap();
        assert!(gone.is_empty());
        assert!(tree.remove("nope").unwrap_err().is_not_found());
    }
}
