//! Work-item tree
//!
//! Order → Sample → Test containment. Children live in persistent vectors,
//! so cloning a [`WorkTree`] is cheap and every operation returns a fresh
//! snapshot that shares untouched branches with its predecessor.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cascade;
use crate::error::WorkflowError;
use crate::status::{OrderStatus, SampleStatus, TestStatus};

/// Kind of node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Top-level order
    Order,
    /// Sample within an order
    Sample,
    /// Test within a sample
    Test,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => f.write_str("order"),
            Self::Sample => f.write_str("sample"),
            Self::Test => f.write_str("test"),
        }
    }
}

/// A single analysis to perform on a sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    id: String,
    name: String,
    #[serde(default)]
    status: TestStatus,
    #[serde(default)]
    assigned_analyst: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

impl Test {
    /// Register a pending test
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TestStatus::Pending,
            assigned_analyst: None,
            due_date: None,
        }
    }

    /// Restore a test in a given state (mock data, saved snapshots)
    #[must_use]
    pub fn with_status(mut self, status: TestStatus) -> Self {
        self.status = status;
        self
    }

    /// Restore the analyst and due date
    #[must_use]
    pub fn with_analyst(mut self, analyst: impl Into<String>, due_date: NaiveDate) -> Self {
        self.assigned_analyst = Some(analyst.into());
        self.due_date = Some(due_date);
        self
    }

    /// Test id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Test name, e.g. "pH"
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> TestStatus {
        self.status
    }

    /// Assigned analyst
    #[inline]
    #[must_use]
    pub fn assigned_analyst(&self) -> Option<&str> {
        self.assigned_analyst.as_deref()
    }

    /// Due date
    #[inline]
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub(crate) fn set_status(&mut self, status: TestStatus) {
        self.status = status;
    }

    pub(crate) fn set_assignment(&mut self, analyst: String, due_date: NaiveDate) {
        self.assigned_analyst = Some(analyst);
        self.due_date = Some(due_date);
    }
}

/// A physical sample carrying tests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    id: String,
    name: String,
    #[serde(default)]
    tests: Vector<Test>,
    #[serde(default)]
    status: SampleStatus,
    #[serde(default)]
    assigned_divisional_head: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

impl Sample {
    /// Register a sample with no tests
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tests: Vector::new(),
            status: SampleStatus::PendingAllocation,
            assigned_divisional_head: None,
            due_date: None,
        }
    }

    /// Add a test
    #[must_use]
    pub fn with_test(mut self, test: Test) -> Self {
        self.tests.push_back(test);
        self.status = cascade::sample_status(&self.tests);
        self
    }

    /// Restore the divisional head and due date
    #[must_use]
    pub fn with_head(mut self, head: impl Into<String>, due_date: NaiveDate) -> Self {
        self.assigned_divisional_head = Some(head.into());
        self.due_date = Some(due_date);
        self
    }

    /// Sample id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Sample description
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tests in registration order
    #[inline]
    #[must_use]
    pub fn tests(&self) -> &Vector<Test> {
        &self.tests
    }

    /// Derived status
    #[inline]
    #[must_use]
    pub fn status(&self) -> SampleStatus {
        self.status
    }

    /// Assigned divisional head
    #[inline]
    #[must_use]
    pub fn assigned_divisional_head(&self) -> Option<&str> {
        self.assigned_divisional_head.as_deref()
    }

    /// Due date
    #[inline]
    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub(crate) fn tests_mut(&mut self) -> &mut Vector<Test> {
        &mut self.tests
    }

    pub(crate) fn set_status(&mut self, status: SampleStatus) {
        self.status = status;
    }

    pub(crate) fn set_assignment(&mut self, head: String, due_date: NaiveDate) {
        self.assigned_divisional_head = Some(head);
        self.due_date = Some(due_date);
    }
}

/// A customer order carrying samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: String,
    customer: String,
    #[serde(default)]
    samples: Vector<Sample>,
    #[serde(default)]
    approved: bool,
    #[serde(default)]
    status: OrderStatus,
}

impl Order {
    /// Register an order with no samples
    #[must_use]
    pub fn new(id: impl Into<String>, customer: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            customer: customer.into(),
            samples: Vector::new(),
            approved: false,
            status: OrderStatus::PendingAssignment,
        }
    }

    /// Add a sample
    #[must_use]
    pub fn with_sample(mut self, sample: Sample) -> Self {
        self.samples.push_back(sample);
        cascade::recompute_order(&mut self);
        self
    }

    /// Order id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Customer name
    #[inline]
    #[must_use]
    pub fn customer(&self) -> &str {
        &self.customer
    }

    /// Samples in registration order
    #[inline]
    #[must_use]
    pub fn samples(&self) -> &Vector<Sample> {
        &self.samples
    }

    /// Whether the order carries an approval
    #[inline]
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approved
    }

    /// Derived status
    #[inline]
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Iterate every test of every sample
    pub fn tests(&self) -> impl Iterator<Item = &Test> {
        self.samples.iter().flat_map(|s| s.tests.iter())
    }

    pub(crate) fn samples_mut(&mut self) -> &mut Vector<Sample> {
        &mut self.samples
    }

    pub(crate) fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
    }

    pub(crate) fn set_approved(&mut self, approved: bool) {
        self.approved = approved;
    }
}

/// Position of a node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Index of the order
    Order(usize),
    /// Order index, sample index
    Sample(usize, usize),
    /// Order index, sample index, test index
    Test(usize, usize, usize),
}

impl Location {
    /// Kind of node at this location
    #[inline]
    #[must_use]
    pub fn kind(self) -> NodeKind {
        match self {
            Self::Order(_) => NodeKind::Order,
            Self::Sample(..) => NodeKind::Sample,
            Self::Test(..) => NodeKind::Test,
        }
    }

    /// Index of the order containing this node
    #[inline]
    #[must_use]
    pub fn order_index(self) -> usize {
        match self {
            Self::Order(o) | Self::Sample(o, _) | Self::Test(o, _, _) => o,
        }
    }
}

/// Snapshot of every order with statuses consistent with their children
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Order>", into = "Vec<Order>")]
pub struct WorkTree {
    orders: Vector<Order>,
}

impl WorkTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from orders, recomputing every derived status
    ///
    /// # Errors
    /// Returns [`WorkflowError::DuplicateId`] if any id appears twice.
    pub fn from_orders(orders: impl IntoIterator<Item = Order>) -> Result<Self, WorkflowError> {
        let tree = Self {
            orders: orders.into_iter().collect(),
        };
        tree.check_unique_ids()?;
        Ok(cascade::recompute(&tree))
    }

    /// Register a new order
    ///
    /// # Errors
    /// Returns [`WorkflowError::DuplicateId`] if any id in `order` is already taken.
    pub fn register(&self, order: Order) -> Result<Self, WorkflowError> {
        let mut next = self.clone();
        next.orders.push_back(order);
        next.check_unique_ids()?;
        let last = next.orders.len() - 1;
        if let Some(order) = next.orders.get_mut(last) {
            cascade::recompute_order(order);
        }
        tracing::debug!(order = %next.orders[last].id, "order registered");
        Ok(next)
    }

    /// Orders in registration order
    #[inline]
    #[must_use]
    pub fn orders(&self) -> &Vector<Order> {
        &self.orders
    }

    /// Number of orders
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if there are no orders
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Find where a node lives
    #[must_use]
    pub fn locate(&self, id: &str) -> Option<Location> {
        for (o, order) in self.orders.iter().enumerate() {
            if order.id == id {
                return Some(Location::Order(o));
            }
            for (s, sample) in order.samples.iter().enumerate() {
                if sample.id == id {
                    return Some(Location::Sample(o, s));
                }
                if let Some(t) = sample.tests.iter().position(|test| test.id == id) {
                    return Some(Location::Test(o, s, t));
                }
            }
        }
        None
    }

    /// Check whether a node exists
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.locate(id).is_some()
    }

    /// Look up an order
    #[must_use]
    pub fn order(&self, id: &str) -> Option<&Order> {
        match self.locate(id)? {
            Location::Order(o) => self.orders.get(o),
            _ => None,
        }
    }

    /// Look up a sample
    #[must_use]
    pub fn sample(&self, id: &str) -> Option<&Sample> {
        match self.locate(id)? {
            Location::Sample(o, s) => self.orders.get(o)?.samples.get(s),
            _ => None,
        }
    }

    /// Look up a test
    #[must_use]
    pub fn test(&self, id: &str) -> Option<&Test> {
        match self.locate(id)? {
            Location::Test(o, s, t) => self.orders.get(o)?.samples.get(s)?.tests.get(t),
            _ => None,
        }
    }

    /// Ids of the node's ancestors, nearest first
    #[must_use]
    pub fn ancestors(&self, id: &str) -> Vec<&str> {
        match self.locate(id) {
            Some(Location::Test(o, s, _)) => {
                let order = &self.orders[o];
                vec![order.samples[s].id.as_str(), order.id.as_str()]
            }
            Some(Location::Sample(o, _)) => vec![self.orders[o].id.as_str()],
            _ => Vec::new(),
        }
    }

    pub(crate) fn orders_mut(&mut self) -> &mut Vector<Order> {
        &mut self.orders
    }

    fn check_unique_ids(&self) -> Result<(), WorkflowError> {
        let mut seen = HashSet::new();
        for order in &self.orders {
            let ids = std::iter::once(order.id.as_str()).chain(order.samples.iter().flat_map(
                |sample| {
                    std::iter::once(sample.id.as_str())
                        .chain(sample.tests.iter().map(|t| t.id.as_str()))
                },
            ));
            for id in ids {
                if !seen.insert(id) {
                    return Err(WorkflowError::DuplicateId(id.to_string()));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Order>> for WorkTree {
    type Error = WorkflowError;

    fn try_from(orders: Vec<Order>) -> Result<Self, Self::Error> {
        Self::from_orders(orders)
    }
}

impl From<WorkTree> for Vec<Order> {
    fn from(tree: WorkTree) -> Self {
        tree.orders.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> WorkTree {
        WorkTree::from_orders([Order::new("ORD-1", "Acme").with_sample(
            Sample::new("S-1", "Soil")
                .with_test(Test::new("T-1", "pH"))
                .with_test(Test::new("T-2", "Moisture")),
        )])
        .unwrap()
    }

    #[test]
    fn locates_every_level() {
        let tree = tree();
        assert_eq!(tree.locate("ORD-1"), Some(Location::Order(0)));
        assert_eq!(tree.locate("S-1"), Some(Location::Sample(0, 0)));
        assert_eq!(tree.locate("T-2"), Some(Location::Test(0, 0, 1)));
        assert_eq!(tree.locate("nope"), None);
        assert_eq!(tree.test("T-1").map(Test::name), Some("pH"));
        assert!(tree.sample("T-1").is_none());
    }

    #[test]
    fn ancestors_nearest_first() {
        assert_eq!(tree().ancestors("T-1"), vec!["S-1", "ORD-1"]);
        assert_eq!(tree().ancestors("S-1"), vec!["ORD-1"]);
        assert!(tree().ancestors("ORD-1").is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = tree()
            .register(Order::new("ORD-2", "Beta").with_sample(Sample::new("S-1", "Water")))
            .unwrap_err();
        assert_eq!(err, WorkflowError::DuplicateId("S-1".into()));
    }

    #[test]
    fn register_leaves_previous_snapshot_alone() {
        let before = tree();
        let after = before.register(Order::new("ORD-2", "Beta")).unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn deserialization_recomputes_derived_statuses() {
        let json = serde_json::json!([{
            "id": "ORD-9",
            "customer": "Acme",
            "status": "Completed",
            "samples": [{
                "id": "S-9",
                "name": "Water",
                "status": "Completed",
                "tests": [
                    {"id": "T-9", "name": "pH", "status": "Assigned"},
                    {"id": "T-10", "name": "TDS"}
                ]
            }]
        }]);
        let tree: WorkTree = serde_json::from_value(json).unwrap();
        assert_eq!(
            tree.sample("S-9").map(Sample::status),
            Some(SampleStatus::PartiallyAllocated)
        );
        assert_eq!(tree.order("ORD-9").map(Order::status), Some(OrderStatus::Assigned));
    }
}
