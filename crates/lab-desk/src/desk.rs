//! Desk orchestrator
//!
//! Owns the current [`WorkTree`] snapshot and its undo history, and routes
//! irreversible actions through the [`ConfirmationGate`] before they reach
//! the tree. Every method takes `&self`: a gated action awaits its decision
//! without holding the snapshot lock, so the desk stays usable meanwhile.
//! Nodes named by an outstanding confirmation, and everything above or
//! below them, refuse changes with [`DeskError::TargetLocked`].

use lab_confirm::{ConfirmDescriptor, ConfirmationGate};
use lab_records::Record;
use lab_table::ViewState;
use lab_workflow::{Assignment, NodeKind, Order, WorkTree, WorkflowError};
use parking_lot::Mutex;

use crate::config::DeskConfig;
use crate::error::DeskError;
use crate::history::History;
use crate::projection;

/// Result of a gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Confirmed and committed
    Applied,
    /// Declined; nothing changed
    Declined,
}

impl Outcome {
    /// Check if the action was committed
    #[inline]
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

#[derive(Debug)]
struct DeskState {
    tree: WorkTree,
    history: History,
}

/// Workflow desk
#[derive(Debug)]
pub struct Desk {
    state: Mutex<DeskState>,
    gate: ConfirmationGate,
    config: DeskConfig,
}

impl Desk {
    /// Create desk with an empty tree
    ///
    /// # Errors
    /// Returns [`DeskError::Config`] if the configuration is out of range.
    pub fn new(config: DeskConfig) -> Result<Self, DeskError> {
        Self::with_tree(config, WorkTree::new())
    }

    /// Create desk over an existing tree
    ///
    /// # Errors
    /// Returns [`DeskError::Config`] if the configuration is out of range.
    pub fn with_tree(config: DeskConfig, tree: WorkTree) -> Result<Self, DeskError> {
        config.validate()?;
        tracing::info!(
            orders = tree.len(),
            policy = ?config.gate_policy,
            history_limit = config.history_limit,
            "desk ready"
        );
        Ok(Self {
            state: Mutex::new(DeskState {
                tree,
                history: History::new(config.history_limit),
            }),
            gate: ConfirmationGate::new(config.gate_policy),
            config,
        })
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    /// Gate handle for the UI side
    #[inline]
    #[must_use]
    pub fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// Current snapshot
    #[must_use]
    pub fn tree(&self) -> WorkTree {
        self.state.lock().tree.clone()
    }

    /// Fresh view state sized by the configuration
    ///
    /// # Errors
    /// Returns [`DeskError::Table`] if the page size is zero.
    pub fn view_state(&self) -> Result<ViewState, DeskError> {
        Ok(ViewState::new(self.config.page_size)?)
    }

    /// Current snapshot projected to rows of one node kind
    #[must_use]
    pub fn rows(&self, kind: NodeKind) -> Vec<Record> {
        projection::rows(&self.state.lock().tree, kind)
    }

    /// Add an order
    ///
    /// # Errors
    /// Returns [`DeskError::Workflow`] if any id in the order is taken.
    pub fn register_order(&self, order: Order) -> Result<(), DeskError> {
        self.commit(&[], |tree| tree.register(order))
    }

    /// Assign staff and a due date
    ///
    /// # Errors
    /// - [`DeskError::TargetLocked`] while a confirmation touching the node is pending
    /// - [`DeskError::Workflow`] as for [`WorkTree::assign`]
    pub fn assign(&self, id: &str, assignment: &Assignment) -> Result<(), DeskError> {
        self.commit(&[id], |tree| tree.assign(id, assignment))
    }

    /// Start work on a test
    ///
    /// # Errors
    /// - [`DeskError::TargetLocked`] while a confirmation touching the node is pending
    /// - [`DeskError::Workflow`] as for [`WorkTree::start_test`]
    pub fn start_test(&self, id: &str) -> Result<(), DeskError> {
        self.commit(&[id], |tree| tree.start_test(id))
    }

    /// Finish work on a test
    ///
    /// # Errors
    /// - [`DeskError::TargetLocked`] while a confirmation touching the node is pending
    /// - [`DeskError::Workflow`] as for [`WorkTree::complete_test`]
    pub fn complete_test(&self, id: &str) -> Result<(), DeskError> {
        self.commit(&[id], |tree| tree.complete_test(id))
    }

    /// Approve a completed order
    ///
    /// # Errors
    /// - [`DeskError::TargetLocked`] while a confirmation touching the node is pending
    /// - [`DeskError::Workflow`] as for [`WorkTree::approve_order`]
    pub fn approve_order(&self, id: &str) -> Result<(), DeskError> {
        self.commit(&[id], |tree| tree.approve_order(id))
    }

    /// Delete a node after the user confirms
    ///
    /// A declined request leaves the tree untouched.
    ///
    /// # Errors
    /// - [`DeskError::TargetLocked`] while a confirmation touching the node is pending
    /// - [`DeskError::Gate`] when the gate rejects overlapping requests
    /// - [`DeskError::Workflow`] if the node is unknown
    pub async fn delete(&self, id: &str) -> Result<Outcome, DeskError> {
        let kind = self.prepare(id)?;
        let descriptor = ConfirmDescriptor::destructive(
            format!("Delete {kind}"),
            format!("Delete {kind} {id} and everything under it?"),
        )
        .for_target(id);

        if !self.ask(descriptor).await? {
            tracing::debug!(node = id, "delete declined");
            return Ok(Outcome::Declined);
        }

        self.commit(&[id], |tree| tree.remove(id))?;
        tracing::info!(node = id, %kind, "deleted");
        Ok(Outcome::Applied)
    }

    /// Reopen completed work after the user confirms
    ///
    /// # Errors
    /// As for [`Self::delete`], plus [`DeskError::Workflow`] when nothing
    /// under the node is completed.
    pub async fn reopen(&self, id: &str) -> Result<Outcome, DeskError> {
        let kind = self.prepare(id)?;
        // Fail before prompting when there is nothing to reopen.
        self.tree().reopen(id)?;

        let descriptor = ConfirmDescriptor::warning(
            format!("Reopen {kind}"),
            format!("Send completed work on {kind} {id} back to in progress?"),
        )
        .for_target(id);

        if !self.ask(descriptor).await? {
            tracing::debug!(node = id, "reopen declined");
            return Ok(Outcome::Declined);
        }

        self.commit(&[id], |tree| tree.reopen(id))?;
        tracing::info!(node = id, %kind, "reopened");
        Ok(Outcome::Applied)
    }

    /// Reopen several nodes under one confirmation, all or nothing
    ///
    /// # Errors
    /// - [`DeskError::EmptySelection`] for an empty selection
    /// - otherwise as for [`Self::reopen`], for the first failing node
    pub async fn bulk_reopen(&self, ids: &[&str]) -> Result<Outcome, DeskError> {
        if ids.is_empty() {
            return Err(DeskError::EmptySelection);
        }
        let snapshot = self.tree();
        for id in ids {
            self.ensure_unlocked(&snapshot, id)?;
        }
        reopen_all(&snapshot, ids)?;

        let descriptor = ConfirmDescriptor::warning(
            "Reopen selected",
            format!("Send completed work on {} selected items back to in progress?", ids.len()),
        )
        .for_targets(ids.iter().copied());
        if !self.ask(descriptor).await? {
            tracing::debug!(count = ids.len(), "bulk reopen declined");
            return Ok(Outcome::Declined);
        }

        self.commit(ids, |tree| reopen_all(tree, ids))?;
        tracing::info!(count = ids.len(), "bulk reopened");
        Ok(Outcome::Applied)
    }

    /// Restore the snapshot before the last change
    ///
    /// # Errors
    /// - [`DeskError::HistoryLocked`] while any confirmation is pending
    /// - [`DeskError::NothingToUndo`] when the history is empty
    pub fn undo(&self) -> Result<(), DeskError> {
        let mut state = self.state.lock();
        self.ensure_history_unlocked()?;
        let current = state.tree.clone();
        let previous = state.history.undo(current).ok_or(DeskError::NothingToUndo)?;
        state.tree = previous;
        tracing::debug!("undo");
        Ok(())
    }

    /// Re-apply the last undone change
    ///
    /// # Errors
    /// - [`DeskError::HistoryLocked`] while any confirmation is pending
    /// - [`DeskError::NothingToRedo`] when nothing was undone
    pub fn redo(&self) -> Result<(), DeskError> {
        let mut state = self.state.lock();
        self.ensure_history_unlocked()?;
        let current = state.tree.clone();
        let next = state.history.redo(current).ok_or(DeskError::NothingToRedo)?;
        state.tree = next;
        tracing::debug!("redo");
        Ok(())
    }

    /// Check if [`Self::undo`] would succeed
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.state.lock().history.can_undo()
    }

    /// Check if [`Self::redo`] would succeed
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.state.lock().history.can_redo()
    }

    /// Apply `change` unless a pending confirmation touches any of `ids`
    fn commit<F>(&self, ids: &[&str], change: F) -> Result<(), DeskError>
    where
        F: FnOnce(&WorkTree) -> Result<WorkTree, WorkflowError>,
    {
        let mut state = self.state.lock();
        for id in ids {
            self.ensure_unlocked(&state.tree, id)?;
        }
        let next = change(&state.tree)?;
        let previous = std::mem::replace(&mut state.tree, next);
        state.history.record(previous);
        Ok(())
    }

    /// Resolve the node and check it is free to change
    fn prepare(&self, id: &str) -> Result<NodeKind, DeskError> {
        let tree = self.tree();
        let location = tree
            .locate(id)
            .ok_or_else(|| WorkflowError::NotFound(id.to_string()))?;
        self.ensure_unlocked(&tree, id)?;
        Ok(location.kind())
    }

    async fn ask(&self, descriptor: ConfirmDescriptor) -> Result<bool, DeskError> {
        let request = self.gate.request_confirmation(descriptor)?;
        Ok(request.decision().await)
    }

    fn ensure_history_unlocked(&self) -> Result<(), DeskError> {
        match self.gate.current() {
            Some(prompt) => {
                let pending = if prompt.descriptor.targets.is_empty() {
                    prompt.descriptor.title
                } else {
                    prompt.descriptor.targets.join(", ")
                };
                tracing::warn!(pending = %pending, "history change refused while confirmation pending");
                Err(DeskError::HistoryLocked { pending })
            }
            None => Ok(()),
        }
    }

    fn ensure_unlocked(&self, tree: &WorkTree, id: &str) -> Result<(), DeskError> {
        let locked = related_ids(tree, id)
            .into_iter()
            .find(|related| self.gate.is_pending_for(related));

        match locked {
            Some(pending) => {
                tracing::warn!(node = id, pending = %pending, "change refused while confirmation pending");
                Err(DeskError::TargetLocked {
                    id: id.to_string(),
                    pending,
                })
            }
            None => Ok(()),
        }
    }
}

fn reopen_all(tree: &WorkTree, ids: &[&str]) -> Result<WorkTree, WorkflowError> {
    ids.iter().try_fold(tree.clone(), |tree, id| tree.reopen(id))
}

/// The node itself, its ancestors and its descendants
fn related_ids(tree: &WorkTree, id: &str) -> Vec<String> {
    let mut ids: Vec<String> = std::iter::once(id)
        .chain(tree.ancestors(id))
        .map(str::to_string)
        .collect();

    if let Some(order) = tree.order(id) {
        for sample in order.samples() {
            ids.push(sample.id().to_string());
            ids.extend(sample.tests().iter().map(|t| t.id().to_string()));
        }
    } else if let Some(sample) = tree.sample(id) {
        ids.extend(sample.tests().iter().map(|t| t.id().to_string()));
    }
    ids
}
