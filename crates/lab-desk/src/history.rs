//! Bounded undo/redo history of tree snapshots
//!
//! Snapshots share structure through `im`, so keeping many is cheap.

use std::collections::VecDeque;

use lab_workflow::WorkTree;

#[derive(Debug, Clone, Default)]
pub(crate) struct History {
    undo: VecDeque<WorkTree>,
    redo: Vec<WorkTree>,
    limit: usize,
}

impl History {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::with_capacity(limit.min(64)),
            redo: Vec::new(),
            limit,
        }
    }

    /// Remember the snapshot a committed change replaced
    pub(crate) fn record(&mut self, previous: WorkTree) {
        self.redo.clear();
        self.push_undo(previous);
    }

    /// Step back from `current`; `None` when exhausted
    pub(crate) fn undo(&mut self, current: WorkTree) -> Option<WorkTree> {
        let previous = self.undo.pop_back()?;
        self.redo.push(current);
        Some(previous)
    }

    /// Step forward from `current`; `None` when exhausted
    pub(crate) fn redo(&mut self, current: WorkTree) -> Option<WorkTree> {
        let next = self.redo.pop()?;
        self.push_undo(current);
        Some(next)
    }

    fn push_undo(&mut self, snapshot: WorkTree) {
        if self.limit == 0 {
            return;
        }
        if self.undo.len() == self.limit {
            self.undo.pop_front();
        }
        self.undo.push_back(snapshot);
    }

    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_workflow::Order;

    fn tree(n: usize) -> WorkTree {
        WorkTree::from_orders((0..n).map(|i| Order::new(format!("O{i}"), "c"))).unwrap()
    }

    #[test]
    fn undo_then_redo() {
        let mut history = History::new(10);
        history.record(tree(0));
        history.record(tree(1));

        let back = history.undo(tree(2)).unwrap();
        assert_eq!(back.len(), 1);
        assert!(history.can_redo());

        let forward = history.redo(back).unwrap();
        assert_eq!(forward.len(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn new_change_clears_redo() {
        let mut history = History::new(10);
        history.record(tree(0));
        let _ = history.undo(tree(1));
        history.record(tree(0));
        assert!(!history.can_redo());
    }

    #[test]
    fn limit_drops_oldest() {
        let mut history = History::new(2);
        for n in 0..5 {
            history.record(tree(n));
        }
        assert_eq!(history.undo(tree(5)).map(|t| t.len()), Some(4));
        assert_eq!(history.undo(tree(4)).map(|t| t.len()), Some(3));
        assert!(history.undo(tree(3)).is_none());
    }

    #[test]
    fn zero_limit_disables_undo() {
        let mut history = History::new(0);
        history.record(tree(0));
        assert!(!history.can_undo());
    }
}
