//! Assignment ledger: LIFO undo history of committed assignments.

use crate::model::Assignment;

#[derive(Debug, Default, Clone)]
pub struct AssignmentLedger {
    stack: Vec<Assignment>,
}

impl AssignmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, assignment: Assignment) {
        self.stack.push(assignment);
    }

    /// Most recent assignment, or `None` when there is nothing to undo.
    pub fn pop(&mut self) -> Option<Assignment> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
