//! Append-only action ledger
//!
//! The audit trail of a match. Actions go in, nothing comes out: the only
//! mutation is `append`, and reads hand back an immutable snapshot.

use serde::{Deserialize, Serialize};

use crate::bout::action::RecordedAction;
use crate::core::types::ActionId;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionLedger {
    actions: Vec<RecordedAction>,
}

impl ActionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, action: RecordedAction) -> ActionId {
        let id = action.id;
        self.actions.push(action);
        id
    }

    /// Ordered snapshot of everything recorded so far
    pub fn as_slice(&self) -> &[RecordedAction] {
        &self.actions
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
