//! Undo ledger.
//!
//! Each undoable command pushes the state it started from. Snapshots are
//! `im`-backed, so an entry costs a few pointer copies. The ledger is
//! cleared when the current player draws (hidden information enters the
//! game) and when the turn passes.

use serde::{Deserialize, Serialize};

use crate::core::{ActionRecord, GameState};

/// One undoable command and the state before it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub record: ActionRecord,
    pub snapshot: GameState,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoLedger {
    entries: Vec<LedgerEntry>,
}

impl UndoLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ActionRecord, snapshot: GameState) {
        self.entries.push(LedgerEntry { record, snapshot });
    }

    /// Remove the most recent entry.
    pub fn pop(&mut self) -> Option<LedgerEntry> {
        self.entries.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded commands, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &ActionRecord> {
        self.entries.iter().map(|e| &e.record)
    }
}
