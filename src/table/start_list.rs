//! Start List
//!
//! Per-unit list of traversal seeds for the downstream graph walk. The list
//! itself is strictly local to one unit and needs no synchronization; only
//! the records it points at live in the global space.

use crate::space::heap::HeapWriter;
use crate::space::types::RecordRef;

#[derive(Debug, Default)]
pub struct StartList {
    refs: Vec<RecordRef>,
}

impl StartList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the record this unit just inserted (the slot right behind the
    /// writer's cursor) as a seed, prepending it to the list.
    ///
    /// Returns `false` when the unit has not inserted anything yet, in which
    /// case there is nothing to capture.
    pub fn record_last(&mut self, writer: &HeapWriter) -> bool {
        match writer.last_claimed() {
            Some(at) => {
                self.refs.push(at);
                true
            }
            None => {
                tracing::warn!(
                    unit = writer.unit().0,
                    "start-list capture before any insert from this unit"
                );
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Seeds in prepend order: the most recently captured record first.
    pub fn iter(&self) -> impl Iterator<Item = RecordRef> + '_ {
        self.refs.iter().rev().copied()
    }
}
