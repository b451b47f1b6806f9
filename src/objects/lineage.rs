//! Lineage.rs
//!
//! Structural events produced by merges and splits, and the remap table the
//! caller uses to re-resolve any id it holds (a selected body, a followed
//! camera target) after the population changed shape.

use crate::objects::movables::BodyId;
use std::collections::HashMap;

/// Two parents replaced by one merged body
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Merger {
    pub parents: [BodyId; 2],
    pub child: BodyId,
}

/// One parent replaced by four daughters
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Split {
    pub parent: BodyId,
    pub children: [BodyId; 4],
}

/// Remap struct
///
/// Maps every id consumed during a frame to its successor. A merged parent
/// points at the merged body, a split parent at its first daughter.
/// Successors can themselves be consumed later in the same frame, so
/// [`Remap::resolve`] follows the chain to a live id.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Remap {
    successor: HashMap<BodyId, BodyId>,
}

impl Remap {
    pub fn new() -> Self {
        Remap::default()
    }

    pub fn record_merger(&mut self, merger: &Merger) {
        for parent in merger.parents {
            self.successor.insert(parent, merger.child);
        }
    }

    pub fn record_split(&mut self, split: &Split) {
        self.successor.insert(split.parent, split.children[0]);
    }

    pub fn is_empty(&self) -> bool {
        self.successor.is_empty()
    }

    pub fn len(&self) -> usize {
        self.successor.len()
    }

    /// the id that replaced `id` directly, if any
    pub fn successor(&self, id: BodyId) -> Option<BodyId> {
        self.successor.get(&id).copied()
    }

    /// Follows `id` through every recorded merge and split. Ids that were
    /// not consumed resolve to themselves.
    pub fn resolve(&self, id: BodyId) -> BodyId {
        let mut current = id;
        // ids are never reused, so a chain is at most as long as the table
        for _ in 0..=self.successor.len() {
            match self.successor.get(&current) {
                Some(next) => current = *next,
                None => break,
            }
        }
        current
    }
}
