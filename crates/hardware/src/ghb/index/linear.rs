//! Linear-Scan Correlation Index.
//!
//! Entries are filled in ring order, so the valid entries always form a
//! prefix of the table until it is full. A lookup scans that prefix for the
//! key; a miss writes a fresh entry at the ring cursor, evicting the oldest
//! binding once the table is full.
//!
//! # Performance
//!
//! - `lookup_or_update()`: O(N)
//! - **Space Complexity:** O(N) where N is the table size

use super::{CorrelationEntry, CorrelationIndex};
use crate::ghb::{CorrelationKey, HistoryBuffer, SlotIndex, SlotRef};

/// Collision-free index searched by linear scan.
#[derive(Debug, Clone)]
pub struct LinearScanIndex {
    /// Entry storage.
    entries: Vec<CorrelationEntry>,
    /// Next position to (over)write on a miss.
    cursor: usize,
    /// Lookups whose stored slot failed revalidation.
    stale: u64,
}

impl LinearScanIndex {
    /// Creates an empty index.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of entries. Zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![CorrelationEntry::default(); capacity.max(1)],
            cursor: 0,
            stale: 0,
        }
    }

    /// Returns the position of the entry bound to `key`, if any.
    fn find(&self, key: &CorrelationKey) -> Option<usize> {
        self.entries
            .iter()
            .take_while(|e| e.valid)
            .position(|e| e.key == *key)
    }
}

impl CorrelationIndex for LinearScanIndex {
    fn lookup_or_update(
        &mut self,
        key: CorrelationKey,
        slot: SlotRef,
        history: &HistoryBuffer,
    ) -> Option<SlotIndex> {
        if let Some(pos) = self.find(&key) {
            return self.entries[pos].advance(slot, history, &mut self.stale);
        }
        self.entries[self.cursor] = CorrelationEntry::bind(key, slot);
        self.cursor = (self.cursor + 1) % self.entries.len();
        None
    }

    fn peek(&self, key: &CorrelationKey) -> Option<SlotRef> {
        self.find(key).map(|pos| self.entries[pos].last_slot)
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.iter().take_while(|e| e.valid).count()
    }

    fn stale_rejections(&self) -> u64 {
        self.stale
    }
}
