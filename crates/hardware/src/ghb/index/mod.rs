//! Correlation Index strategies.
//!
//! Maps a correlation key to the most recent History Buffer slot that
//! produced it. Two strategies satisfy the same contract:
//!
//! - `DirectMapped`: hash the key into single-entry buckets. O(1); two keys
//!   sharing a bucket evict each other.
//! - `LinearScan`: scan a compact table filled in ring order. O(capacity);
//!   never aliases.
//!
//! Both evict in plain FIFO / most-recent-wins order, and both revalidate a
//! stored slot against the History Buffer before returning it.

/// Direct-mapped (hashed) index.
pub mod direct;

/// Linear-scan index.
pub mod linear;

pub use direct::DirectMappedIndex;
pub use linear::LinearScanIndex;

use std::fmt;

use tracing::trace;

use super::{CorrelationKey, HistoryBuffer, SlotIndex, SlotRef};
use crate::config::IndexKind;

/// One Correlation Index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationEntry {
    /// Key this entry is bound to.
    pub key: CorrelationKey,
    /// Most recent History Buffer slot that produced `key`.
    pub last_slot: SlotRef,
    /// Whether the entry is in use.
    pub valid: bool,
}

impl Default for CorrelationEntry {
    fn default() -> Self {
        Self {
            key: CorrelationKey::Address(0),
            last_slot: SlotRef::default(),
            valid: false,
        }
    }
}

impl CorrelationEntry {
    /// Creates a valid entry binding `key` to `slot`.
    #[inline]
    pub const fn bind(key: CorrelationKey, slot: SlotRef) -> Self {
        Self {
            key,
            last_slot: slot,
            valid: true,
        }
    }

    /// Repoints a matching entry at `slot` and returns the previous slot if
    /// it is still live in `history`.
    ///
    /// A stale previous slot (evicted or reused since it was stored) is
    /// reported as "no prior correlation" and counted in `stale`.
    fn advance(
        &mut self,
        slot: SlotRef,
        history: &HistoryBuffer,
        stale: &mut u64,
    ) -> Option<SlotIndex> {
        let old = std::mem::replace(&mut self.last_slot, slot);
        if history.is_live(old) {
            Some(old.index)
        } else {
            *stale += 1;
            trace!(
                slot = old.index.val(),
                generation = old.generation,
                "correlation index entry outlived its history slot"
            );
            None
        }
    }
}

/// Trait for Correlation Index implementations.
pub trait CorrelationIndex: Send + Sync + fmt::Debug {
    /// Records that `key` was just produced by `slot` and returns the
    /// previous slot that produced it.
    ///
    /// # Arguments
    ///
    /// * `key` - The correlation key of the new access.
    /// * `slot` - The History Buffer slot the new access is being written to.
    /// * `history` - The History Buffer, used to validate the stored slot.
    ///
    /// # Returns
    ///
    /// The previous slot for `key` if one is recorded and still live,
    /// otherwise `None`.
    fn lookup_or_update(
        &mut self,
        key: CorrelationKey,
        slot: SlotRef,
        history: &HistoryBuffer,
    ) -> Option<SlotIndex>;

    /// Returns the stored slot for `key` without updating or validating it.
    fn peek(&self, key: &CorrelationKey) -> Option<SlotRef>;

    /// Returns the number of entries the table can hold.
    fn capacity(&self) -> usize;

    /// Returns the number of valid entries.
    fn len(&self) -> usize;

    /// Returns `true` if no entry is valid.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns how many lookups found an entry whose slot was no longer live.
    fn stale_rejections(&self) -> u64;
}

/// Builds the Correlation Index selected by `kind`.
pub fn build(kind: IndexKind, capacity: usize) -> Box<dyn CorrelationIndex> {
    match kind {
        IndexKind::DirectMapped => Box::new(DirectMappedIndex::new(capacity)),
        IndexKind::LinearScan => Box::new(LinearScanIndex::new(capacity)),
    }
}
