//! Direct-Mapped Correlation Index.
//!
//! Each key hashes to exactly one bucket holding a single entry. A lookup
//! that finds a different key in its bucket replaces it, so the table is a
//! "most recent wins" cache of key → slot bindings.
//!
//! # Performance
//!
//! - `lookup_or_update()`: O(1)
//! - **Space Complexity:** O(N) where N is the table size

use super::{CorrelationEntry, CorrelationIndex};
use crate::ghb::{CorrelationKey, HistoryBuffer, SlotIndex, SlotRef};

/// Hashed single-entry-bucket index.
#[derive(Debug, Clone)]
pub struct DirectMappedIndex {
    /// Bucket storage.
    entries: Vec<CorrelationEntry>,
    /// Lookups whose stored slot failed revalidation.
    stale: u64,
}

impl DirectMappedIndex {
    /// Creates an empty index.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of buckets. Zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![CorrelationEntry::default(); capacity.max(1)],
            stale: 0,
        }
    }

    /// Returns the bucket `key` maps to.
    pub fn bucket(&self, key: &CorrelationKey) -> usize {
        (mix(key.fold()) % self.entries.len() as u64) as usize
    }
}

/// 64-bit finalizer (splitmix64) spreading folded keys over the buckets.
#[inline]
const fn mix(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

impl CorrelationIndex for DirectMappedIndex {
    fn lookup_or_update(
        &mut self,
        key: CorrelationKey,
        slot: SlotRef,
        history: &HistoryBuffer,
    ) -> Option<SlotIndex> {
        let bucket = self.bucket(&key);
        let entry = &mut self.entries[bucket];
        if entry.valid && entry.key == key {
            entry.advance(slot, history, &mut self.stale)
        } else {
            *entry = CorrelationEntry::bind(key, slot);
            None
        }
    }

    fn peek(&self, key: &CorrelationKey) -> Option<SlotRef> {
        let entry = &self.entries[self.bucket(key)];
        (entry.valid && entry.key == *key).then_some(entry.last_slot)
    }

    fn capacity(&self) -> usize {
        self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.valid).count()
    }

    fn stale_rejections(&self) -> u64 {
        self.stale
    }
}
