//! History Buffer.
//!
//! A fixed-capacity circular log of observed accesses. Each slot is linked
//! to the previous slot that produced the same correlation key
//! (`predecessor`) and to the next one (`successor`), forming per-key
//! chains threaded through the ring.
//!
//! # Invariants
//!
//! - `slots[x].successor == Some(y)` iff `slots[y].predecessor == Some(x)`.
//! - No link ever names a slot that is not valid.
//! - A slot's predecessor is strictly older than the slot itself.
//!
//! # Slot lifecycle
//!
//! ```text
//!   empty ──insert, no match──▶ valid-unlinked ──later match──▶ valid-linked
//!     ▲                                ▲                             │
//!     │                                └──chain successor evicted────┘
//!     └──────────────── ring overwrite (from any valid state) ──────────
//! ```
//!
//! # Performance
//!
//! - `insert()`: O(1) plus one Correlation Index lookup
//! - `recent_address()` / `ring_successor()`: O(1)
//! - **Space Complexity:** O(C), allocated once

use tracing::warn;

use super::index::CorrelationIndex;
use super::{CorrelationKey, SlotIndex, SlotRef};

/// One position in the History Buffer ring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HistorySlot {
    /// Address of the recorded access.
    pub address: u64,
    /// Whether the slot currently holds an access.
    pub valid: bool,
    /// Insertion generation of the current occupant.
    pub generation: u64,
    /// Previous slot that produced the same correlation key.
    pub predecessor: Option<SlotIndex>,
    /// Next slot that produced the same correlation key.
    pub successor: Option<SlotIndex>,
}

/// Fixed-capacity ring of past accesses with correlation chains.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    /// Ring storage.
    slots: Vec<HistorySlot>,
    /// Most recently written slot.
    head: Option<SlotIndex>,
    /// Generation assigned to the next insert (equals total inserts so far).
    next_generation: u64,
    /// Number of times a lookup produced a slot as its own predecessor.
    self_loops: u64,
}

impl HistoryBuffer {
    /// Creates an empty History Buffer.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of ring slots. Zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![HistorySlot::default(); capacity.max(1)],
            head: None,
            next_generation: 0,
            self_loops: 0,
        }
    }

    /// Returns the number of ring slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of valid slots.
    #[inline]
    pub fn len(&self) -> usize {
        usize::try_from(self.next_generation).map_or(self.capacity(), |n| n.min(self.capacity()))
    }

    /// Returns `true` if nothing has been recorded yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the most recently written slot.
    #[inline]
    pub const fn head(&self) -> Option<SlotIndex> {
        self.head
    }

    /// Returns the total number of inserts performed.
    #[inline]
    pub const fn inserts(&self) -> u64 {
        self.next_generation
    }

    /// Returns how often the self-loop consistency check has fired.
    #[inline]
    pub const fn self_loops(&self) -> u64 {
        self.self_loops
    }

    /// Returns the raw slot at `index`, valid or not.
    pub fn slot(&self, index: SlotIndex) -> Option<&HistorySlot> {
        self.slots.get(index.val())
    }

    /// Returns the slot at `index` only if it is valid.
    fn live(&self, index: SlotIndex) -> Option<&HistorySlot> {
        self.slots.get(index.val()).filter(|s| s.valid)
    }

    /// Returns the address recorded in a valid slot.
    pub fn address(&self, index: SlotIndex) -> Option<u64> {
        self.live(index).map(|s| s.address)
    }

    /// Returns the chain predecessor of a valid slot.
    pub fn predecessor(&self, index: SlotIndex) -> Option<SlotIndex> {
        self.live(index).and_then(|s| s.predecessor)
    }

    /// Returns the chain successor of a valid slot.
    pub fn successor(&self, index: SlotIndex) -> Option<SlotIndex> {
        self.live(index).and_then(|s| s.successor)
    }

    /// Returns a generation-tagged reference to a valid slot.
    pub fn slot_ref(&self, index: SlotIndex) -> Option<SlotRef> {
        self.live(index).map(|s| SlotRef {
            index,
            generation: s.generation,
        })
    }

    /// Checks whether a stored reference still names the slot's current occupant.
    ///
    /// Both the validity flag and the generation must match; a ring position
    /// that has been reused by a later insert is not live for an older reference.
    #[inline]
    pub fn is_live(&self, slot: SlotRef) -> bool {
        self.live(slot.index)
            .is_some_and(|s| s.generation == slot.generation)
    }

    /// Returns the address recorded `age` inserts ago (`0` is the head).
    pub fn recent_address(&self, age: usize) -> Option<u64> {
        let head = self.head?;
        if age >= self.len() {
            return None;
        }
        let cap = self.capacity();
        let idx = SlotIndex((head.val() + cap - age) % cap);
        let head_gen = self.live(head)?.generation;
        self.live(idx)
            .filter(|s| s.generation + age as u64 == head_gen)
            .map(|s| s.address)
    }

    /// Returns the slot written `steps` inserts after `index`, in ring order.
    ///
    /// This is the chronological successor, not the chain successor. `None`
    /// if `index` is not valid, `steps` is zero or spans the whole ring, or
    /// that insert has not happened yet.
    pub fn ring_successor(&self, index: SlotIndex, steps: usize) -> Option<SlotIndex> {
        let cap = self.capacity();
        if steps == 0 || steps >= cap {
            return None;
        }
        let base = self.live(index)?;
        let next = SlotIndex((index.val() + steps) % cap);
        self.live(next)
            .filter(|s| s.generation == base.generation + steps as u64)
            .map(|_| next)
    }

    /// Records an access and links it into its key's chain.
    ///
    /// Advances the head, unlinks and discards the slot being overwritten,
    /// asks `index` for the previous slot with the same key, and links the
    /// two. Accesses without a key are recorded unlinked.
    ///
    /// # Arguments
    ///
    /// * `address` - The accessed address.
    /// * `key` - Correlation key of the access, if one could be formed.
    /// * `index` - The Correlation Index to query and update.
    ///
    /// # Returns
    ///
    /// The slot the access was written to.
    pub fn insert(
        &mut self,
        address: u64,
        key: Option<CorrelationKey>,
        index: &mut dyn CorrelationIndex,
    ) -> SlotIndex {
        let cap = self.capacity();
        let next = SlotIndex(self.head.map_or(0, |h| (h.val() + 1) % cap));
        self.evict(next);

        let generation = self.next_generation;
        self.next_generation += 1;

        let this = SlotRef {
            index: next,
            generation,
        };
        let mut predecessor = key.and_then(|k| index.lookup_or_update(k, this, self));

        if predecessor == Some(next) {
            self.self_loops += 1;
            warn!(slot = next.val(), address, "history slot resolved as its own predecessor");
            predecessor = None;
        }

        self.slots[next.val()] = HistorySlot {
            address,
            valid: true,
            generation,
            predecessor,
            successor: None,
        };

        if let Some(p) = predecessor {
            if let Some(stale) = self.slots[p.val()].successor.replace(next) {
                self.slots[stale.val()].predecessor = None;
            }
        }

        self.head = Some(next);
        next
    }

    /// Discards the occupant of `index`, severing both of its chain links.
    fn evict(&mut self, index: SlotIndex) {
        let old = self.slots[index.val()];
        if !old.valid {
            return;
        }
        if let Some(s) = old.successor {
            self.slots[s.val()].predecessor = None;
        }
        if let Some(p) = old.predecessor {
            let pred = &mut self.slots[p.val()];
            if pred.successor == Some(index) {
                pred.successor = None;
            }
        }
        self.slots[index.val()] = HistorySlot::default();
    }

    /// Verifies the link invariants over the whole ring.
    ///
    /// O(C). Intended for tests and debugging, not the access path.
    pub fn links_consistent(&self) -> bool {
        self.slots.iter().enumerate().all(|(i, slot)| {
            if !slot.valid {
                return slot.predecessor.is_none() && slot.successor.is_none();
            }
            let me = SlotIndex(i);
            let pred_ok = slot.predecessor.is_none_or(|p| {
                p != me
                    && self.live(p).is_some_and(|ps| {
                        ps.successor == Some(me) && ps.generation < slot.generation
                    })
            });
            let succ_ok = slot.successor.is_none_or(|s| {
                self.live(s).is_some_and(|ss| {
                    ss.predecessor == Some(me) && ss.generation > slot.generation
                })
            });
            pred_ok && succ_ok
        })
    }
}
