//! Global History Buffer correlation engine.
//!
//! This module contains the data structures that detect repeating address
//! patterns and extrapolate future addresses from them:
//! 1. **History Buffer:** A fixed ring of past accesses, each slot linked to the
//!    previous slot that produced the same correlation key.
//! 2. **Correlation Index:** A fixed table mapping a key to the most recent slot
//!    that produced it.
//! 3. **Candidate Generator:** Walks a slot's chain and turns the deltas that
//!    followed each past occurrence into prefetch addresses.
//!
//! Slots are addressed by [`SlotIndex`]. Anything that stores an index for
//! later use stores a [`SlotRef`], which also carries the slot's insertion
//! generation, and must revalidate it against the ring before dereferencing.

/// Candidate generation (recency walk, frequency ranking, cold start).
pub mod candidate;

/// Signed address deltas.
pub mod delta;

/// The History Buffer ring.
pub mod history;

/// Correlation Index strategies.
pub mod index;

/// Correlation key functions.
pub mod key;

/// Bounded top-K selection for frequency ranking.
pub mod ranking;

pub use candidate::{CandidateGenerator, CandidateSource};
pub use delta::Delta;
pub use history::{HistoryBuffer, HistorySlot};
pub use index::{CorrelationEntry, CorrelationIndex, DirectMappedIndex, LinearScanIndex};
pub use key::CorrelationKey;
pub use ranking::{BoundedTopK, Candidate};

/// Position of a slot in the History Buffer ring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub usize);

impl SlotIndex {
    /// Creates a slot index from a raw ring position.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw ring position.
    #[inline(always)]
    pub const fn val(self) -> usize {
        self.0
    }
}

/// A slot index tagged with the generation of the insert that filled it.
///
/// A ring position is reused every `capacity` inserts; the generation tells
/// a reference to the current occupant apart from a reference to an
/// earlier one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SlotRef {
    /// Ring position.
    pub index: SlotIndex,
    /// Insertion generation of the occupant this reference was taken from.
    pub generation: u64,
}
