//! Bounded top-K selection.
//!
//! Frequency ranking tallies every distinct candidate reachable through a
//! chain and keeps only the `K` best. [`BoundedTopK`] holds them in a
//! min-heap capped at `K` entries: each offer is O(log K) and the heap always
//! retains the highest-support candidates seen so far.
//!
//! ```text
//!   offer(c):  len < K            → push
//!              c > heap.min       → pop min, push c
//!              otherwise          → drop c
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A prefetch candidate with the number of chain hops that predicted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Predicted address.
    pub address: u64,
    /// Number of observations supporting the prediction.
    pub support: u32,
}

/// Heap element: a candidate plus the order in which it was first observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ranked {
    candidate: Candidate,
    first_seen: usize,
}

impl Ord for Ranked {
    /// Higher support ranks higher; on equal support the candidate observed
    /// first (closest to the live access) ranks higher.
    fn cmp(&self, other: &Self) -> Ordering {
        self.candidate
            .support
            .cmp(&other.candidate.support)
            .then_with(|| other.first_seen.cmp(&self.first_seen))
            .then_with(|| self.candidate.address.cmp(&other.candidate.address))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap retaining the `capacity` best candidates offered.
#[derive(Debug, Clone)]
pub struct BoundedTopK {
    heap: BinaryHeap<Reverse<Ranked>>,
    capacity: usize,
}

impl BoundedTopK {
    /// Creates an empty selector.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of candidates to retain. Zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    /// Returns the number of candidates retained at most.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of candidates currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Discards every retained candidate.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Offers a candidate for selection.
    ///
    /// # Arguments
    ///
    /// * `candidate` - The candidate and its support count.
    /// * `first_seen` - Order in which the candidate was first observed;
    ///   smaller wins ties on support.
    ///
    /// # Returns
    ///
    /// `true` if the candidate is now retained.
    pub fn offer(&mut self, candidate: Candidate, first_seen: usize) -> bool {
        let ranked = Ranked {
            candidate,
            first_seen,
        };
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(ranked));
            return true;
        }
        match self.heap.peek() {
            Some(Reverse(min)) if ranked > *min => {
                let _ = self.heap.pop();
                self.heap.push(Reverse(ranked));
                true
            }
            _ => false,
        }
    }

    /// Moves every retained candidate into `out`, best first.
    pub fn drain_descending(&mut self, out: &mut Vec<Candidate>) {
        let start = out.len();
        while let Some(Reverse(ranked)) = self.heap.pop() {
            out.push(ranked.candidate);
        }
        out[start..].reverse();
    }
}
