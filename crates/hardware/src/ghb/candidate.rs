//! Candidate Generator.
//!
//! Turns the chain behind a freshly recorded access into prefetch addresses.
//! Each hop back along the chain reaches a past occurrence `s` of the same
//! key; the access recorded `j` inserts after `s` tells what followed it, and
//! the delta `address(s + j) - address(s)` is replayed from the live address.
//!
//! ```text
//!   ring:  ... [s]  [s+1] ... [p] [p+1] ... [head]
//!               │     │        │    │         │
//!               └─ d ─┘        └─ d'┘      current
//!   candidates: current + d', current + d, ...     (recency order)
//! ```
//!
//! Two selection policies share the walk:
//! - **Recency:** emit distinct candidates in chain order until `max_depth`
//!   are found or the chain runs out. Duplicate and out-of-range hops do not
//!   count towards `max_depth`.
//! - **Frequency:** walk the whole chain, count support per distinct
//!   candidate, and emit the `max_depth` best through a [`BoundedTopK`].
//!
//! A key seen for the first time has no chain; the generator then falls back
//! to sequential readahead of `cold_start_degree` blocks.

use std::collections::HashMap;

use tracing::trace;

use super::{BoundedTopK, Candidate, Delta, HistoryBuffer, SlotIndex};
use crate::config::{CANDIDATE_LIMIT, PrefetchConfig, Ranking, TABLE_LIMIT};

/// How a set of candidates was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Extrapolated from the access's correlation chain.
    Correlation,
    /// Sequential readahead for a key with no chain.
    ColdStart,
}

/// Support tally for one distinct candidate address.
#[derive(Debug, Clone, Copy)]
struct Tally {
    support: u32,
    first_seen: usize,
}

/// Chain walker producing prefetch candidates.
#[derive(Debug, Clone)]
pub struct CandidateGenerator {
    ranking: Ranking,
    max_depth: usize,
    max_width: usize,
    cold_start_degree: usize,
    block_size: u64,
    max_phys_addr: u64,
    /// Frequency mode: support per candidate address.
    tally: HashMap<u64, Tally>,
    /// Frequency mode: best `max_depth` candidates.
    top: BoundedTopK,
    /// Frequency mode: drained selection, best first.
    ranked: Vec<Candidate>,
    /// Hops whose extrapolated address left the legal range.
    out_of_range: u64,
}

impl CandidateGenerator {
    /// Creates a generator and allocates its ranking buffers.
    ///
    /// # Arguments
    ///
    /// * `config` - Depth, width, ranking, cold-start, and address-range settings.
    ///   Depth, cold-start degree, and tally size are clamped to the limits
    ///   [`PrefetchConfig::validate`] enforces.
    pub fn new(config: &PrefetchConfig) -> Self {
        let max_depth = config.max_depth.clamp(1, CANDIDATE_LIMIT);
        let max_width = config.max_width.max(1);
        let reachable = config
            .history_size
            .max(1)
            .saturating_mul(max_width)
            .min(TABLE_LIMIT);
        Self {
            ranking: config.ranking,
            max_depth,
            max_width,
            cold_start_degree: config.cold_start_degree.min(CANDIDATE_LIMIT),
            block_size: config.block_size,
            max_phys_addr: config.max_phys_addr,
            tally: match config.ranking {
                Ranking::Frequency => HashMap::with_capacity(reachable),
                Ranking::Recency => HashMap::new(),
            },
            top: BoundedTopK::new(max_depth),
            ranked: Vec::with_capacity(max_depth),
            out_of_range: 0,
        }
    }

    /// Returns the largest number of candidates a single call can emit.
    pub fn max_candidates(&self) -> usize {
        self.max_depth.max(self.cold_start_degree)
    }

    /// Returns how many hops were skipped because their target was out of range.
    pub const fn out_of_range(&self) -> u64 {
        self.out_of_range
    }

    /// Generates candidates for the access just recorded at `chain_head`.
    ///
    /// `out` is cleared first and receives distinct addresses, best first.
    ///
    /// # Arguments
    ///
    /// * `current` - Address of the live access.
    /// * `chain_head` - Slot the live access was recorded in.
    /// * `history` - The History Buffer holding the chain.
    /// * `out` - Destination for the candidate addresses.
    ///
    /// # Returns
    ///
    /// Whether the candidates came from the chain or from cold-start readahead.
    pub fn generate(
        &mut self,
        current: u64,
        chain_head: SlotIndex,
        history: &HistoryBuffer,
        out: &mut Vec<u64>,
    ) -> CandidateSource {
        out.clear();
        let Some(first) = history.predecessor(chain_head) else {
            self.cold_start(current, out);
            return CandidateSource::ColdStart;
        };
        match self.ranking {
            Ranking::Recency => self.by_recency(current, first, history, out),
            Ranking::Frequency => self.by_frequency(current, first, history, out),
        }
        CandidateSource::Correlation
    }

    /// Sequential readahead starting one block past `current`, truncated at
    /// the maximum physical address.
    fn cold_start(&self, current: u64, out: &mut Vec<u64>) {
        for k in 1..=self.cold_start_degree as u64 {
            let next = self
                .block_size
                .checked_mul(k)
                .and_then(|offset| current.checked_add(offset));
            match next {
                Some(addr) if addr <= self.max_phys_addr => out.push(addr),
                _ => break,
            }
        }
    }

    /// Replays the step-`step` delta that followed `slot` onto `current`.
    ///
    /// Outer `None`: `slot` has no ring successor that far ahead.
    /// Inner `None`: the successor exists but the target is out of range.
    fn replay(
        &mut self,
        current: u64,
        slot: SlotIndex,
        step: usize,
        history: &HistoryBuffer,
    ) -> Option<Option<u64>> {
        let base = history.address(slot)?;
        let next = history.ring_successor(slot, step)?;
        let follower = history.address(next)?;
        let delta = Delta::between(base, follower);
        let target = delta.apply(current, self.max_phys_addr);
        if target.is_none() {
            self.out_of_range += 1;
            trace!(current, ?delta, slot = slot.val(), "extrapolated address out of range");
        }
        Some(target)
    }

    fn by_recency(
        &mut self,
        current: u64,
        first: SlotIndex,
        history: &HistoryBuffer,
        out: &mut Vec<u64>,
    ) {
        let mut link = Some(first);
        let mut hops = 0;

        'chain: while let Some(slot) = link {
            if hops == history.capacity() {
                break;
            }
            hops += 1;
            for step in 1..=self.max_width {
                let Some(target) = self.replay(current, slot, step, history) else {
                    break;
                };
                if let Some(addr) = target {
                    if !out.contains(&addr) {
                        out.push(addr);
                        if out.len() == self.max_depth {
                            break 'chain;
                        }
                    }
                }
            }
            link = history.predecessor(slot);
        }
    }

    fn by_frequency(
        &mut self,
        current: u64,
        first: SlotIndex,
        history: &HistoryBuffer,
        out: &mut Vec<u64>,
    ) {
        self.tally.clear();
        let mut order = 0;
        let mut link = Some(first);
        let mut hops = 0;

        while let Some(slot) = link {
            if hops == history.capacity() {
                break;
            }
            hops += 1;
            for step in 1..=self.max_width {
                let Some(target) = self.replay(current, slot, step, history) else {
                    break;
                };
                if let Some(addr) = target {
                    let tally = self.tally.entry(addr).or_insert(Tally {
                        support: 0,
                        first_seen: order,
                    });
                    tally.support = tally.support.saturating_add(1);
                    order += 1;
                }
            }
            link = history.predecessor(slot);
        }

        self.top.clear();
        for (&address, tally) in &self.tally {
            let _ = self.top.offer(
                Candidate {
                    address,
                    support: tally.support,
                },
                tally.first_seen,
            );
        }
        self.ranked.clear();
        self.top.drain_descending(&mut self.ranked);
        out.extend(self.ranked.iter().map(|c| c.address));
    }
}
