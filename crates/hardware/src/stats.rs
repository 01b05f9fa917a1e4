//! Prefetcher activity counters.
//!
//! This module tracks what the engine did with the accesses it observed:
//! 1. **Triggers:** Accesses, confirmed prefetch hits, and untriggered accesses.
//! 2. **Generation:** Correlated versus cold-start triggers and candidates produced.
//! 3. **Issuance:** Issued prefetches and the reason each suppressed candidate was dropped.
//! 4. **Consistency:** Stale index rejections, out-of-range hops, and self-loops.

use std::fmt;

/// Counters describing prefetcher activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchStats {
    /// Accesses observed.
    pub accesses: u64,
    /// Accesses to a line whose prefetch bit was set.
    pub prefetch_hits: u64,
    /// Accesses the trigger policy excluded from generation.
    pub untriggered: u64,
    /// Accesses whose candidates came from a correlation chain.
    pub correlated_triggers: u64,
    /// Accesses that fell back to sequential readahead.
    pub cold_start_triggers: u64,
    /// Candidates produced before filtering.
    pub candidates_generated: u64,
    /// Prefetches issued to the host.
    pub issued: u64,
    /// Candidates dropped because the line was resident.
    pub suppressed_resident: u64,
    /// Candidates dropped because a fetch was already outstanding.
    pub suppressed_in_flight: u64,
    /// Prefetch completions reported by the host.
    pub completions: u64,
    /// Correlation Index entries rejected because their slot was stale.
    pub stale_index_rejections: u64,
    /// Chain hops whose extrapolated address was out of range.
    pub out_of_range_hops: u64,
    /// Slots observed as their own predecessor.
    pub self_loops: u64,
}

impl PrefetchStats {
    /// Fraction of issued prefetches later confirmed by a demand access.
    ///
    /// Returns 0.0 when nothing has been issued.
    pub fn accuracy(&self) -> f64 {
        if self.issued == 0 {
            0.0
        } else {
            self.prefetch_hits as f64 / self.issued as f64
        }
    }

    /// Fraction of generated candidates that survived filtering.
    pub fn issue_rate(&self) -> f64 {
        if self.candidates_generated == 0 {
            0.0
        } else {
            self.issued as f64 / self.candidates_generated as f64
        }
    }
}

impl fmt::Display for PrefetchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pf.accesses              {}", self.accesses)?;
        writeln!(f, "pf.prefetch_hits         {}", self.prefetch_hits)?;
        writeln!(f, "pf.untriggered           {}", self.untriggered)?;
        writeln!(f, "pf.triggers.correlated   {}", self.correlated_triggers)?;
        writeln!(f, "pf.triggers.cold_start   {}", self.cold_start_triggers)?;
        writeln!(f, "pf.candidates            {}", self.candidates_generated)?;
        writeln!(f, "pf.issued                {}", self.issued)?;
        writeln!(f, "pf.suppressed.resident   {}", self.suppressed_resident)?;
        writeln!(f, "pf.suppressed.in_flight  {}", self.suppressed_in_flight)?;
        writeln!(f, "pf.completions           {}", self.completions)?;
        writeln!(f, "pf.index.stale           {}", self.stale_index_rejections)?;
        writeln!(f, "pf.hops.out_of_range     {}", self.out_of_range_hops)?;
        writeln!(f, "pf.self_loops            {}", self.self_loops)?;
        write!(f, "pf.accuracy              {:.2}%", self.accuracy() * 100.0)
    }
}
