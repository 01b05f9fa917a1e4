//! Host-facing prefetcher interface.
//!
//! This module contains the interface between the correlation engine and
//! the memory hierarchy that drives it:
//! 1. **Inbound:** [`Prefetcher`], called once per access and once per
//!    completed prefetch.
//! 2. **Outbound:** [`PrefetchHost`], the cache, in-flight tracker, and
//!    prefetch-bit storage that the engine queries and drives.
//! 3. **Engine:** [`GhbPrefetcher`], the unified correlation prefetcher.

/// The unified correlation prefetcher.
pub mod engine;

/// Residency filtering and the prefetch-confirmation protocol.
pub mod filter;

pub use self::engine::GhbPrefetcher;
pub use self::filter::{IssuanceFilter, Verdict};

use crate::ghb::CandidateSource;

/// One observed memory access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessEvent {
    /// Accessed address.
    pub address: u64,
    /// Whether the access missed in the cache.
    pub is_demand_miss: bool,
    /// Program counter of the accessing instruction, if known.
    pub program_counter: Option<u64>,
}

impl AccessEvent {
    /// Creates a demand miss with no program counter.
    pub const fn miss(address: u64) -> Self {
        Self {
            address,
            is_demand_miss: true,
            program_counter: None,
        }
    }

    /// Creates a cache hit with no program counter.
    pub const fn hit(address: u64) -> Self {
        Self {
            address,
            is_demand_miss: false,
            program_counter: None,
        }
    }

    /// Attaches the program counter of the accessing instruction.
    #[must_use]
    pub const fn with_pc(mut self, pc: u64) -> Self {
        self.program_counter = Some(pc);
        self
    }
}

/// Result of handing one access to a prefetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The line was brought in by an earlier prefetch and is now confirmed
    /// by demand; no further speculation was attempted.
    PrefetchHit,
    /// The trigger policy did not allow candidate generation for this access.
    Untriggered,
    /// Candidates were generated and passed through the issuance filter.
    Generated {
        /// Whether the candidates came from the chain or from cold start.
        source: CandidateSource,
        /// Number of candidates generated.
        candidates: usize,
        /// Number of candidates issued as prefetches.
        issued: usize,
    },
}

impl AccessOutcome {
    /// Returns the number of prefetches issued for the access.
    pub const fn issued(&self) -> usize {
        match self {
            Self::Generated { issued, .. } => *issued,
            Self::PrefetchHit | Self::Untriggered => 0,
        }
    }
}

/// Memory hierarchy state the prefetcher consults and drives.
///
/// `in_cache`, `in_flight`, and `get_prefetch_bit` must be free of side
/// effects. All calls are synchronous.
pub trait PrefetchHost {
    /// Requests that the block containing `address` be fetched.
    fn issue_prefetch(&mut self, address: u64);

    /// Returns `true` if `address` is resident in the cache.
    fn in_cache(&self, address: u64) -> bool;

    /// Returns `true` if a fetch for `address` is already outstanding.
    fn in_flight(&self, address: u64) -> bool;

    /// Returns `true` if `address`'s line was filled by a prefetch not yet
    /// confirmed by a demand access.
    fn get_prefetch_bit(&self, address: u64) -> bool;

    /// Marks `address`'s line as filled by a prefetch.
    fn set_prefetch_bit(&mut self, address: u64);

    /// Clears `address`'s prefetch mark.
    fn clear_prefetch_bit(&mut self, address: u64);
}

/// Trait for prefetcher implementations.
///
/// Calls must be serialized: each call completes before the next begins.
pub trait Prefetcher: Send + Sync {
    /// Observes a memory access and issues prefetches through `host`.
    ///
    /// # Arguments
    ///
    /// * `event` - The access being observed.
    /// * `host` - Cache and in-flight state to filter against and issue to.
    ///
    /// # Returns
    ///
    /// What the prefetcher did with the access.
    fn on_access(&mut self, event: &AccessEvent, host: &mut dyn PrefetchHost) -> AccessOutcome;

    /// Notifies the prefetcher that a prefetch for `address` has completed.
    fn on_prefetch_complete(&mut self, address: u64, host: &mut dyn PrefetchHost);
}
