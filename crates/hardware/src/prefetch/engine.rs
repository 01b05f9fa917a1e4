//! GHB Correlation Prefetcher.
//!
//! Ties the History Buffer, Correlation Index, Candidate Generator, and
//! Issuance Filter into one engine. Per access:
//!
//! ```text
//!   event ─▶ prefetch bit? ─▶ derive key ─▶ History Buffer insert
//!                 │                              (index lookup, chain link)
//!                 │ set: clear bit, stop                │
//!                 ▼                                     ▼
//!           PrefetchHit                  trigger? ─▶ Candidate Generator
//!                                                         │
//!                                                         ▼
//!                                          Issuance Filter ─▶ host.issue_prefetch
//! ```
//!
//! Every table and scratch buffer is allocated by [`GhbPrefetcher::new`]; the
//! access path performs no allocation.

use tracing::debug;
#[cfg(any(debug_assertions, feature = "always-trace"))]
use tracing::trace;

use super::{AccessEvent, AccessOutcome, IssuanceFilter, PrefetchHost, Prefetcher, Verdict};
use crate::common::ConfigError;
use crate::config::{PrefetchConfig, Trigger};
use crate::ghb::index::{self, CorrelationIndex};
use crate::ghb::{CandidateGenerator, CandidateSource, CorrelationKey, HistoryBuffer};
use crate::stats::PrefetchStats;

/// Correlation-based prefetcher built on a Global History Buffer.
#[derive(Debug)]
pub struct GhbPrefetcher {
    config: PrefetchConfig,
    history: HistoryBuffer,
    index: Box<dyn CorrelationIndex>,
    generator: CandidateGenerator,
    filter: IssuanceFilter,
    /// Candidates produced by the most recent access, before filtering.
    candidates: Vec<u64>,
    /// Engine-side counters; component counters are merged in `stats()`.
    stats: PrefetchStats,
}

impl GhbPrefetcher {
    /// Creates a prefetcher, allocating and zeroing every table.
    ///
    /// # Arguments
    ///
    /// * `config` - Table sizes, strategies, and prediction bounds.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`PrefetchConfig::validate`].
    pub fn new(config: &PrefetchConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let generator = CandidateGenerator::new(config);
        let candidates = Vec::with_capacity(generator.max_candidates());

        debug!(
            history_size = config.history_size,
            index_size = config.index_size,
            index = ?config.index,
            key = ?config.key,
            ranking = ?config.ranking,
            trigger = ?config.trigger,
            max_depth = config.max_depth,
            max_width = config.max_width,
            "correlation prefetcher initialized"
        );

        Ok(Self {
            config: config.clone(),
            history: HistoryBuffer::new(config.history_size),
            index: index::build(config.index, config.index_size),
            generator,
            filter: IssuanceFilter::new(),
            candidates,
            stats: PrefetchStats::default(),
        })
    }

    /// Returns the configuration the engine was built with.
    pub const fn config(&self) -> &PrefetchConfig {
        &self.config
    }

    /// Returns the History Buffer.
    pub const fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Returns the Correlation Index.
    pub fn index(&self) -> &dyn CorrelationIndex {
        &*self.index
    }

    /// Returns the candidates generated for the most recent access, best first.
    ///
    /// Empty if the most recent access was a prefetch hit or untriggered.
    pub fn last_candidates(&self) -> &[u64] {
        &self.candidates
    }

    /// Returns a snapshot of the activity counters.
    pub fn stats(&self) -> PrefetchStats {
        PrefetchStats {
            stale_index_rejections: self.index.stale_rejections(),
            out_of_range_hops: self.generator.out_of_range(),
            self_loops: self.history.self_loops(),
            ..self.stats
        }
    }

    /// Whether the trigger policy lets `event` generate candidates.
    fn triggers(&self, event: &AccessEvent) -> bool {
        match self.config.trigger {
            Trigger::EveryAccess => true,
            Trigger::DemandMiss => event.is_demand_miss,
        }
    }
}

impl Prefetcher for GhbPrefetcher {
    fn on_access(&mut self, event: &AccessEvent, host: &mut dyn PrefetchHost) -> AccessOutcome {
        let address = event.address;
        self.stats.accesses += 1;
        self.candidates.clear();

        let confirmed = self.filter.confirm(address, host);

        let key = CorrelationKey::derive(
            self.config.key,
            address,
            event.program_counter,
            &self.history,
        );
        let slot = self.history.insert(address, key, &mut *self.index);

        if confirmed {
            self.stats.prefetch_hits += 1;
            #[cfg(any(debug_assertions, feature = "always-trace"))]
            trace!(address, slot = slot.val(), "prefetch confirmed by demand access");
            return AccessOutcome::PrefetchHit;
        }

        if !self.triggers(event) {
            self.stats.untriggered += 1;
            return AccessOutcome::Untriggered;
        }

        let source = self
            .generator
            .generate(address, slot, &self.history, &mut self.candidates);
        match source {
            CandidateSource::Correlation => self.stats.correlated_triggers += 1,
            CandidateSource::ColdStart => self.stats.cold_start_triggers += 1,
        }
        self.stats.candidates_generated += self.candidates.len() as u64;

        let mut issued = 0;
        for &candidate in &self.candidates {
            match self.filter.consider(candidate, host) {
                Verdict::Issued => issued += 1,
                Verdict::Resident => self.stats.suppressed_resident += 1,
                Verdict::InFlight => self.stats.suppressed_in_flight += 1,
            }
        }
        self.stats.issued += issued as u64;

        #[cfg(any(debug_assertions, feature = "always-trace"))]
        trace!(
            address,
            slot = slot.val(),
            ?key,
            ?source,
            candidates = self.candidates.len(),
            issued,
            "access observed"
        );

        AccessOutcome::Generated {
            source,
            candidates: self.candidates.len(),
            issued,
        }
    }

    fn on_prefetch_complete(&mut self, address: u64, host: &mut dyn PrefetchHost) {
        self.stats.completions += 1;
        self.filter.complete(address, host);
    }
}
