//! Correlation-based hardware data prefetcher.
//!
//! This crate models a Global History Buffer (GHB) prefetcher: given the
//! stream of memory accesses seen by a cache, it predicts which lines will
//! be needed next and issues speculative fetches for them. It provides:
//! 1. **History:** A fixed ring of past accesses threaded into per-key correlation chains.
//! 2. **Index:** Direct-mapped or linear-scan tables from correlation key to latest slot.
//! 3. **Prediction:** Recency-ordered or frequency-ranked delta extrapolation
//!    with cold-start readahead.
//! 4. **Issuance:** Residency / in-flight filtering and the prefetch-confirmation bit protocol.
//! 5. **Configuration:** JSON-loadable settings and activity counters.
//!
//! The cache, in-flight tracker, and prefetch-bit storage belong to the host
//! and are reached through the [`PrefetchHost`] trait.

/// Common types (configuration errors).
pub mod common;
/// Prefetcher configuration (defaults, selector enums, validation).
pub mod config;
/// History Buffer, Correlation Index, and Candidate Generator.
pub mod ghb;
/// Host-facing interface, Issuance Filter, and the unified engine.
pub mod prefetch;
/// Prefetcher activity counters.
pub mod stats;

/// Configuration error type.
pub use crate::common::ConfigError;
/// Root configuration type; use `PrefetchConfig::default()` or load from JSON.
pub use crate::config::PrefetchConfig;
/// Main engine type; construct with `GhbPrefetcher::new`.
pub use crate::prefetch::GhbPrefetcher;
/// Inbound and outbound interface types.
pub use crate::prefetch::{AccessEvent, AccessOutcome, PrefetchHost, Prefetcher};
/// Activity counters.
pub use crate::stats::PrefetchStats;
