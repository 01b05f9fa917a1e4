//! Configuration for the correlation prefetcher.
//!
//! This module defines the configuration structure and selector enums used to
//! parameterize the engine. It provides:
//! 1. **Defaults:** Baseline table sizes, prediction bounds, and memory geometry.
//! 2. **Structure:** A flat [`PrefetchConfig`] resolved once at construction.
//! 3. **Enums:** Correlation key, index strategy, ranking mode, and trigger policy.
//!
//! Configuration is supplied as JSON (`PrefetchConfig::from_json` /
//! `PrefetchConfig::from_path`) or built from `PrefetchConfig::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the prefetcher.
///
/// These values are used for any field not present in a JSON document.
mod defaults {
    /// History Buffer capacity (256 slots).
    pub const HISTORY_SIZE: usize = 256;

    /// Correlation Index capacity (256 entries).
    pub const INDEX_SIZE: usize = 256;

    /// Distinct candidates emitted per triggering access.
    pub const MAX_DEPTH: usize = 3;

    /// Forward steps replayed from each matched occurrence.
    pub const MAX_WIDTH: usize = 1;

    /// Sequential blocks fetched on the first occurrence of a key.
    pub const COLD_START_DEGREE: usize = 1;

    /// Cache block size in bytes.
    pub const BLOCK_SIZE: u64 = 64;

    /// Highest legal physical address (256 MiB of physical memory).
    pub const MAX_PHYS_ADDR: u64 = 256 * 1024 * 1024 - 1;
}

/// Largest accepted History Buffer or Correlation Index capacity.
///
/// Also bounds `history_size * max_width`, the number of distinct addresses
/// a frequency walk can tally.
pub const TABLE_LIMIT: usize = 1 << 20;

/// Largest accepted `max_depth` or `cold_start_degree`.
pub const CANDIDATE_LIMIT: usize = 4096;

/// Correlation key used to link history slots into chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum KeyKind {
    /// Raw access address (Markov correlation: "what follows this address").
    Address,
    /// Signed distance from the previous access (distance correlation).
    #[default]
    Delta,
    /// The last two signed distances (second-order correlation).
    DeltaPair,
    /// Program counter of the accessing instruction.
    #[serde(alias = "PC", alias = "Pc")]
    ProgramCounter,
}

/// Correlation Index lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum IndexKind {
    /// Hash the key into a table of single-entry buckets. O(1), may alias.
    #[default]
    DirectMapped,
    /// Scan a compact table for the key. O(capacity), collision-free.
    LinearScan,
}

/// Candidate selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Ranking {
    /// Emit candidates in chain order, most recent occurrence first.
    #[default]
    Recency,
    /// Walk the whole chain and emit the most frequently observed candidates.
    Frequency,
}

/// Which accesses may generate prefetch candidates.
///
/// History is updated for every access regardless of the trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Trigger {
    /// Every access that is not a confirmed prefetch hit.
    #[default]
    EveryAccess,
    /// Only demand misses.
    DemandMiss,
}

/// Root configuration structure for a [`GhbPrefetcher`](crate::GhbPrefetcher).
///
/// # Examples
///
/// ```
/// use ghb_prefetch::config::{KeyKind, PrefetchConfig, Ranking};
///
/// let json = r#"{
///     "history_size": 512,
///     "index_size": 128,
///     "key": "Address",
///     "ranking": "Frequency",
///     "max_depth": 4
/// }"#;
///
/// let config = PrefetchConfig::from_json(json).unwrap();
/// assert_eq!(config.history_size, 512);
/// assert_eq!(config.key, KeyKind::Address);
/// assert_eq!(config.ranking, Ranking::Frequency);
/// assert_eq!(config.block_size, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrefetchConfig {
    /// History Buffer capacity (ring slots)
    #[serde(default = "PrefetchConfig::default_history_size")]
    pub history_size: usize,

    /// Correlation Index capacity (entries)
    #[serde(default = "PrefetchConfig::default_index_size")]
    pub index_size: usize,

    /// Correlation Index strategy
    #[serde(default)]
    pub index: IndexKind,

    /// Correlation key function
    #[serde(default)]
    pub key: KeyKind,

    /// Candidate selection policy
    #[serde(default)]
    pub ranking: Ranking,

    /// Accesses that may generate candidates
    #[serde(default)]
    pub trigger: Trigger,

    /// Distinct candidates emitted per access
    #[serde(default = "PrefetchConfig::default_max_depth")]
    pub max_depth: usize,

    /// Forward steps replayed per matched occurrence
    #[serde(default = "PrefetchConfig::default_max_width")]
    pub max_width: usize,

    /// Sequential readahead degree on a key's first occurrence (0 disables)
    #[serde(default = "PrefetchConfig::default_cold_start_degree")]
    pub cold_start_degree: usize,

    /// Cache block size in bytes
    #[serde(default = "PrefetchConfig::default_block_size")]
    pub block_size: u64,

    /// Highest address a candidate may name
    #[serde(default = "PrefetchConfig::default_max_phys_addr")]
    pub max_phys_addr: u64,
}

impl PrefetchConfig {
    /// Returns the default History Buffer capacity.
    fn default_history_size() -> usize {
        defaults::HISTORY_SIZE
    }

    /// Returns the default Correlation Index capacity.
    fn default_index_size() -> usize {
        defaults::INDEX_SIZE
    }

    /// Returns the default prediction depth.
    fn default_max_depth() -> usize {
        defaults::MAX_DEPTH
    }

    /// Returns the default prediction width.
    fn default_max_width() -> usize {
        defaults::MAX_WIDTH
    }

    /// Returns the default cold-start readahead degree.
    fn default_cold_start_degree() -> usize {
        defaults::COLD_START_DEGREE
    }

    /// Returns the default block size in bytes.
    fn default_block_size() -> u64 {
        defaults::BLOCK_SIZE
    }

    /// Returns the default highest legal physical address.
    fn default_max_phys_addr() -> u64 {
        defaults::MAX_PHYS_ADDR
    }

    /// Parses and validates a configuration from a JSON document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error reported by [`PrefetchConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`PrefetchConfig::from_json`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks that the configuration describes a usable engine.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::ZeroCapacity`] if a table size, depth, or width is zero.
    /// * [`ConfigError::LimitExceeded`] if a table size, `max_depth`,
    ///   `cold_start_degree`, or `history_size * max_width` is above
    ///   [`TABLE_LIMIT`] / [`CANDIDATE_LIMIT`].
    /// * [`ConfigError::InvalidBlockSize`] if the block size is not a power of two.
    /// * [`ConfigError::AddressLimitBelowBlock`] if no whole block fits below
    ///   `max_phys_addr`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("history_size", self.history_size),
            ("index_size", self.index_size),
            ("max_depth", self.max_depth),
            ("max_width", self.max_width),
        ];
        for (field, value) in sizes {
            if value == 0 {
                return Err(ConfigError::ZeroCapacity { field });
            }
        }

        let limits = [
            ("history_size", self.history_size, TABLE_LIMIT),
            ("index_size", self.index_size, TABLE_LIMIT),
            (
                "history_size * max_width",
                self.history_size.saturating_mul(self.max_width),
                TABLE_LIMIT,
            ),
            ("max_depth", self.max_depth, CANDIDATE_LIMIT),
            ("cold_start_degree", self.cold_start_degree, CANDIDATE_LIMIT),
        ];
        for (field, value, limit) in limits {
            if value > limit {
                return Err(ConfigError::LimitExceeded {
                    field,
                    value,
                    limit,
                });
            }
        }

        if !self.block_size.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize(self.block_size));
        }

        if self.max_phys_addr < self.block_size {
            return Err(ConfigError::AddressLimitBelowBlock {
                max_phys_addr: self.max_phys_addr,
                block_size: self.block_size,
            });
        }

        Ok(())
    }
}

impl Default for PrefetchConfig {
    /// Creates the default configuration.
    ///
    /// Delta-keyed, direct-mapped, recency-ordered, triggered on every
    /// access, with 64-byte blocks and 256 MiB of physical memory.
    fn default() -> Self {
        Self {
            history_size: defaults::HISTORY_SIZE,
            index_size: defaults::INDEX_SIZE,
            index: IndexKind::default(),
            key: KeyKind::default(),
            ranking: Ranking::default(),
            trigger: Trigger::default(),
            max_depth: defaults::MAX_DEPTH,
            max_width: defaults::MAX_WIDTH,
            cold_start_degree: defaults::COLD_START_DEGREE,
            block_size: defaults::BLOCK_SIZE,
            max_phys_addr: defaults::MAX_PHYS_ADDR,
        }
    }
}
