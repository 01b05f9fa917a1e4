//! Configuration error definitions.
//!
//! The access path of the prefetcher is total and never fails; the only
//! fallible operations are loading and validating a [`PrefetchConfig`]
//! and constructing an engine from it. This module provides:
//! 1. **Validation Errors:** Rejected table sizes, block sizes, and address limits.
//! 2. **Loading Errors:** JSON parse failures and I/O failures when reading from disk.
//!
//! [`PrefetchConfig`]: crate::config::PrefetchConfig

use thiserror::Error;

/// Errors raised while loading or validating prefetcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A table size, depth, or width that must be non-zero was zero.
    #[error("`{field}` must be greater than zero")]
    ZeroCapacity {
        /// Name of the offending configuration field.
        field: &'static str,
    },

    /// A table size, bound, or table-size product is above its supported limit.
    #[error("`{field}` is {value}, above the supported limit of {limit}")]
    LimitExceeded {
        /// Name of the offending configuration field or product.
        field: &'static str,
        /// Configured value (saturated for products).
        value: usize,
        /// Largest accepted value.
        limit: usize,
    },

    /// The block size is zero or not a power of two.
    #[error("block size {0} is not a non-zero power of two")]
    InvalidBlockSize(u64),

    /// The maximum physical address cannot hold a single block.
    #[error("max_phys_addr {max_phys_addr:#x} is smaller than the block size {block_size}")]
    AddressLimitBelowBlock {
        /// Configured highest legal address.
        max_phys_addr: u64,
        /// Configured block size in bytes.
        block_size: u64,
    },

    /// The configuration document is not valid JSON for a
    /// [`PrefetchConfig`](crate::config::PrefetchConfig).
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}
