//! Common types shared across the prefetcher.
//!
//! Currently this is the configuration error taxonomy; the access path
//! itself has no error type.

/// Error types for configuration loading and validation.
pub mod error;

pub use error::ConfigError;
