//! Issuance Filter.
//!
//! Stateless gate between the Candidate Generator and the host. A candidate
//! is issued only if it is neither resident nor already in flight, and each
//! candidate gets exactly one attempt per triggering access.
//!
//! The filter also owns the prefetch-confirmation protocol: a completed
//! prefetch sets the line's prefetch bit, and the first demand access to
//! that line clears it and suppresses speculation for that access.

use super::PrefetchHost;

/// Decision for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The prefetch was issued.
    Issued,
    /// Suppressed: the line is already resident.
    Resident,
    /// Suppressed: a fetch for the line is already outstanding.
    InFlight,
}

/// Residency / in-flight filter and prefetch-bit protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuanceFilter;

impl IssuanceFilter {
    /// Creates the filter.
    pub const fn new() -> Self {
        Self
    }

    /// Issues `address` unless the host already has or is fetching it.
    pub fn consider(self, address: u64, host: &mut dyn PrefetchHost) -> Verdict {
        if host.in_cache(address) {
            Verdict::Resident
        } else if host.in_flight(address) {
            Verdict::InFlight
        } else {
            host.issue_prefetch(address);
            Verdict::Issued
        }
    }

    /// Consumes the prefetch bit of `address`, if set.
    ///
    /// # Returns
    ///
    /// `true` if the access is the first demand use of a prefetched line.
    pub fn confirm(self, address: u64, host: &mut dyn PrefetchHost) -> bool {
        if host.get_prefetch_bit(address) {
            host.clear_prefetch_bit(address);
            true
        } else {
            false
        }
    }

    /// Records that a prefetch for `address` has landed.
    pub fn complete(self, address: u64, host: &mut dyn PrefetchHost) {
        host.set_prefetch_bit(address);
    }
}
