use ghb_prefetch::PrefetchHost;
use mockall::mock;
use std::collections::HashSet;

mock! {
    pub Host {}
    impl PrefetchHost for Host {
        fn issue_prefetch(&mut self, address: u64);
        fn in_cache(&self, address: u64) -> bool;
        fn in_flight(&self, address: u64) -> bool;
        fn get_prefetch_bit(&self, address: u64) -> bool;
        fn set_prefetch_bit(&mut self, address: u64);
        fn clear_prefetch_bit(&mut self, address: u64);
    }
}

impl MockHost {
    /// A host with nothing resident, nothing in flight, and no prefetch bits.
    /// Issue expectations are left to the test.
    pub fn idle() -> Self {
        let mut host = Self::new();
        host.expect_in_cache().return_const(false);
        host.expect_in_flight().return_const(false);
        host.expect_get_prefetch_bit().return_const(false);
        host
    }
}

/// A host backed by plain sets that records every issued prefetch.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub resident: HashSet<u64>,
    pub in_flight: HashSet<u64>,
    pub prefetch_bits: HashSet<u64>,
    pub issued: Vec<u64>,
    pub bit_clears: usize,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resident(mut self, lines: &[u64]) -> Self {
        self.resident.extend(lines.iter().copied());
        self
    }

    pub fn with_in_flight(mut self, lines: &[u64]) -> Self {
        self.in_flight.extend(lines.iter().copied());
        self
    }
}

impl PrefetchHost for RecordingHost {
    fn issue_prefetch(&mut self, address: u64) {
        self.issued.push(address);
        let _ = self.in_flight.insert(address);
    }

    fn in_cache(&self, address: u64) -> bool {
        self.resident.contains(&address)
    }

    fn in_flight(&self, address: u64) -> bool {
        self.in_flight.contains(&address)
    }

    fn get_prefetch_bit(&self, address: u64) -> bool {
        self.prefetch_bits.contains(&address)
    }

    fn set_prefetch_bit(&mut self, address: u64) {
        let _ = self.prefetch_bits.insert(address);
    }

    fn clear_prefetch_bit(&mut self, address: u64) {
        let _ = self.prefetch_bits.remove(&address);
        self.bit_clears += 1;
    }
}
