//! Correlation Index Tests.
//!
//! Verifies both index strategies against the same contract: return the
//! previous live slot for a key, repoint the entry at the new slot, evict
//! in most-recent-wins order, and reject entries whose slot is gone.

use crate::common::harness::record;
use ghb_prefetch::config::{IndexKind, KeyKind};
use ghb_prefetch::ghb::index;
use ghb_prefetch::ghb::{
    CorrelationIndex, CorrelationKey, DirectMappedIndex, HistoryBuffer, LinearScanIndex, SlotIndex,
    SlotRef,
};
use pretty_assertions::assert_eq;
use rstest::rstest;

const A: u64 = 0x1000;
const B: u64 = 0x2000;
const C: u64 = 0x3000;

fn slot(index: usize, generation: u64) -> SlotRef {
    SlotRef {
        index: SlotIndex(index),
        generation,
    }
}

// ══════════════════════════════════════════════════════════
// 1. Shared Contract
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(IndexKind::DirectMapped, 64)]
#[case(IndexKind::LinearScan, 16)]
#[case(IndexKind::DirectMapped, 0)]
fn build_selects_capacity(#[case] kind: IndexKind, #[case] capacity: usize) {
    let index = index::build(kind, capacity);
    assert_eq!(index.capacity(), capacity.max(1));
    assert!(index.is_empty());
    assert_eq!(index.stale_rejections(), 0);
}

/// First sight of a key is a miss; the second returns the first slot.
#[rstest]
#[case(IndexKind::DirectMapped)]
#[case(IndexKind::LinearScan)]
fn second_occurrence_returns_first_slot(#[case] kind: IndexKind) {
    let mut history = HistoryBuffer::new(8);
    let mut index = index::build(kind, 16);

    let first = record(&mut history, &mut *index, KeyKind::Address, A);
    assert_eq!(history.predecessor(first), None);
    assert_eq!(index.peek(&CorrelationKey::Address(A)), Some(slot(0, 0)));

    let _ = record(&mut history, &mut *index, KeyKind::Address, B);
    let third = record(&mut history, &mut *index, KeyKind::Address, A);
    assert_eq!(history.predecessor(third), Some(first));
    assert_eq!(index.peek(&CorrelationKey::Address(A)), Some(slot(2, 2)));
    assert_eq!(index.len(), 2);
}

/// An entry naming a slot that was never written is reported as stale.
#[rstest]
#[case(IndexKind::DirectMapped)]
#[case(IndexKind::LinearScan)]
fn entry_for_empty_slot_is_stale(#[case] kind: IndexKind) {
    let history = HistoryBuffer::new(4);
    let mut index = index::build(kind, 4);
    let key = CorrelationKey::Address(A);

    assert_eq!(index.lookup_or_update(key, slot(0, 0), &history), None);
    assert_eq!(index.stale_rejections(), 0);

    assert_eq!(index.lookup_or_update(key, slot(1, 1), &history), None);
    assert_eq!(index.stale_rejections(), 1);
    assert_eq!(index.peek(&key), Some(slot(1, 1)));
}

#[rstest]
#[case(IndexKind::DirectMapped)]
#[case(IndexKind::LinearScan)]
fn peek_misses_unknown_key(#[case] kind: IndexKind) {
    let index = index::build(kind, 8);
    assert_eq!(index.peek(&CorrelationKey::Address(A)), None);
}

// ══════════════════════════════════════════════════════════
// 2. Direct-Mapped
// ══════════════════════════════════════════════════════════

/// With one bucket every key collides: A B A finds B in A's bucket.
#[test]
fn direct_mapped_collision_replaces_entry() {
    let mut history = HistoryBuffer::new(8);
    let mut index = DirectMappedIndex::new(1);

    let _ = record(&mut history, &mut index, KeyKind::Address, A);
    let _ = record(&mut history, &mut index, KeyKind::Address, B);
    assert_eq!(index.peek(&CorrelationKey::Address(A)), None);

    let third = record(&mut history, &mut index, KeyKind::Address, A);
    assert_eq!(history.predecessor(third), None);
    assert_eq!(index.peek(&CorrelationKey::Address(A)), Some(slot(2, 2)));
    assert_eq!(index.peek(&CorrelationKey::Address(B)), None);
    assert_eq!(index.len(), 1);
}

#[test]
fn direct_mapped_bucket_is_stable() {
    let index = DirectMappedIndex::new(256);
    let key = CorrelationKey::Address(0xDEAD_BEEF);
    let bucket = index.bucket(&key);
    assert!(bucket < 256);
    assert_eq!(bucket, index.bucket(&key));
}

// ══════════════════════════════════════════════════════════
// 3. Linear-Scan
// ══════════════════════════════════════════════════════════

/// Distinct keys never alias while there is room.
#[test]
fn linear_scan_keeps_distinct_keys() {
    let mut history = HistoryBuffer::new(8);
    let mut index = LinearScanIndex::new(2);

    let first = record(&mut history, &mut index, KeyKind::Address, A);
    let _ = record(&mut history, &mut index, KeyKind::Address, B);
    let third = record(&mut history, &mut index, KeyKind::Address, A);

    assert_eq!(history.predecessor(third), Some(first));
    assert_eq!(index.len(), 2);
}

/// Capacity 2, A B C A: C evicts A's binding, then A evicts B's.
#[test]
fn linear_scan_evicts_oldest_binding() {
    let mut history = HistoryBuffer::new(8);
    let mut index = LinearScanIndex::new(2);

    for address in [A, B, C] {
        let _ = record(&mut history, &mut index, KeyKind::Address, address);
    }
    assert_eq!(index.peek(&CorrelationKey::Address(A)), None);

    let fourth = record(&mut history, &mut index, KeyKind::Address, A);
    assert_eq!(history.predecessor(fourth), None);
    assert_eq!(index.peek(&CorrelationKey::Address(B)), None);
    assert_eq!(index.peek(&CorrelationKey::Address(C)), Some(slot(2, 2)));
    assert_eq!(index.peek(&CorrelationKey::Address(A)), Some(slot(3, 3)));
}
