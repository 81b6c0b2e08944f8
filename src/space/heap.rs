//! Record Heap
//!
//! The table-wide record array. Storage is allocated once at creation and
//! split into one contiguous partition per unit; records are bump-allocated
//! inside a partition by that unit alone and freed only with the whole heap.

use super::stats::AccessStats;
use super::types::{HeapError, NULL_REF, RecordRef, UnitId};
use crate::kmer::PackedKmer;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// The immutable payload of a record, published exactly once per slot.
#[derive(Debug, Clone)]
struct RecordFields {
    key: PackedKmer,
    left_ext: u8,
    right_ext: u8,
}

/// One heap slot: write-once fields plus the mutable-until-linked chain link.
///
/// The fields are written before the slot is reachable from any bucket; the
/// link is written under the bucket lock as the slot gets prepended. After
/// that the whole record is immutable.
#[derive(Debug)]
struct RecordSlot {
    fields: OnceLock<RecordFields>,
    next: AtomicU64,
}

impl RecordSlot {
    fn empty() -> Self {
        Self {
            fields: OnceLock::new(),
            next: AtomicU64::new(NULL_REF),
        }
    }
}

/// A by-value local copy of one record, as produced by [`GlobalHeap::fetch`].
///
/// Fetching copies the record out of the global space (the analogue of a
/// remote memory get); the copy stays valid however the chain evolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KmerEntry {
    pub key: PackedKmer,
    pub left_ext: u8,
    pub right_ext: u8,
    pub next: Option<RecordRef>,
}

/// The globally addressable record heap.
pub struct GlobalHeap {
    slots: Vec<RecordSlot>,
    unit_count: u32,
    capacity_per_unit: u32,
    stats: Arc<AccessStats>,
}

impl GlobalHeap {
    /// Allocates storage for `capacity` records split across `unit_count`
    /// partitions of `capacity / unit_count + 1` slots each.
    ///
    /// Callers validate the arithmetic before getting here; see
    /// `KmerTable::create` for the fatal-on-failure policy.
    pub(crate) fn new(capacity: u64, unit_count: u32, stats: Arc<AccessStats>) -> Self {
        let capacity_per_unit = (capacity / unit_count as u64 + 1) as u32;
        let total = capacity_per_unit as usize * unit_count as usize;

        let mut slots = Vec::with_capacity(total);
        slots.resize_with(total, RecordSlot::empty);

        tracing::debug!(
            slots = total,
            units = unit_count,
            per_unit = capacity_per_unit,
            "allocated record heap"
        );

        Self {
            slots,
            unit_count,
            capacity_per_unit,
            stats,
        }
    }

    pub fn unit_count(&self) -> u32 {
        self.unit_count
    }

    pub fn capacity_per_unit(&self) -> u32 {
        self.capacity_per_unit
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Bump-pointer writer over `unit`'s own partition. Each unit holds
    /// exactly one writer; the partitions are disjoint by construction, so
    /// writers never contend.
    pub fn writer(self: &Arc<Self>, unit: UnitId) -> HeapWriter {
        assert!(
            unit.0 < self.unit_count,
            "unit {} outside group of {}",
            unit.0,
            self.unit_count
        );
        HeapWriter {
            heap: self.clone(),
            unit,
            cursor: 0,
        }
    }

    fn slot(&self, at: RecordRef) -> Option<&RecordSlot> {
        if at.unit >= self.unit_count || at.offset >= self.capacity_per_unit {
            return None;
        }
        let index = at.unit as usize * self.capacity_per_unit as usize + at.offset as usize;
        self.slots.get(index)
    }

    /// Writes the key and extension fields into a claimed slot.
    ///
    /// Unsynchronized on purpose: the slot is not yet reachable from any
    /// bucket, so no other unit can observe it. Publishing twice indicates a
    /// slot-claim bug and is logged, never silently overwritten.
    pub fn publish(&self, at: RecordRef, key: PackedKmer, left_ext: u8, right_ext: u8) {
        self.stats.count_record_publish();

        let Some(slot) = self.slot(at) else {
            tracing::error!(unit = at.unit, offset = at.offset, "publish outside heap bounds");
            return;
        };

        let fields = RecordFields {
            key,
            left_ext,
            right_ext,
        };
        if slot.fields.set(fields).is_err() {
            tracing::error!(
                unit = at.unit,
                offset = at.offset,
                "slot published twice; keeping the first record"
            );
        }
    }

    /// Writes the chain link of a record. Called under the bucket lock, right
    /// before the record becomes the bucket head.
    pub fn link(&self, at: RecordRef, next: Option<RecordRef>) {
        self.stats.count_link_write();

        let Some(slot) = self.slot(at) else {
            tracing::error!(unit = at.unit, offset = at.offset, "link outside heap bounds");
            return;
        };

        slot.next.store(RecordRef::option_to_bits(next), Ordering::Release);
    }

    /// Copies a record out of the global space.
    ///
    /// Returns `None` for an unpublished or out-of-bounds slot; a chain
    /// should never reference either once the insert phase has quiesced.
    pub fn fetch(&self, at: RecordRef) -> Option<KmerEntry> {
        self.stats.count_record_fetch();

        let slot = self.slot(at)?;
        let fields = slot.fields.get()?;

        Some(KmerEntry {
            key: fields.key.clone(),
            left_ext: fields.left_ext,
            right_ext: fields.right_ext,
            next: RecordRef::from_bits(slot.next.load(Ordering::Acquire)),
        })
    }
}

/// Per-unit bump cursor over the unit's own heap partition.
///
/// The cursor starts at the beginning of the partition and is strictly
/// increasing; offsets are local to the partition (the global position is
/// `unit * capacity_per_unit + offset`). Claiming is lock-free because no
/// other unit ever writes this partition.
pub struct HeapWriter {
    heap: Arc<GlobalHeap>,
    unit: UnitId,
    cursor: u32,
}

impl HeapWriter {
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    /// Number of slots claimed so far.
    pub fn claimed(&self) -> u32 {
        self.cursor
    }

    /// Claims the next free slot of this unit's partition.
    ///
    /// Fails fast when the partition is exhausted instead of spilling into
    /// the neighbouring unit's region.
    pub fn claim(&mut self) -> Result<RecordRef, HeapError> {
        if self.cursor >= self.heap.capacity_per_unit {
            return Err(HeapError::PartitionFull {
                unit: self.unit.0,
                capacity: self.heap.capacity_per_unit,
            });
        }

        let at = RecordRef {
            unit: self.unit.0,
            offset: self.cursor,
        };
        self.cursor += 1;
        Ok(at)
    }

    /// Reference to the most recently claimed slot, i.e. the record just
    /// written by this unit. This is what the start list captures.
    pub fn last_claimed(&self) -> Option<RecordRef> {
        if self.cursor == 0 {
            return None;
        }
        Some(RecordRef {
            unit: self.unit.0,
            offset: self.cursor - 1,
        })
    }
}

/// Releases the record heap. Part of the collective teardown pair; must run
/// once, after every unit has finished inserting and looking up.
///
/// Reclamation itself is ownership-driven: storage is freed when the last
/// handle drops. Outstanding handles are logged so a missed teardown is
/// visible in the run output.
pub fn release_heap(heap: Arc<GlobalHeap>) {
    match Arc::try_unwrap(heap) {
        Ok(heap) => {
            tracing::debug!(slots = heap.slots.len(), "released record heap");
            drop(heap);
        }
        Err(remaining) => {
            tracing::warn!(
                handles = Arc::strong_count(&remaining),
                "heap released while handles remain; storage lives until they drop"
            );
        }
    }
}
