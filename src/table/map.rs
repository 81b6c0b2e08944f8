//! K-mer Table
//!
//! Creation, the locked insertion protocol, the lock-free lookup protocol,
//! and whole-structure teardown.

use super::hash::bucket_for;
use super::lock::{LockStrategy, LockTable};
use crate::kmer::{self, PackError, PackedKmer};
use crate::space::buckets::BucketArray;
use crate::space::heap::{GlobalHeap, HeapWriter, KmerEntry};
use crate::space::stats::{AccessSnapshot, AccessStats};
use crate::space::types::{HeapError, RecordRef};
use std::sync::Arc;

/// Build-time knobs. `load_factor` fixes the bucket count relative to the
/// requested record capacity at creation; it never changes afterwards.
#[derive(Debug, Clone, Copy)]
pub struct TableConfig {
    pub load_factor: f64,
    pub lock_strategy: LockStrategy,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            load_factor: 1.0,
            lock_strategy: LockStrategy::PerBucket,
        }
    }
}

/// Failure of a single table operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("sequence length {got} does not match the configured k-mer length {expected}")]
    LengthMismatch { expected: usize, got: usize },

    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Per-unit partition size for a heap of `capacity` records over
/// `unit_count` units, or `None` when the geometry does not fit the
/// 32-bit offset space of a `RecordRef`.
pub(crate) fn per_unit_capacity(capacity: u64, unit_count: u32) -> Option<u32> {
    let per_unit = u32::try_from(capacity / unit_count as u64 + 1).ok()?;
    (per_unit as u64).checked_mul(unit_count as u64)?;
    Some(per_unit)
}

/// The distributed k-mer hash table.
///
/// Holds the shared bucket-head array and a handle to the record heap the
/// chains thread through. Sized once at creation; append-only for the rest
/// of the run (no resize, no rehash, no deletion).
pub struct KmerTable {
    buckets: BucketArray,
    heap: Arc<GlobalHeap>,
    kmer_len: usize,
    stats: Arc<AccessStats>,
}

impl KmerTable {
    /// Creates the bucket table and the record heap for the whole run.
    ///
    /// A collective, once-per-run operation: every unit must reach this point
    /// before any insertion (the unit group enforces that with a barrier).
    /// The structures are a one-shot whole-run resource: a nonsensical size
    /// terminates the process, since the batch-run contract has no degraded
    /// mode to fall back to.
    pub fn create(
        capacity: u64,
        unit_count: u32,
        kmer_len: usize,
        config: &TableConfig,
    ) -> (Arc<KmerTable>, Arc<GlobalHeap>) {
        if capacity == 0 || unit_count == 0 || kmer_len == 0 {
            tracing::error!(
                capacity,
                unit_count,
                kmer_len,
                "cannot allocate table for an empty run"
            );
            std::process::exit(1);
        }

        let bucket_count = (capacity as f64 * config.load_factor) as u64;
        if bucket_count == 0 || bucket_count > usize::MAX as u64 {
            tracing::error!(
                capacity,
                load_factor = config.load_factor,
                "bucket count out of range"
            );
            std::process::exit(1);
        }

        if per_unit_capacity(capacity, unit_count).is_none() {
            tracing::error!(
                capacity,
                unit_count,
                "heap geometry exceeds the addressable range"
            );
            std::process::exit(1);
        }

        let stats = Arc::new(AccessStats::default());
        let heap = Arc::new(GlobalHeap::new(capacity, unit_count, stats.clone()));
        let table = Arc::new(KmerTable {
            buckets: BucketArray::new(bucket_count as usize, stats.clone()),
            heap: heap.clone(),
            kmer_len,
            stats,
        });

        tracing::info!(
            buckets = bucket_count,
            slots = heap.slot_count(),
            units = unit_count,
            k = kmer_len,
            "created k-mer table"
        );

        (table, heap)
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn kmer_len(&self) -> usize {
        self.kmer_len
    }

    /// Convenience constructor for the caller-supplied lock handle.
    pub fn lock_table(&self, strategy: LockStrategy) -> LockTable {
        LockTable::new(strategy, self.buckets.len())
    }

    pub fn access_snapshot(&self) -> AccessSnapshot {
        self.stats.snapshot()
    }

    fn pack_key(&self, seq: &[u8]) -> Result<PackedKmer, TableError> {
        if seq.len() != self.kmer_len {
            return Err(TableError::LengthMismatch {
                expected: self.kmer_len,
                got: seq.len(),
            });
        }
        Ok(kmer::pack(seq)?)
    }

    pub(crate) fn bucket_of(&self, packed: &PackedKmer) -> usize {
        bucket_for(self.buckets.len() as u64, packed.as_bytes()) as usize
    }

    #[cfg(test)]
    pub(crate) fn head_of(&self, bucket: usize) -> Option<RecordRef> {
        self.buckets.head(bucket)
    }

    /// Inserts one k-mer with its extensions.
    ///
    /// The slot comes from the calling unit's own heap partition, so the
    /// claim and the field publication need no cross-unit coordination; the
    /// record only becomes reachable inside the locked chain-prepend. There
    /// is no duplicate detection: inserting an identical key again creates a
    /// second chain entry, and aggregation is the caller's concern.
    pub async fn insert(
        &self,
        writer: &mut HeapWriter,
        seq: &[u8],
        left_ext: u8,
        right_ext: u8,
        locks: &LockTable,
    ) -> Result<RecordRef, TableError> {
        let packed = self.pack_key(seq)?;
        let bucket = self.bucket_of(&packed);

        let slot = writer.claim()?;
        self.heap.publish(slot, packed, left_ext, right_ext);

        // The serialization point. Two remote writes and one read, nothing else.
        let guard = locks.acquire(bucket).await;
        let head = self.buckets.head(bucket);
        self.heap.link(slot, head);
        self.buckets.set_head(bucket, slot);
        drop(guard);

        Ok(slot)
    }

    /// Looks up a k-mer and returns a local copy of its record.
    ///
    /// Lock-free: the chain is walked through accounted fetches only. The
    /// result is well-defined once all insertions that could touch the bucket
    /// have completed; a miss is reported explicitly as `Ok(None)` rather
    /// than an arbitrary record.
    pub fn lookup(&self, seq: &[u8]) -> Result<Option<KmerEntry>, TableError> {
        let packed = self.pack_key(seq)?;
        let bucket = self.bucket_of(&packed);

        let mut cursor = self.buckets.head(bucket);
        while let Some(at) = cursor {
            let Some(entry) = self.heap.fetch(at) else {
                // Reachable only if a chain references an unpublished slot,
                // i.e. the phase discipline was violated.
                tracing::warn!(
                    unit = at.unit,
                    offset = at.offset,
                    "chain references an unpublished slot; reporting a miss"
                );
                return Ok(None);
            };

            if entry.key.as_bytes() == packed.as_bytes() {
                return Ok(Some(entry));
            }
            cursor = entry.next;
        }

        Ok(None)
    }
}

/// Releases the bucket table. Part of the collective teardown pair; must run
/// once, after every unit has finished. See [`crate::space::release_heap`]
/// for the heap half (the table holds a heap handle, so release the table
/// first).
pub fn release_table(table: Arc<KmerTable>) {
    match Arc::try_unwrap(table) {
        Ok(table) => {
            tracing::debug!(buckets = table.buckets.len(), "released bucket table");
            drop(table);
        }
        Err(remaining) => {
            tracing::warn!(
                handles = Arc::strong_count(&remaining),
                "table released while handles remain; storage lives until they drop"
            );
        }
    }
}
