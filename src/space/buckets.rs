//! Bucket Head Array
//!
//! The globally shared array of chain heads, sized once at table creation.
//! Every unit reads and writes every bucket; the head is the only mutable
//! shared word of the whole structure, and head writes happen exclusively
//! inside the insertion protocol's locked region.

use super::stats::AccessStats;
use super::types::{NULL_REF, RecordRef};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct BucketArray {
    heads: Vec<AtomicU64>,
    stats: Arc<AccessStats>,
}

impl BucketArray {
    pub(crate) fn new(bucket_count: usize, stats: Arc<AccessStats>) -> Self {
        let mut heads = Vec::with_capacity(bucket_count);
        heads.resize_with(bucket_count, || AtomicU64::new(NULL_REF));
        Self { heads, stats }
    }

    /// Fixed bucket count; never changes after creation (no rehash path).
    pub fn len(&self) -> usize {
        self.heads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heads.is_empty()
    }

    /// Reads a bucket's head. Lock-free; the acquire load pairs with the
    /// release store of `set_head` so a chain reached through it is fully
    /// published.
    pub fn head(&self, bucket: usize) -> Option<RecordRef> {
        self.stats.count_head_read();
        RecordRef::from_bits(self.heads[bucket].load(Ordering::Acquire))
    }

    /// Points a bucket's head at a new record. Only called inside the
    /// insertion protocol's locked region, after the record's chain link has
    /// been written.
    pub fn set_head(&self, bucket: usize, to: RecordRef) {
        self.stats.count_head_write();
        self.heads[bucket].store(to.to_bits(), Ordering::Release);
    }
}
