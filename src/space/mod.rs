//! Global Address Space Module
//!
//! Implements the cluster-wide addressable storage the hash table lives in:
//! a record heap partitioned across units and a shared array of bucket heads.
//!
//! ## Core Concepts
//! - **Explicit access**: no component touches this storage directly. Every
//!   read or write goes through an accounted operation (`fetch`, `publish`,
//!   `link`, `head`, `set_head`), keeping the "each cross-unit access is
//!   one blocking round trip" cost model visible in the run report.
//! - **Partitioning**: the heap is split into one contiguous region per unit;
//!   a unit's bump cursor only ever claims slots inside its own region, so
//!   slot allocation needs no cross-unit coordination at all.
//! - **Write-once records**: a slot's fields are published exactly once,
//!   before the record becomes reachable from any bucket chain; records are
//!   immutable afterwards and are only freed with the whole heap.

pub mod buckets;
pub mod heap;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;

pub use buckets::BucketArray;
pub use heap::{GlobalHeap, HeapWriter, KmerEntry, release_heap};
pub use stats::{AccessSnapshot, AccessStats};
pub use types::{HeapError, RecordRef, UnitId};
