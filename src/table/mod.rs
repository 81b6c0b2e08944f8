//! Distributed Hash Table Module
//!
//! The core data structure: a fixed-size bucket array over the global record
//! heap, built append-only by all units and queried lock-free afterwards.
//!
//! ## Core Concepts
//! - **Insertion**: a unit claims a slot in its own heap partition, publishes
//!   the record there, and prepends it to its bucket's chain under the
//!   bucket's mutual-exclusion lock. The locked region is exactly the head
//!   read and the two link/head writes.
//! - **Lookup**: a lock-free walk of the bucket's chain via by-value record
//!   fetches. Only defined once the insert phase has quiesced; a miss is an
//!   explicit `Ok(None)`.
//! - **Locking**: the lock table is supplied by the caller and its
//!   granularity is configurable (one global lock, one per bucket, or
//!   striped), since the bucket heads are the only contended state.
//! - **Teardown**: the bucket table and the heap are each released once,
//!   as whole units, after every unit has finished.

pub mod hash;
pub mod lock;
pub mod map;
pub mod start_list;


pub use lock::{LockStrategy, LockTable};
pub use map::{KmerTable, TableConfig, TableError, release_table};
pub use start_list::StartList;
