//! Bucket Lock Table
//!
//! Mutual exclusion for bucket-head mutation, supplied by the caller of the
//! insertion protocol. Granularity is a configuration choice: a single
//! table-wide lock serializes every insertion, so the per-bucket and striped
//! layouts are first-class alternatives rather than afterthoughts.

use std::str::FromStr;
use tokio::sync::{Mutex, MutexGuard};

/// How bucket indices map onto locks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrategy {
    /// One lock for the whole table: every insertion serializes through it.
    Global,
    /// One lock per bucket: insertions only contend on hash collisions.
    PerBucket,
    /// A fixed number of locks, each covering a stripe of buckets.
    Striped(usize),
}

impl FromStr for LockStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "per-bucket" => Ok(Self::PerBucket),
            other => match other.strip_prefix("striped:") {
                Some(n) => {
                    let n: usize = n
                        .parse()
                        .map_err(|_| format!("invalid stripe count in {:?}", other))?;
                    if n == 0 {
                        return Err("stripe count must be at least 1".to_string());
                    }
                    Ok(Self::Striped(n))
                }
                None => Err(format!(
                    "unknown lock strategy {:?} (expected global, per-bucket or striped:N)",
                    other
                )),
            },
        }
    }
}

/// The caller-supplied lock handle of the insertion protocol.
pub struct LockTable {
    locks: Vec<Mutex<()>>,
}

impl LockTable {
    pub fn new(strategy: LockStrategy, bucket_count: usize) -> Self {
        let lock_count = match strategy {
            LockStrategy::Global => 1,
            LockStrategy::PerBucket => bucket_count.max(1),
            LockStrategy::Striped(n) => n.clamp(1, bucket_count.max(1)),
        };

        let mut locks = Vec::with_capacity(lock_count);
        locks.resize_with(lock_count, || Mutex::new(()));

        tracing::debug!(locks = lock_count, buckets = bucket_count, "built lock table");
        Self { locks }
    }

    pub fn lock_count(&self) -> usize {
        self.locks.len()
    }

    /// Acquires the lock covering `bucket`. Held across exactly the head
    /// read, link write and head write of one insertion; release is the
    /// cross-unit visibility boundary.
    pub async fn acquire(&self, bucket: usize) -> MutexGuard<'_, ()> {
        self.locks[bucket % self.locks.len()].lock().await
    }
}
