//! Access Accounting
//!
//! Every operation against the global address space is counted here. The
//! counters make the remote-access cost model observable: one increment is
//! one modeled round trip.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for global-address-space traffic.
#[derive(Debug, Default)]
pub struct AccessStats {
    head_reads: AtomicU64,
    head_writes: AtomicU64,
    record_publishes: AtomicU64,
    link_writes: AtomicU64,
    record_fetches: AtomicU64,
}

impl AccessStats {
    pub(crate) fn count_head_read(&self) {
        self.head_reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_head_write(&self) {
        self.head_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_record_publish(&self) {
        self.record_publishes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_link_write(&self) {
        self.link_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn count_record_fetch(&self) {
        self.record_fetches.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough point-in-time copy of all counters.
    pub fn snapshot(&self) -> AccessSnapshot {
        AccessSnapshot {
            head_reads: self.head_reads.load(Ordering::Relaxed),
            head_writes: self.head_writes.load(Ordering::Relaxed),
            record_publishes: self.record_publishes.load(Ordering::Relaxed),
            link_writes: self.link_writes.load(Ordering::Relaxed),
            record_fetches: self.record_fetches.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of the access counters, embedded in build reports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccessSnapshot {
    pub head_reads: u64,
    pub head_writes: u64,
    pub record_publishes: u64,
    pub link_writes: u64,
    pub record_fetches: u64,
}

impl AccessSnapshot {
    /// Total modeled round trips across all operation kinds.
    pub fn total_round_trips(&self) -> u64 {
        self.head_reads
            + self.head_writes
            + self.record_publishes
            + self.link_writes
            + self.record_fetches
    }
}
