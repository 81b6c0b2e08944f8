use crate::space::stats::AccessSnapshot;
use serde::{Deserialize, Serialize};

/// Per-unit counters, registered by each unit at the end of its insert phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitReport {
    pub unit: u32,
    /// Records this unit inserted into the table.
    pub inserted: u64,
    /// Inserted records captured in this unit's start list.
    pub seeds: u64,
}

/// Summary of one whole build run, printed as JSON by the driver.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Random id distinguishing runs in aggregated logs.
    pub run_id: String,
    pub kmer_len: usize,
    pub unit_count: u32,
    pub bucket_count: usize,
    /// Records the sizing oracle reported for the input.
    pub records: u64,
    pub inserted: u64,
    pub seeds: u64,
    pub units: Vec<UnitReport>,
    /// Global-address-space traffic accumulated during the build.
    pub access: AccessSnapshot,
}
