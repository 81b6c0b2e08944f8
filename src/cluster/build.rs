//! Build Driver
//!
//! Orchestrates one whole run: collective table creation, the SPMD insert
//! phase with start-list capture, the quiesce barrier, and teardown.

use super::group::UnitGroup;
use super::types::{BuildReport, UnitReport};
use crate::kmer::EXT_TERMINATOR;
use crate::space::heap::GlobalHeap;
use crate::space::release_heap;
use crate::table::lock::LockTable;
use crate::table::map::{KmerTable, TableConfig, release_table};
use crate::table::start_list::StartList;
use crate::ufx::UfxRecord;
use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

type SharedHandles = (Arc<KmerTable>, Arc<GlobalHeap>, Arc<LockTable>);

/// Handles surviving a build, ready for the lookup phase and teardown.
pub struct BuildOutput {
    pub table: Arc<KmerTable>,
    pub heap: Arc<GlobalHeap>,
    pub locks: Arc<LockTable>,
    pub report: BuildReport,
}

/// Builds the table from a set of UFX records.
///
/// Records are dealt round-robin across the group's units; each unit packs
/// and inserts its share and captures seeds (records with a terminated left
/// extension) in its local start list. When this returns, the insert phase
/// has quiesced globally and lock-free lookups are safe from any task.
pub async fn build(
    group: &Arc<UnitGroup>,
    records: Arc<Vec<UfxRecord>>,
    kmer_len: usize,
    config: TableConfig,
) -> Result<BuildOutput> {
    let capacity = records.len() as u64;
    anyhow::ensure!(capacity > 0, "empty input: nothing to build");

    let unit_count = group.unit_count();
    let shared: Arc<OnceLock<SharedHandles>> = Arc::new(OnceLock::new());

    let body_shared = shared.clone();
    group
        .run(move |unit, group| {
            let shared = body_shared.clone();
            let records = records.clone();

            async move {
                // Collective creation: the first unit to arrive allocates,
                // and nobody inserts before the whole group holds the handles.
                let (table, heap, locks) = shared
                    .get_or_init(|| {
                        let (table, heap) =
                            KmerTable::create(capacity, unit_count, kmer_len, &config);
                        let locks = Arc::new(table.lock_table(config.lock_strategy));
                        (table, heap, locks)
                    })
                    .clone();
                group.barrier().await;

                let mut writer = heap.writer(unit);
                let mut starts = StartList::new();
                let mut inserted = 0u64;

                for record in records
                    .iter()
                    .skip(unit.0 as usize)
                    .step_by(unit_count as usize)
                {
                    table
                        .insert(
                            &mut writer,
                            &record.kmer,
                            record.left_ext,
                            record.right_ext,
                            &locks,
                        )
                        .await?;
                    inserted += 1;

                    // The seed predicate belongs to the caller, not the table.
                    if record.left_ext == EXT_TERMINATOR {
                        starts.record_last(&writer);
                    }
                }

                group.submit_report(UnitReport {
                    unit: unit.0,
                    inserted,
                    seeds: starts.len() as u64,
                });
                tracing::debug!(
                    unit = unit.0,
                    inserted,
                    seeds = starts.len(),
                    "unit finished insert phase"
                );

                // Quiesce: every insertion (and its lock release) happens
                // before any unit issues a lock-free lookup.
                group.barrier().await;
                Ok(())
            }
        })
        .await?;

    let (table, heap, locks) = shared
        .get()
        .cloned()
        .context("no unit created the table")?;

    let units = group.reports();
    let inserted: u64 = units.iter().map(|unit| unit.inserted).sum();
    let seeds: u64 = units.iter().map(|unit| unit.seeds).sum();

    let report = BuildReport {
        run_id: Uuid::new_v4().to_string(),
        kmer_len,
        unit_count,
        bucket_count: table.bucket_count(),
        records: capacity,
        inserted,
        seeds,
        units,
        access: table.access_snapshot(),
    };

    tracing::info!(
        run = %report.run_id,
        inserted,
        seeds,
        round_trips = report.access.total_round_trips(),
        "build complete"
    );

    Ok(BuildOutput {
        table,
        heap,
        locks,
        report,
    })
}

/// Collective teardown: releases the bucket table and then the record heap,
/// exactly once, after the whole group has joined.
pub fn shutdown(output: BuildOutput) {
    let BuildOutput {
        table,
        heap,
        locks,
        report: _,
    } = output;

    drop(locks);
    release_table(table);
    release_heap(heap);
}
